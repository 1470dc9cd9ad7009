//! Sales dataset loading

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use sales_core::Transaction;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Column holding the order date
pub const ORDER_DATE: &str = "Order Date";
/// Column holding the sales region
pub const REGION: &str = "Region";
/// Column holding the customer segment
pub const SEGMENT: &str = "Segment";
/// Column holding the product sub-category
pub const SUB_CATEGORY: &str = "Sub-Category";
/// Column holding the sales amount
pub const SALES: &str = "Sales";
/// Column holding the profit
pub const PROFIT: &str = "Profit";
/// Column holding the discount fraction
pub const DISCOUNT: &str = "Discount";
/// Column holding the quantity
pub const QUANTITY: &str = "Quantity";

/// Columns every dataset must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    ORDER_DATE,
    REGION,
    SEGMENT,
    SUB_CATEGORY,
    SALES,
    PROFIT,
    DISCOUNT,
    QUANTITY,
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Cleaned transactions loaded from a dataset
#[derive(Debug, Clone, Default)]
pub struct TransactionSet {
    records: Vec<Transaction>,
    dropped_rows: usize,
}

/// Data loader for sales datasets
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load transactions from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TransactionSet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(Some(1000))
            .has_header(true)
            .finish()?;

        info!(path = %path.display(), rows = df.height(), "loaded dataset");
        Self::from_dataframe(df)
    }

    /// Extract transactions from an existing DataFrame.
    ///
    /// Rows with a missing value in any required column are dropped.
    pub fn from_dataframe(df: DataFrame) -> Result<TransactionSet> {
        Self::check_columns(&df)?;

        let dates = Self::date_column(df.column(ORDER_DATE)?)?;
        let regions = df.column(REGION)?.cast(&DataType::Utf8)?;
        let segments = df.column(SEGMENT)?.cast(&DataType::Utf8)?;
        let sub_categories = df.column(SUB_CATEGORY)?.cast(&DataType::Utf8)?;
        let sales = df.column(SALES)?.cast(&DataType::Float64)?;
        let profits = df.column(PROFIT)?.cast(&DataType::Float64)?;
        let discounts = df.column(DISCOUNT)?.cast(&DataType::Float64)?;
        let quantities = df.column(QUANTITY)?.cast(&DataType::Float64)?;

        let mut records = Vec::with_capacity(df.height());
        let mut dropped_rows = 0;

        let rows = dates
            .into_iter()
            .zip(regions.utf8()?.into_iter().map(non_blank))
            .zip(segments.utf8()?.into_iter().map(non_blank))
            .zip(sub_categories.utf8()?.into_iter().map(non_blank))
            .zip(sales.f64()?.into_iter())
            .zip(profits.f64()?.into_iter())
            .zip(discounts.f64()?.into_iter())
            .zip(quantities.f64()?.into_iter().map(|q| q.and_then(whole_quantity)));

        for (((((((date, region), segment), sub_category), sales), profit), discount), quantity) in
            rows
        {
            match (date, region, segment, sub_category, sales, profit, discount, quantity) {
                (
                    Some(order_date),
                    Some(region),
                    Some(segment),
                    Some(sub_category),
                    Some(sales),
                    Some(profit),
                    Some(discount),
                    Some(quantity),
                ) => records.push(Transaction {
                    order_date,
                    region: region.to_string(),
                    segment: segment.to_string(),
                    sub_category: sub_category.to_string(),
                    sales,
                    profit,
                    discount,
                    quantity,
                }),
                _ => dropped_rows += 1,
            }
        }

        if dropped_rows > 0 {
            debug!(dropped_rows, kept = records.len(), "dropped rows with missing values");
        }

        Ok(TransactionSet {
            records,
            dropped_rows,
        })
    }

    fn check_columns(df: &DataFrame) -> Result<()> {
        let names = df.get_column_names();
        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|name| *name == required) {
                return Err(ForecastError::MissingColumn(required.to_string()));
            }
        }
        Ok(())
    }

    /// Order dates as calendar dates; nulls stay `None`, unparseable text is fatal
    fn date_column(col: &Series) -> Result<Vec<Option<NaiveDate>>> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .ok_or_else(|| ForecastError::DataError("invalid epoch".to_string()))?;

        match col.dtype() {
            DataType::Date => {
                let days = col.cast(&DataType::Int32)?;
                Ok(days
                    .i32()?
                    .into_iter()
                    .map(|d| d.and_then(|d| offset_days(epoch, d as i64)))
                    .collect())
            }
            DataType::Datetime(unit, _) => {
                let per_day: i64 = match unit {
                    TimeUnit::Nanoseconds => 86_400_000_000_000,
                    TimeUnit::Microseconds => 86_400_000_000,
                    TimeUnit::Milliseconds => 86_400_000,
                };
                let ticks = col.cast(&DataType::Int64)?;
                Ok(ticks
                    .i64()?
                    .into_iter()
                    .map(|t| t.and_then(|t| offset_days(epoch, t.div_euclid(per_day))))
                    .collect())
            }
            _ => {
                let text = col.cast(&DataType::Utf8)?;
                text.utf8()?
                    .into_iter()
                    .enumerate()
                    .map(|(idx, value)| match value {
                        None => Ok(None),
                        Some(v) if v.trim().is_empty() => Ok(None),
                        Some(v) => parse_date(v).map(Some).ok_or_else(|| {
                            ForecastError::DateParse {
                                row: idx + 1,
                                value: v.to_string(),
                            }
                        }),
                    })
                    .collect()
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Quantities must be whole numbers; anything else counts as unreadable
fn whole_quantity(value: f64) -> Option<i64> {
    let in_range = value.is_finite() && value.abs() < i64::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

fn offset_days(epoch: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Parse an order date, month-first for slash-separated values
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

impl TransactionSet {
    /// Wrap already cleaned records
    pub fn new(records: Vec<Transaction>) -> Self {
        Self {
            records,
            dropped_rows: 0,
        }
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Transaction> {
        self.records
    }

    /// Rows discarded for missing values
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Dataset rows before cleaning
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.dropped_rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions in order of first appearance
    pub fn regions(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct segments in order of first appearance
    pub fn segments(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.segment.as_str()))
    }

    /// Earliest and latest order date
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.order_date).min()?;
        let last = self.records.iter().map(|r| r.order_date).max()?;
        Some((first, last))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
