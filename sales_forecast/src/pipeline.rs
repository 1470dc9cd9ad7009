//! Load, filter, aggregate and forecast in one call
//!
//! Every presentation front end goes through [`Pipeline`] so the historical
//! and forecast series are derived the same way everywhere. Nothing is
//! cached between runs.

use crate::data::{DataLoader, TransactionSet};
use crate::decomposition::{decompose_additive, SeasonalDecomposition, SEASONAL_PERIOD};
use crate::error::{ForecastError, Result};
use crate::forecaster::{ForecastConfig, ForecastSeries, Forecaster};
use sales_core::{MonthlyAggregator, MonthlySeries, Transaction};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Region and segment selection applied before aggregation.
///
/// `None` selects every value; an empty list selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub regions: Option<Vec<String>>,
    pub segments: Option<Vec<String>>,
}

impl TransactionFilter {
    /// A filter that keeps every transaction
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = Some(segments.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, record: &Transaction) -> bool {
        let selected = |choice: &Option<Vec<String>>, value: &str| match choice {
            None => true,
            Some(values) => values.iter().any(|v| v == value),
        };
        selected(&self.regions, &record.region) && selected(&self.segments, &record.segment)
    }

    pub fn apply(&self, records: &[Transaction]) -> Vec<Transaction> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Row counts from loading through filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    /// Dataset rows before cleaning
    pub read: usize,
    /// Rows dropped for missing or unreadable values
    pub dropped: usize,
    /// Rows kept by the filter
    pub selected: usize,
}

/// Output of one pipeline run
#[derive(Debug)]
pub struct SalesReport {
    pub rows: RowCounts,
    /// Transactions left after filtering
    pub transactions: Vec<Transaction>,
    /// Total sales per calendar month
    pub history: MonthlySeries,
    /// Forecast, or the reason it could not be produced
    pub forecast: std::result::Result<ForecastSeries, ForecastError>,
    /// Seasonal decomposition of the history
    pub decomposition: std::result::Result<SeasonalDecomposition, ForecastError>,
}

impl SalesReport {
    /// The forecast, if fitting succeeded
    pub fn forecast(&self) -> Option<&ForecastSeries> {
        self.forecast.as_ref().ok()
    }

    /// The decomposition, if the history spans two full seasons
    pub fn decomposition(&self) -> Option<&SeasonalDecomposition> {
        self.decomposition.as_ref().ok()
    }
}

/// The shared load → aggregate → forecast pipeline
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    aggregator: MonthlyAggregator,
    forecaster: Forecaster,
}

impl Pipeline {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        Ok(Self {
            aggregator: MonthlyAggregator::new(),
            forecaster: Forecaster::new(config)?,
        })
    }

    pub fn forecaster(&self) -> &Forecaster {
        &self.forecaster
    }

    /// Load the dataset at `path` and run the pipeline on it.
    ///
    /// Dataset errors fail the whole run; a forecasting failure is kept in
    /// the report next to the still valid history.
    pub fn run<P: AsRef<Path>>(&self, path: P, filter: &TransactionFilter) -> Result<SalesReport> {
        let dataset = DataLoader::from_csv(path)?;
        Ok(self.run_on(&dataset, filter))
    }

    /// Run the pipeline on an already loaded dataset
    pub fn run_on(&self, dataset: &TransactionSet, filter: &TransactionFilter) -> SalesReport {
        let transactions = filter.apply(dataset.records());
        let history = self.aggregator.aggregate(&transactions);
        let forecast = self.forecaster.forecast(&history);
        let decomposition = decompose_additive(&history, SEASONAL_PERIOD);
        let rows = RowCounts {
            read: dataset.rows_read(),
            dropped: dataset.dropped_rows(),
            selected: transactions.len(),
        };

        match &forecast {
            Ok(f) => info!(
                transactions = transactions.len(),
                months = history.len(),
                forecast_months = f.len(),
                "pipeline complete"
            ),
            Err(e) => warn!(
                transactions = transactions.len(),
                months = history.len(),
                error = %e,
                "forecast unavailable"
            ),
        }

        if let Err(e) = &decomposition {
            debug!(error = %e, "seasonal decomposition unavailable");
        }

        SalesReport {
            rows,
            transactions,
            history,
            forecast,
            decomposition,
        }
    }
}
