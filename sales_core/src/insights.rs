//! Descriptive statistics over transaction records
//!
//! Headline KPIs, per-dimension totals ranked largest first, and the
//! pairwise correlation of the numeric columns.

use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fmt;

/// Number of groups shown in a "top" ranking unless told otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// Headline figures for a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Mean discount fraction, `None` when there are no transactions
    pub average_discount: Option<f64>,
    pub transactions: usize,
}

impl Kpis {
    pub fn compute(records: &[Transaction]) -> Self {
        let total_sales = records.iter().map(|r| r.sales).sum();
        let total_profit = records.iter().map(|r| r.profit).sum();
        let average_discount = if records.is_empty() {
            None
        } else {
            Some(records.iter().map(|r| r.discount).mean())
        };

        Self {
            total_sales,
            total_profit,
            average_discount,
            transactions: records.len(),
        }
    }
}

/// Categorical column used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Region,
    Segment,
    SubCategory,
}

impl Dimension {
    fn key<'a>(&self, record: &'a Transaction) -> &'a str {
        match self {
            Dimension::Region => &record.region,
            Dimension::Segment => &record.segment,
            Dimension::SubCategory => &record.sub_category,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Region => "Region",
            Dimension::Segment => "Segment",
            Dimension::SubCategory => "Sub-Category",
        };
        f.write_str(name)
    }
}

/// Numeric column summed within each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    Sales,
    Profit,
}

impl Measure {
    fn value(&self, record: &Transaction) -> f64 {
        match self {
            Measure::Sales => record.sales,
            Measure::Profit => record.profit,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Sales => f.write_str("Sales"),
            Measure::Profit => f.write_str("Profit"),
        }
    }
}

/// A group label with its summed measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub group: String,
    pub total: f64,
}

/// Sum `measure` per distinct value of `dimension`, largest total first.
///
/// Groups with equal totals stay in alphabetical order.
pub fn totals_by(records: &[Transaction], dimension: Dimension, measure: Measure) -> Vec<GroupTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(dimension.key(record)).or_insert(0.0) += measure.value(record);
    }

    let mut totals: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(group, total)| GroupTotal {
            group: group.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// The `n` largest groups of [`totals_by`]
pub fn top_n(
    records: &[Transaction],
    dimension: Dimension,
    measure: Measure,
    n: usize,
) -> Vec<GroupTotal> {
    let mut totals = totals_by(records, dimension, measure);
    totals.truncate(n);
    totals
}

/// (discount, profit) pairs, one per transaction
pub fn discount_profit_points(records: &[Transaction]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.discount, r.profit)).collect()
}

/// Pearson correlation between Sales, Profit, Discount and Quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major coefficients; NaN where the coefficient is undefined
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub const COLUMNS: [&'static str; 4] = ["Sales", "Profit", "Discount", "Quantity"];

    pub fn compute(records: &[Transaction]) -> Self {
        let columns: [Vec<f64>; 4] = [
            records.iter().map(|r| r.sales).collect(),
            records.iter().map(|r| r.profit).collect(),
            records.iter().map(|r| r.discount).collect(),
            records.iter().map(|r| r.quantity as f64).collect(),
        ];

        let values = columns
            .iter()
            .map(|x| columns.iter().map(|y| pearson(x, y)).collect())
            .collect();

        Self {
            labels: Self::COLUMNS.iter().map(|c| c.to_string()).collect(),
            values,
        }
    }

    /// Coefficient between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[i][j])
    }
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 || x.len() != y.len() {
        return f64::NAN;
    }

    let denom = x.std_dev() * y.std_dev();
    if denom == 0.0 || !denom.is_finite() {
        return f64::NAN;
    }
    x.covariance(y) / denom
}
