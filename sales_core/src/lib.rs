//! # Sales Core
//!
//! Domain types and pure computations for retail sales reporting.
//! This crate turns dated transaction records into a monthly sales series
//! and computes the descriptive breakdowns used by the reports.

use thiserror::Error;

pub mod aggregate;
pub mod insights;
pub mod period;
pub mod series;
pub mod transaction;

pub use aggregate::MonthlyAggregator;
pub use insights::{CorrelationMatrix, Dimension, Kpis, Measure};
pub use period::YearMonth;
pub use series::{MonthlyPoint, MonthlySeries};
pub use transaction::Transaction;

/// Errors raised while building domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid month {0}: expected a value between 1 and 12")]
    InvalidMonth(u32),

    #[error("Year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),

    #[error("Invalid period label '{0}': expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("Periods must be strictly increasing: {previous} is followed by {next}")]
    UnorderedPeriods { previous: YearMonth, next: YearMonth },
}

/// Result type for sales core operations
pub type Result<T> = std::result::Result<T, CoreError>;
