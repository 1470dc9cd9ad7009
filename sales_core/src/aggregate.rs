//! Monthly aggregation of transaction records

use crate::period::YearMonth;
use crate::series::{MonthlyPoint, MonthlySeries};
use crate::transaction::Transaction;
use std::collections::BTreeMap;

/// Reduces transactions to total sales per calendar month
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sum sales per calendar month of the order date.
    ///
    /// Only months with at least one transaction appear in the output.
    pub fn aggregate(&self, records: &[Transaction]) -> MonthlySeries {
        let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.period()).or_insert(0.0) += record.sales;
        }

        let points = totals
            .into_iter()
            .map(|(period, value)| MonthlyPoint::new(period, value))
            .collect();

        // BTreeMap keys are unique and sorted
        MonthlySeries::from_sorted(points)
    }
}

/// Convenience wrapper around [`MonthlyAggregator::aggregate`]
pub fn monthly_sales(records: &[Transaction]) -> MonthlySeries {
    MonthlyAggregator.aggregate(records)
}
