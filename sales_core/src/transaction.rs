//! Sales transaction records

use crate::period::YearMonth;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sales event from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date the order was placed
    pub order_date: NaiveDate,
    /// Sales region
    pub region: String,
    /// Customer segment
    pub segment: String,
    /// Product sub-category
    pub sub_category: String,
    /// Sales amount
    pub sales: f64,
    /// Profit on the order
    pub profit: f64,
    /// Discount as a 0-1 fraction
    pub discount: f64,
    /// Units sold
    pub quantity: i64,
}

impl Transaction {
    /// Calendar month of the order date
    pub fn period(&self) -> YearMonth {
        YearMonth::from_date(self.order_date)
    }
}
