//! # Retail Sales
//!
//! `retail_sales_workspace` bundles the retail sales crates: domain types
//! and aggregation from `sales_core`, loading and forecasting from
//! `sales_forecast`.
//!
//! ## Example
//!
//! ```
//! use retail_sales_workspace::sales_core::{MonthlyAggregator, MonthlySeries, YearMonth};
//! use retail_sales_workspace::sales_forecast::Forecaster;
//!
//! let history = MonthlySeries::contiguous(YearMonth::new(2015, 1).unwrap(), &[1000.0; 24]);
//! let forecast = Forecaster::default().forecast(&history).unwrap();
//! assert_eq!(forecast.len(), 12);
//! assert_eq!(forecast.periods()[0], YearMonth::new(2017, 1).unwrap());
//!
//! assert!(MonthlyAggregator::new().aggregate(&[]).is_empty());
//! ```

pub use sales_core;
pub use sales_forecast;

pub use sales_core::{MonthlySeries, Transaction, YearMonth};
pub use sales_forecast::{ForecastError, ForecastSeries, Pipeline, SalesReport, TransactionFilter};
