//! # Sales Forecast
//!
//! Loads a retail sales dataset, reduces it to a monthly sales series and
//! projects that series forward with an ARIMA model.
//!
//! ## Features
//!
//! - CSV dataset loading with missing-value cleaning
//! - Region and segment filtering ahead of aggregation
//! - Fixed ARIMA(5,1,0) forecasting over a 12 month horizon
//! - Additive seasonal decomposition of the monthly history
//! - CSV and JSON export of history, forecast and breakdowns
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::{Pipeline, TransactionFilter};
//!
//! let pipeline = Pipeline::default();
//! let filter = TransactionFilter::all().with_regions(["West", "East"]);
//! let report = pipeline.run("data/superstore.csv", &filter)?;
//!
//! for point in &report.history {
//!     println!("{} {:.2}", point.period, point.value);
//! }
//! match &report.forecast {
//!     Ok(forecast) => println!("next month: {:.2}", forecast.values()[0]),
//!     Err(e) => eprintln!("no forecast: {e}"),
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod data;
pub mod decomposition;
pub mod error;
pub mod export;
pub mod forecaster;
pub mod models;
pub mod pipeline;

// Re-export commonly used types
pub use crate::data::{DataLoader, TransactionSet};
pub use crate::decomposition::{decompose_additive, SeasonalDecomposition, SEASONAL_PERIOD};
pub use crate::error::{DecompositionError, ForecastError, ModelFittingError};
pub use crate::forecaster::{
    ForecastConfig, ForecastSeries, Forecaster, DEFAULT_ARIMA_ORDER, FORECAST_HORIZON,
};
pub use crate::models::arima::{ArimaModel, ArimaOrder};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::pipeline::{Pipeline, RowCounts, SalesReport, TransactionFilter};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
