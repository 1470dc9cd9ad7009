//! Forecasting models for monthly sales series

use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point forecasts for the next `horizon` periods
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on an equally spaced series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the observed values, oldest first
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
