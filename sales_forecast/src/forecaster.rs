//! Monthly sales forecasting
//!
//! The forecaster treats the historical monthly values as one equally
//! spaced series, even where calendar months are missing, and labels the
//! projected values with the calendar months that follow the last
//! historical period.

use crate::error::{ModelFittingError, Result};
use crate::models::arima::{ArimaModel, ArimaOrder, Estimation};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::ForecastError;
use sales_core::{MonthlySeries, YearMonth};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Model order used for sales forecasts
pub const DEFAULT_ARIMA_ORDER: ArimaOrder = ArimaOrder::DEFAULT;

/// Number of months projected past the last historical period
pub const FORECAST_HORIZON: usize = 12;

/// The forecasting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub order: ArimaOrder,
    pub horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ARIMA_ORDER,
            horizon: FORECAST_HORIZON,
        }
    }
}

/// Projected monthly sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Forecast values labelled by calendar month
    pub series: MonthlySeries,
    /// Name of the fitted model
    pub model: String,
    /// Fitted AR coefficients, lag 1 first
    pub coefficients: Vec<f64>,
    pub estimation: Estimation,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.series.values()
    }

    pub fn periods(&self) -> Vec<YearMonth> {
        self.series.periods()
    }
}

/// Fits the configured model to a monthly series and projects it forward
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    model: ArimaModel,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        if config.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least one period".to_string(),
            ));
        }

        Ok(Self {
            config,
            model: ArimaModel::new(config.order)?,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the months following `history`.
    ///
    /// Fails with a model fitting error when the history is too short.
    pub fn forecast(&self, history: &MonthlySeries) -> Result<ForecastSeries> {
        let last = history.last_period().ok_or(ModelFittingError::InsufficientData {
            required: self.config.order.min_observations(),
            actual: 0,
        })?;

        let trained = self.model.train(&history.values())?;
        let values = trained.forecast(self.config.horizon)?;
        let series = MonthlySeries::contiguous(last.succ(), &values);

        info!(
            model = trained.name(),
            observations = history.len(),
            first = %last.succ(),
            horizon = self.config.horizon,
            "forecast generated"
        );

        Ok(ForecastSeries {
            series,
            model: trained.name().to_string(),
            coefficients: trained.coefficients().to_vec(),
            estimation: trained.estimation(),
        })
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
            model: ArimaModel::default(),
        }
    }
}
