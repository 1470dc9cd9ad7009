//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Reasons an ARIMA model could not be fitted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelFittingError {
    /// Too few observations for the model order
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The series contains NaN or infinite values
    #[error("Series contains NaN or infinite values")]
    NonFiniteInput,

    /// Estimation produced no usable coefficients
    #[error("Estimation failed: {0}")]
    Degenerate(String),
}

/// Reasons a seasonal decomposition could not be computed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecompositionError {
    /// Fewer than two complete seasonal cycles
    #[error("Need at least {required} observations for two full cycles, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Season length below two
    #[error("Invalid season length {0}")]
    InvalidSeason(usize),

    /// The series contains NaN or infinite values
    #[error("Series contains NaN or infinite values")]
    NonFiniteInput,
}

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A required dataset column is absent
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// An order date could not be parsed
    #[error("Unparseable order date '{value}' in row {row}")]
    DateParse { row: usize, value: String },

    /// Model fitting failed
    #[error("Model fitting error: {0}")]
    ModelFitting(#[from] ModelFittingError),

    /// Seasonal decomposition failed
    #[error("Decomposition error: {0}")]
    Decomposition(#[from] DecompositionError),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error writing JSON output
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ForecastError {
    /// Whether this error came from fitting the forecasting model
    pub fn is_fitting_failure(&self) -> bool {
        matches!(self, ForecastError::ModelFitting(_))
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
