//! Error types for the demand_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer observations than the minimum history the models require
    #[error("at least {required} months of historical data required")]
    InsufficientHistory { required: usize, actual: usize },

    /// The underlying model failed during fitting or prediction
    #[error("model fit failed: {0}")]
    FitFailure(String),

    /// No records exist for the requested product
    #[error("no demand data: {0}")]
    EmptyInput(String),

    /// Error from invalid parameters
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
