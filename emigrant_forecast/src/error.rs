//! Error types for the emigrant_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the emigrant_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to a persisted model bundle
    #[error("Bundle error: {0}")]
    BundleError(String),

    /// Error from invalid parameters
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Category not present in the loaded bundle
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

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
