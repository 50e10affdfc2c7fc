//! Error types for the aqi_forecast crate

use chrono::{DateTime, Utc};
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the aqi_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Requested horizon is not a positive number of hours
    #[error("Invalid horizon: {requested} hours requested, horizon must be positive")]
    InvalidHorizon { requested: usize },

    /// Historical series is shorter than the deepest configured lag requires
    #[error("Insufficient history: need at least {required} observations, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// The point predictor failed or returned a non-finite value
    #[error("Prediction failed at step {step} (last valid timestamp {last_timestamp}): {reason}")]
    PredictionFailure {
        /// Zero-based index of the failing step
        step: usize,
        /// Timestamp of the last value that was valid before the failing step
        last_timestamp: DateTime<Utc>,
        reason: String,
    },

    /// Configured features do not match what the predictor declares
    #[error("Feature mismatch: predictor expects {expected:?}, configured {configured:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        configured: Vec<String>,
    },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from CSV serialization
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from air-quality index math
    #[error(transparent)]
    Math(#[from] aqi_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}
