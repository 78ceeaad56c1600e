//! Error types for the price_forecast crate

use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Series too short to build lag features
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Train or validation partition would be empty
    #[error("Degenerate split: {0}")]
    DegenerateSplit(String),

    /// Non-finite or negative values in the input
    #[error("Numeric instability: {0}")]
    NumericInstability(String),

    /// Training ran past its deadline
    #[error("Training timed out after {rounds_completed} rounds ({timeout_ms} ms budget)")]
    TrainingTimeout {
        rounds_completed: usize,
        timeout_ms: u128,
    },

    /// The ensemble fit produced an unusable state
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data loading or shape
    #[error("Data error: {0}")]
    DataError(String),

    /// No property rows match the requested segment
    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from JSON encoding or decoding
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ForecastError {
    /// Stable category name, used at the service boundary
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::InsufficientData(_) => "insufficient_data",
            ForecastError::DegenerateSplit(_) => "degenerate_split",
            ForecastError::NumericInstability(_) => "numeric_instability",
            ForecastError::TrainingTimeout { .. } => "training_timeout",
            ForecastError::ModelFit(_) => "model_fit",
            ForecastError::InvalidParameter(_) => "invalid_parameter",
            ForecastError::DataError(_) => "data_error",
            ForecastError::SegmentNotFound(_) => "segment_not_found",
            ForecastError::IoError(_) => "io_error",
            ForecastError::PolarsError(_) => "polars_error",
            ForecastError::JsonError(_) => "json_error",
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            MathError::NonFinite { index, value } => ForecastError::NumericInstability(format!(
                "non-finite value {value} at position {index}"
            )),
        }
    }
}
