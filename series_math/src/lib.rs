//! # Series Math
//!
//! Numeric building blocks for short, evenly spaced price series.
//! This crate provides the lag, rolling-window and percent-change
//! transforms used to turn a price history into model features.

use thiserror::Error;

pub mod lags;
pub mod moving_averages;
pub mod returns;

pub use lags::{lagged, LagMode};
pub use moving_averages::{rolling_mean, SimpleMovingAverage};
pub use returns::{fractional_change, pct_change};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Non-finite value {value} at position {index}")]
    NonFinite { index: usize, value: f64 },
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Fail on the first NaN or infinite value in `data`.
pub fn ensure_finite(data: &[f64]) -> Result<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MathError::NonFinite {
            index,
            value: data[index],
        }),
        None => Ok(()),
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(data.iter().sum::<f64>() / data.len() as f64)
    }
}
