//! Trailing moving averages
//!
//! Leading positions that do not yet have a full window average the
//! values seen so far, so a window-2 mean starts at the first value.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) over a trailing window
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Mean of the full window
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Mean of whatever the window currently holds
    pub fn partial_value(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(MathError::InsufficientData(
                "SMA has not seen any values".to_string(),
            ));
        }

        Ok(self.sum / self.values.len() as f64)
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Trailing mean of `data` with the given window, one value per input.
pub fn rolling_mean(data: &[f64], window: usize) -> Result<Vec<f64>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    let mut out = Vec::with_capacity(data.len());

    for &value in data {
        sma.update(value);
        out.push(sma.partial_value()?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        sma.update(2.0);
        sma.update(4.0);

        // Still not enough data
        assert!(sma.value().is_err());
        assert_eq!(sma.partial_value().unwrap(), 3.0);

        sma.update(6.0);
        assert_eq!(sma.value().unwrap(), 4.0);

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value().unwrap(), 6.0);

        sma.reset();
        assert!(sma.partial_value().is_err());
    }

    #[test]
    fn test_rolling_mean_window_two() {
        let data = [100.0, 110.0, 90.0, 120.0];
        let means = rolling_mean(&data, 2).unwrap();

        assert_eq!(means.len(), data.len());
        assert_relative_eq!(means[0], 100.0);
        assert_relative_eq!(means[1], 105.0);
        assert_relative_eq!(means[2], 100.0);
        assert_relative_eq!(means[3], 105.0);
    }

    #[test]
    fn test_rolling_mean_rejects_zero_window() {
        assert!(rolling_mean(&[1.0, 2.0], 0).is_err());
        assert!(rolling_mean(&[], 2).unwrap().is_empty());
    }
}
