//! Lagged copies of a series
//!
//! Two ways to fill the positions that have no earlier observation:
//! - Circular: wrap around and borrow from the end of the series
//! - Padded: leave them as NaN

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// How positions before the start of the series are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LagMode {
    /// `lag[i] = data[(i - k) mod n]`
    #[default]
    Circular,
    /// `lag[i] = NaN` for `i < k`
    Padded,
}

/// Value `k` steps before position `index`, filled according to `mode`.
///
/// `index` must be inside `data`.
pub fn lag_at(data: &[f64], index: usize, k: usize, mode: LagMode) -> f64 {
    let n = data.len();
    if index >= k {
        return data[index - k];
    }
    match mode {
        LagMode::Circular => data[(index + n - k % n) % n],
        LagMode::Padded => f64::NAN,
    }
}

/// Shift `data` forward by `k` positions.
///
/// The output has the same length as the input.
pub fn lagged(data: &[f64], k: usize, mode: LagMode) -> Result<Vec<f64>> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot lag an empty series".to_string(),
        ));
    }
    if k == 0 {
        return Err(MathError::InvalidInput(
            "Lag must be greater than zero".to_string(),
        ));
    }

    Ok((0..data.len()).map(|i| lag_at(data, i, k, mode)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, vec![5.0, 1.0, 2.0, 3.0, 4.0])]
    #[case(2, vec![4.0, 5.0, 1.0, 2.0, 3.0])]
    #[case(3, vec![3.0, 4.0, 5.0, 1.0, 2.0])]
    #[case(6, vec![5.0, 1.0, 2.0, 3.0, 4.0])]
    fn test_circular_lag(#[case] k: usize, #[case] expected: Vec<f64>) {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(lagged(&data, k, LagMode::Circular).unwrap(), expected);
    }

    #[test]
    fn test_padded_lag() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let shifted = lagged(&data, 2, LagMode::Padded).unwrap();

        assert!(shifted[0].is_nan());
        assert!(shifted[1].is_nan());
        assert_eq!(&shifted[2..], &[1.0, 2.0]);
    }

    #[test]
    fn test_lag_rejects_bad_input() {
        assert!(lagged(&[], 1, LagMode::Circular).is_err());
        assert!(lagged(&[1.0], 0, LagMode::Circular).is_err());
    }
}
