//! Chronological train/validation split

use crate::error::{ForecastError, Result};
use crate::features::{FeatureMatrix, FeatureRow};

/// Fraction of rows used for training by default
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Borrowed view of a split feature matrix; training rows come first in time
#[derive(Debug, Clone, Copy)]
pub struct Split<'a> {
    pub train_rows: &'a [FeatureRow],
    pub train_targets: &'a [f64],
    pub validation_rows: &'a [FeatureRow],
    pub validation_targets: &'a [f64],
}

impl Split<'_> {
    /// Index of the first validation row
    pub fn index(&self) -> usize {
        self.train_rows.len()
    }
}

/// Splits at `floor(train_ratio * n)` without shuffling
#[derive(Debug, Clone, Copy)]
pub struct ChronologicalSplitter {
    train_ratio: f64,
}

impl Default for ChronologicalSplitter {
    fn default() -> Self {
        Self {
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }
}

impl ChronologicalSplitter {
    pub fn new(train_ratio: f64) -> Result<Self> {
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Train ratio must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self { train_ratio })
    }

    pub fn split_index(&self, n: usize) -> usize {
        (n as f64 * self.train_ratio).floor() as usize
    }

    pub fn split<'a>(&self, matrix: &'a FeatureMatrix) -> Result<Split<'a>> {
        let n = matrix.len();
        let index = self.split_index(n);
        if index == 0 || index >= n {
            return Err(ForecastError::DegenerateSplit(format!(
                "{} rows at ratio {} leave an empty {} set",
                n,
                self.train_ratio,
                if index == 0 { "training" } else { "validation" }
            )));
        }

        let (train_rows, validation_rows) = matrix.rows().split_at(index);
        let (train_targets, validation_targets) = matrix.targets().split_at(index);

        Ok(Split {
            train_rows,
            train_targets,
            validation_rows,
            validation_targets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_index() {
        let splitter = ChronologicalSplitter::default();
        assert_eq!(splitter.split_index(10), 8);
        assert_eq!(splitter.split_index(5), 4);
        assert_eq!(splitter.split_index(4), 3);
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(ChronologicalSplitter::new(0.0).is_err());
        assert!(ChronologicalSplitter::new(1.0).is_err());
        assert!(ChronologicalSplitter::new(f64::NAN).is_err());
        assert!(ChronologicalSplitter::new(0.5).is_ok());
    }
}
