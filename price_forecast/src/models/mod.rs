//! Regression models for the price feature matrix

use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, NUM_FEATURES};
use crate::split::Split;
use std::fmt::Debug;
use std::time::{Duration, Instant};

pub mod boosting;
pub mod tree;

pub use boosting::{BoosterParams, GradientBoostedTrees, TrainedGradientBoostedTrees};

#[derive(Debug, Clone, Copy)]
enum Limit {
    Deadline { at: Instant, timeout: Duration },
    /// Expires once this many rounds have completed
    #[cfg(test)]
    Rounds(usize),
}

/// Wall-clock allowance for one fit, checked between boosting rounds
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingBudget {
    limit: Option<Limit>,
}

impl TrainingBudget {
    /// No deadline
    pub fn unlimited() -> Self {
        Self { limit: None }
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            limit: Some(Limit::Deadline {
                at: Instant::now() + timeout,
                timeout,
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn expiring_after_rounds(rounds: usize) -> Self {
        Self {
            limit: Some(Limit::Rounds(rounds)),
        }
    }

    /// Fail if the deadline has passed
    pub fn check(&self, rounds_completed: usize) -> Result<()> {
        let timeout_ms = match self.limit {
            Some(Limit::Deadline { at, timeout }) if Instant::now() >= at => timeout.as_millis(),
            #[cfg(test)]
            Some(Limit::Rounds(rounds)) if rounds_completed >= rounds => 0,
            _ => return Ok(()),
        };

        Err(ForecastError::TrainingTimeout {
            rounds_completed,
            timeout_ms,
        })
    }
}

/// Trained model that scores feature rows
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Predict the price for one row
    fn predict_row(&self, row: &FeatureRow) -> f64;

    /// Predict the price for each row
    fn predict(&self, rows: &[FeatureRow]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Number of splits on each feature, in matrix column order
    fn split_counts(&self) -> [usize; NUM_FEATURES];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a chronological split
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit on the training rows; validation rows only decide when to stop
    fn train(&self, split: &Split<'_>, budget: &TrainingBudget) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_budget_never_expires() {
        assert!(TrainingBudget::unlimited().check(500).is_ok());
        assert!(TrainingBudget::default().check(0).is_ok());
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let err = TrainingBudget::with_timeout(Duration::ZERO)
            .check(3)
            .unwrap_err();

        match err {
            ForecastError::TrainingTimeout {
                rounds_completed,
                timeout_ms,
            } => {
                assert_eq!(rounds_completed, 3);
                assert_eq!(timeout_ms, 0);
            }
            other => panic!("Expected TrainingTimeout, got {other:?}"),
        }
    }

    #[test]
    fn test_round_limit_expires_at_boundary() {
        let budget = TrainingBudget::expiring_after_rounds(5);
        assert!(budget.check(4).is_ok());
        assert!(matches!(
            budget.check(5),
            Err(ForecastError::TrainingTimeout {
                rounds_completed: 5,
                ..
            })
        ));
    }
}
