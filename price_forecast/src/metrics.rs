//! Metrics for evaluating a fitted model on held-out years

use crate::error::{ForecastError, Result};
use crate::features::FEATURE_NAMES;
use crate::models::TrainedForecastModel;
use crate::split::Split;
use serde::Serialize;
use std::collections::BTreeMap;

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::DataError(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }
    Ok(())
}

/// Mean of squared differences
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean of absolute differences
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Held-out error and split usage of a fitted model
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Mean Squared Error on the validation years
    pub mse: f64,
    /// Mean Absolute Error on the validation years
    pub mae: f64,
    /// Root Mean Squared Error on the validation years
    pub rmse: f64,
    /// Split count per feature name; every feature is present
    pub feature_importance: BTreeMap<String, usize>,
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Metrics:")?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "Feature Importance (splits):")?;
        for (name, count) in &self.feature_importance {
            writeln!(f, "  {:<14} {}", name, count)?;
        }
        Ok(())
    }
}

/// Scores a fitted model against the validation part of its split
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn evaluate<M: TrainedForecastModel>(model: &M, split: &Split<'_>) -> Result<Diagnostics> {
        let predicted = model.predict(split.validation_rows);
        let actual = split.validation_targets;

        let mse = mean_squared_error(actual, &predicted)?;
        let mae = mean_absolute_error(actual, &predicted)?;
        if !mse.is_finite() {
            return Err(ForecastError::ModelFit(format!(
                "validation MSE is {}",
                mse
            )));
        }

        Ok(Diagnostics {
            mse,
            mae,
            rmse: mse.sqrt(),
            feature_importance: Self::feature_importance(model),
        })
    }

    /// All feature names with their split counts, zero when unused
    pub fn feature_importance<M: TrainedForecastModel>(model: &M) -> BTreeMap<String, usize> {
        FEATURE_NAMES
            .iter()
            .zip(model.split_counts())
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_regression_metrics() {
        let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

        assert_relative_eq!(mean_absolute_error(&actual, &predicted).unwrap(), 2.4);
        assert_relative_eq!(mean_squared_error(&actual, &predicted).unwrap(), 6.0);
        assert_relative_eq!(
            root_mean_squared_error(&actual, &predicted).unwrap(),
            6.0_f64.sqrt()
        );
    }

    #[test]
    fn test_metric_length_checks() {
        assert!(mean_squared_error(&[], &[]).is_err());
        assert!(mean_absolute_error(&[1.0, 2.0], &[1.0]).is_err());
    }
}
