//! Gradient-boosted regression trees with validation early stopping
//!
//! Squared-error loss. Every round fits one tree to the residual gradients
//! of a row subsample, restricted to a column subsample. After each round
//! the validation RMSE is measured; once it has not improved for
//! `early_stopping_rounds` rounds, boosting stops and the ensemble is cut
//! back to the best round.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, NUM_FEATURES};
use crate::metrics::root_mean_squared_error;
use crate::models::tree::{RegressionTree, Sample, TreeParams};
use crate::models::{ForecastModel, TrainedForecastModel, TrainingBudget};
use crate::split::Split;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Boosting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterParams {
    /// Upper bound on boosting rounds
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Fraction of training rows sampled per tree
    pub subsample: f64,
    /// Fraction of feature columns sampled per tree
    pub colsample_bytree: f64,
    /// Rounds without validation improvement before stopping
    pub early_stopping_rounds: usize,
    pub reg_lambda: f64,
    pub min_child_weight: f64,
    pub seed: u64,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            n_estimators: 1000,
            learning_rate: 0.01,
            max_depth: 6,
            subsample: 0.8,
            colsample_bytree: 0.8,
            early_stopping_rounds: 10,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            seed: 0,
        }
    }
}

impl BoosterParams {
    pub fn validate(&self) -> Result<()> {
        let fraction = |v: f64| v > 0.0 && v <= 1.0;

        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be greater than zero".to_string(),
            ));
        }
        if !fraction(self.learning_rate) {
            return Err(ForecastError::InvalidParameter(
                "learning_rate must be in (0, 1]".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        if !fraction(self.subsample) || !fraction(self.colsample_bytree) {
            return Err(ForecastError::InvalidParameter(
                "subsample and colsample_bytree must be in (0, 1]".to_string(),
            ));
        }
        if self.early_stopping_rounds == 0 {
            return Err(ForecastError::InvalidParameter(
                "early_stopping_rounds must be greater than zero".to_string(),
            ));
        }
        if !(self.reg_lambda >= 0.0) || !(self.min_child_weight >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "reg_lambda and min_child_weight must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            reg_lambda: self.reg_lambda,
            min_child_weight: self.min_child_weight,
            learning_rate: self.learning_rate,
        }
    }
}

/// Untrained gradient-boosted tree regressor
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    name: String,
    params: BoosterParams,
}

/// Fitted ensemble, cut back to its best validation round
#[derive(Debug, Clone)]
pub struct TrainedGradientBoostedTrees {
    name: String,
    base_score: f64,
    trees: Vec<RegressionTree>,
    best_iteration: usize,
    best_score: f64,
    rounds_run: usize,
}

impl GradientBoostedTrees {
    pub fn new(params: BoosterParams) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            name: format!(
                "Gradient Boosted Trees (eta={}, depth={})",
                params.learning_rate, params.max_depth
            ),
            params,
        })
    }

    pub fn params(&self) -> &BoosterParams {
        &self.params
    }
}

impl Default for GradientBoostedTrees {
    fn default() -> Self {
        Self {
            name: "Gradient Boosted Trees (eta=0.01, depth=6)".to_string(),
            params: BoosterParams::default(),
        }
    }
}

fn dense(rows: &[FeatureRow]) -> Vec<Sample> {
    rows.iter().map(FeatureRow::values).collect()
}

/// `max(1, floor(fraction * n))` sorted indices out of `0..n`
fn sample_indices(rng: &mut StdRng, n: usize, fraction: f64) -> Vec<usize> {
    let k = ((n as f64 * fraction).floor() as usize).clamp(1, n);
    if k == n {
        return (0..n).collect();
    }
    let mut picked = sample(rng, n, k).into_vec();
    picked.sort_unstable();
    picked
}

impl ForecastModel for GradientBoostedTrees {
    type Trained = TrainedGradientBoostedTrees;

    fn train(&self, split: &Split<'_>, budget: &TrainingBudget) -> Result<Self::Trained> {
        let train_x = dense(split.train_rows);
        let val_x = dense(split.validation_rows);
        let train_y = split.train_targets;
        let val_y = split.validation_targets;

        if train_x.is_empty() || val_x.is_empty() {
            return Err(ForecastError::DegenerateSplit(
                "training and validation rows are both required".to_string(),
            ));
        }
        if train_x.len() != train_y.len() || val_x.len() != val_y.len() {
            return Err(ForecastError::DataError(
                "feature rows and targets differ in length".to_string(),
            ));
        }

        let base_score = series_math::mean(train_y).unwrap_or_default();
        if !base_score.is_finite() {
            return Err(ForecastError::ModelFit(
                "training targets have no finite mean".to_string(),
            ));
        }

        let params = &self.params;
        let tree_params = params.tree_params();
        let mut rng = StdRng::seed_from_u64(params.seed);

        let mut train_pred = vec![base_score; train_x.len()];
        let mut val_pred = vec![base_score; val_x.len()];
        let hessians = vec![1.0; train_x.len()];
        let mut gradients = vec![0.0; train_x.len()];

        let mut trees = Vec::new();
        let mut best_score = f64::INFINITY;
        let mut best_iteration = 0;

        for round in 0..params.n_estimators {
            budget.check(round)?;

            for (g, (p, y)) in gradients.iter_mut().zip(train_pred.iter().zip(train_y)) {
                *g = p - y;
            }

            let rows = sample_indices(&mut rng, train_x.len(), params.subsample);
            let features = sample_indices(&mut rng, NUM_FEATURES, params.colsample_bytree);
            let tree = RegressionTree::fit(
                &train_x,
                &gradients,
                &hessians,
                &rows,
                &features,
                &tree_params,
            );

            for (p, x) in train_pred.iter_mut().zip(&train_x) {
                *p += tree.predict(x);
            }
            for (p, x) in val_pred.iter_mut().zip(&val_x) {
                *p += tree.predict(x);
            }
            trees.push(tree);

            let score = root_mean_squared_error(val_y, &val_pred)?;
            if !score.is_finite() {
                return Err(ForecastError::ModelFit(format!(
                    "validation RMSE became {} at round {}",
                    score, round
                )));
            }

            if score < best_score {
                best_score = score;
                best_iteration = round;
            } else if round - best_iteration >= params.early_stopping_rounds {
                debug!(round, best_iteration, best_score, "Early stopping");
                break;
            }
        }

        let rounds_run = trees.len();
        trees.truncate(best_iteration + 1);
        info!(
            rounds_run,
            best_iteration, best_score, "Gradient boosting finished"
        );

        Ok(TrainedGradientBoostedTrees {
            name: self.name.clone(),
            base_score,
            trees,
            best_iteration,
            best_score,
            rounds_run,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedGradientBoostedTrees {
    /// Starting prediction before any tree
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Zero-based round with the lowest validation RMSE
    pub fn best_iteration(&self) -> usize {
        self.best_iteration
    }

    /// Validation RMSE at the best round
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Rounds trained before stopping, including those discarded
    pub fn rounds_run(&self) -> usize {
        self.rounds_run
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl TrainedForecastModel for TrainedGradientBoostedTrees {
    fn predict_row(&self, row: &FeatureRow) -> f64 {
        let x = row.values();
        self.base_score + self.trees.iter().map(|tree| tree.predict(&x)).sum::<f64>()
    }

    fn split_counts(&self) -> [usize; NUM_FEATURES] {
        self.trees.iter().fold([0; NUM_FEATURES], |mut acc, tree| {
            for (a, c) in acc.iter_mut().zip(tree.split_counts()) {
                *a += c;
            }
            acc
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
