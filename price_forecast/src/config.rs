//! Forecast configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::data::DEFAULT_BASE_YEAR;
use crate::error::Result;
use crate::models::{BoosterParams, TrainingBudget};
use crate::split::{ChronologicalSplitter, DEFAULT_TRAIN_RATIO};
use serde::{Deserialize, Serialize};
use series_math::LagMode;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Year of the first price when the caller does not supply one
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    #[serde(default = "default_train_ratio")]
    pub train_ratio: f64,
    #[serde(default)]
    pub lag_mode: LagMode,
    #[serde(default)]
    pub booster: BoosterParams,
    /// Training deadline; unlimited when absent
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_base_year() -> i32 {
    DEFAULT_BASE_YEAR
}

fn default_train_ratio() -> f64 {
    DEFAULT_TRAIN_RATIO
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_year: default_base_year(),
            train_ratio: default_train_ratio(),
            lag_mode: LagMode::default(),
            booster: BoosterParams::default(),
            timeout_ms: None,
        }
    }
}

impl ForecastConfig {
    /// Read and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ForecastConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ChronologicalSplitter::new(self.train_ratio)?;
        self.booster.validate()
    }

    /// Fresh budget starting now
    pub fn budget(&self) -> TrainingBudget {
        match self.timeout_ms {
            Some(ms) => TrainingBudget::with_timeout(Duration::from_millis(ms)),
            None => TrainingBudget::unlimited(),
        }
    }
}
