//! End-to-end forecast for one request
//!
//! features → chronological split → boosted fit → diagnostics → forecast.
//! Everything built here lives only for the duration of [`ForecastPipeline::run`].

use crate::config::ForecastConfig;
use crate::data::{PropertyTable, SegmentQuery, SeriesInput};
use crate::error::Result;
use crate::features::FeatureBuilder;
use crate::forecaster::{ForecastResult, Forecaster};
use crate::metrics::{Diagnostics, Evaluator};
use crate::models::{ForecastModel, GradientBoostedTrees};
use crate::split::ChronologicalSplitter;
use serde::Serialize;
use tracing::debug;

/// Forecast plus the diagnostics gathered while producing it
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub forecast: ForecastResult,
    pub diagnostics: Diagnostics,
    /// Trees kept after early stopping
    pub trees: usize,
    /// Rounds trained before stopping
    pub rounds_run: usize,
}

#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
    builder: FeatureBuilder,
    splitter: ChronologicalSplitter,
    model: GradientBoostedTrees,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let builder = FeatureBuilder::new(config.lag_mode);
        let splitter = ChronologicalSplitter::new(config.train_ratio)?;
        let model = GradientBoostedTrees::new(config.booster.clone())?;

        Ok(Self {
            config,
            builder,
            splitter,
            model,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast a bare price list starting at the configured base year
    pub fn run_prices(&self, prices: Vec<f64>) -> Result<ForecastReport> {
        let series = SeriesInput::new(self.config.base_year, prices)?;
        self.run(&series)
    }

    /// Look the segment up in `table`, then forecast it
    pub fn run_segment(&self, table: &PropertyTable, query: &SegmentQuery) -> Result<ForecastReport> {
        let series = table.segment_series(query)?;
        self.run(&series)
    }

    pub fn run(&self, series: &SeriesInput) -> Result<ForecastReport> {
        debug!(
            base_year = series.base_year(),
            years = series.len(),
            "Forecast request"
        );

        let matrix = self.builder.build(series)?;
        let split = self.splitter.split(&matrix)?;

        let trained = self.model.train(&split, &self.config.budget())?;

        let diagnostics = Evaluator::evaluate(&trained, &split)?;
        debug!(mse = diagnostics.mse, "Validation MSE");
        debug!(importance = ?diagnostics.feature_importance, "Feature importance");

        let forecast = Forecaster::new(&trained).forecast(series, None)?;
        debug!(series = ?forecast.combined_series(), "Combined data for plotting");

        Ok(ForecastReport {
            forecast,
            diagnostics,
            trees: trained.num_trees(),
            rounds_run: trained.rounds_run(),
        })
    }
}
