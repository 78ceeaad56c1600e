//! # Price Forecast
//!
//! One-year-ahead forecasting of annual property prices with gradient-boosted
//! regression trees.
//!
//! ## Features
//!
//! - Feature engineering from a short price history (lags, rolling mean, percent change)
//! - Chronological train/validation split
//! - Gradient-boosted trees with validation early stopping and a training deadline
//! - Held-out error metrics and per-feature split counts
//! - Property-table lookup by city, location and plot size
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use price_forecast::{ForecastConfig, ForecastPipeline, SeriesInput};
//!
//! let series = SeriesInput::new(
//!     2015,
//!     vec![100000.0, 105000.0, 99000.0, 110000.0, 115000.0,
//!          120000.0, 118000.0, 125000.0, 130000.0, 128000.0],
//! )?;
//!
//! let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
//! let report = pipeline.run(&series)?;
//!
//! println!("{}: {:.2}", report.forecast.forecast_year(), report.forecast.predicted_price());
//! println!("{}", report.diagnostics);
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod response;
pub mod split;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{PropertyTable, SegmentQuery, SeriesInput};
pub use crate::error::ForecastError;
pub use crate::features::{FeatureBuilder, FeatureMatrix, FeatureRow, FEATURE_NAMES};
pub use crate::forecaster::{ForecastResult, Forecaster, YearPrice};
pub use crate::metrics::{Diagnostics, Evaluator};
pub use crate::models::{ForecastModel, GradientBoostedTrees, TrainedForecastModel, TrainingBudget};
pub use crate::pipeline::{ForecastPipeline, ForecastReport};
pub use crate::response::{ErrorResponse, ForecastResponse};
pub use crate::split::{ChronologicalSplitter, Split};
pub use series_math::LagMode;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
