//! Supervised feature construction from an annual price series
//!
//! Each observed year becomes one row of
//! `(year, lag1, lag2, lag3, rolling_avg2, pct_change)` whose target is the
//! price of that same year. With [`LagMode::Circular`] the first three rows
//! borrow their lags from the end of the series instead of leaving gaps.

use crate::data::{SeriesInput, MIN_SERIES_LEN};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use series_math::lags::lag_at;
use series_math::{fractional_change, pct_change, rolling_mean, LagMode};

/// Width of a feature row
pub const NUM_FEATURES: usize = 6;

/// Column names in matrix order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "year",
    "lag_price_1",
    "lag_price_2",
    "lag_price_3",
    "rolling_avg_2",
    "pct_change",
];

const ROLLING_WINDOW: usize = 2;

/// One row of model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub year: i32,
    pub lag1: f64,
    pub lag2: f64,
    pub lag3: f64,
    pub rolling_avg2: f64,
    pub pct_change: f64,
}

impl FeatureRow {
    /// Dense values in [`FEATURE_NAMES`] order
    pub fn values(&self) -> [f64; NUM_FEATURES] {
        [
            self.year as f64,
            self.lag1,
            self.lag2,
            self.lag3,
            self.rolling_avg2,
            self.pct_change,
        ]
    }
}

/// Feature rows with their aligned targets
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<FeatureRow>,
    targets: Vec<f64>,
}

impl FeatureMatrix {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Turns a price series into a [`FeatureMatrix`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    lag_mode: LagMode,
}

impl FeatureBuilder {
    pub fn new(lag_mode: LagMode) -> Self {
        Self { lag_mode }
    }

    /// Build one row per observed year; targets are the prices unchanged.
    pub fn build(&self, series: &SeriesInput) -> Result<FeatureMatrix> {
        let prices = series.prices();
        if prices.len() < MIN_SERIES_LEN {
            return Err(ForecastError::InsufficientData(format!(
                "need at least {} annual prices to build lag features, got {}",
                MIN_SERIES_LEN,
                prices.len()
            )));
        }

        let rolling = rolling_mean(prices, ROLLING_WINDOW)?;
        let changes = pct_change(prices);

        let rows = (0..prices.len())
            .map(|i| FeatureRow {
                year: series.base_year() + i as i32,
                lag1: lag_at(prices, i, 1, self.lag_mode),
                lag2: lag_at(prices, i, 2, self.lag_mode),
                lag3: lag_at(prices, i, 3, self.lag_mode),
                rolling_avg2: rolling[i],
                pct_change: changes[i],
            })
            .collect();

        Ok(FeatureMatrix {
            rows,
            targets: prices.to_vec(),
        })
    }

    /// Row for the year after the last observation, built from the
    /// series tail only.
    pub fn future_row(series: &SeriesInput) -> FeatureRow {
        let prices = series.prices();
        let last = prices.len() - 1;

        FeatureRow {
            year: series.base_year() + prices.len() as i32,
            lag1: prices[last],
            lag2: prices[last - 1],
            lag3: prices[last - 2],
            rolling_avg2: (prices[last] + prices[last - 1]) / 2.0,
            pct_change: fractional_change(prices[last - 1], prices[last]),
        }
    }
}
