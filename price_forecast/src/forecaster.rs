//! One-year-ahead forecast from a fitted model

use crate::data::SeriesInput;
use crate::error::{ForecastError, Result};
use crate::features::{FeatureBuilder, FeatureRow};
use crate::models::TrainedForecastModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One point of the historical-plus-forecast series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPrice {
    pub year: i32,
    pub price: f64,
}

/// Forecast for the year after the last observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    predicted_price: f64,
    forecast_year: i32,
    combined_series: Vec<YearPrice>,
}

impl ForecastResult {
    pub fn predicted_price(&self) -> f64 {
        self.predicted_price
    }

    pub fn forecast_year(&self) -> i32 {
        self.forecast_year
    }

    /// Observed years followed by the forecast year
    pub fn combined_series(&self) -> &[YearPrice] {
        &self.combined_series
    }
}

/// Scores the next year with an already fitted model
#[derive(Debug)]
pub struct Forecaster<'m, M: TrainedForecastModel> {
    model: &'m M,
}

impl<'m, M: TrainedForecastModel> Forecaster<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// Feature row the forecast is made from
    pub fn next_row(series: &SeriesInput) -> FeatureRow {
        FeatureBuilder::future_row(series)
    }

    /// Forecast the next year and append it to the history.
    ///
    /// `upper_year` can only cut the combined series shorter; nothing past
    /// the forecast year is ever included.
    pub fn forecast(&self, series: &SeriesInput, upper_year: Option<i32>) -> Result<ForecastResult> {
        let row = Self::next_row(series);
        let predicted_price = self.model.predict_row(&row);
        if !predicted_price.is_finite() {
            return Err(ForecastError::ModelFit(format!(
                "{} produced a non-finite forecast for {}",
                self.model.name(),
                row.year
            )));
        }

        let last_year = upper_year.map_or(row.year, |upper| upper.min(row.year));
        let combined_series: Vec<YearPrice> = series
            .years()
            .chain(std::iter::once((row.year, predicted_price)))
            .filter(|(year, _)| *year <= last_year)
            .map(|(year, price)| YearPrice { year, price })
            .collect();

        debug!(
            forecast_year = row.year,
            predicted_price,
            points = combined_series.len(),
            "Combined series for plotting"
        );

        Ok(ForecastResult {
            predicted_price,
            forecast_year: row.year,
            combined_series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NUM_FEATURES;

    /// Predicts the previous year's price
    #[derive(Debug)]
    struct LastValue;

    impl TrainedForecastModel for LastValue {
        fn predict_row(&self, row: &FeatureRow) -> f64 {
            row.lag1
        }

        fn split_counts(&self) -> [usize; NUM_FEATURES] {
            [0; NUM_FEATURES]
        }

        fn name(&self) -> &str {
            "last value"
        }
    }

    #[test]
    fn test_forecast_appends_one_year() {
        let series = SeriesInput::new(2015, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let result = Forecaster::new(&LastValue).forecast(&series, None).unwrap();

        assert_eq!(result.forecast_year(), 2020);
        assert_eq!(result.predicted_price(), 5.0);
        assert_eq!(result.combined_series().len(), 6);
        assert_eq!(
            result.combined_series().last(),
            Some(&YearPrice {
                year: 2020,
                price: 5.0
            })
        );
    }

    #[test]
    fn test_upper_year_only_truncates() {
        let series = SeriesInput::new(2015, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let forecaster = Forecaster::new(&LastValue);

        let extended = forecaster.forecast(&series, Some(2030)).unwrap();
        assert_eq!(extended.combined_series().len(), 5);

        let cut = forecaster.forecast(&series, Some(2017)).unwrap();
        assert_eq!(cut.combined_series().len(), 3);
        assert_eq!(cut.forecast_year(), 2019);
    }
}
