//! # Plotcast
//!
//! Annual property price forecasting. This crate ties the workspace together:
//! [`series_math`] holds the series arithmetic and [`price_forecast`] the
//! feature engineering, boosted-tree model and forecast pipeline.
//!
//! ## Example
//!
//! ```
//! use plotcast_workspace::{ForecastConfig, ForecastPipeline};
//!
//! let pipeline = ForecastPipeline::new(ForecastConfig::default()).unwrap();
//! let report = pipeline
//!     .run_prices(vec![100.0, 110.0, 105.0, 120.0, 125.0])
//!     .unwrap();
//!
//! assert_eq!(report.forecast.forecast_year(), 2020);
//! assert_eq!(report.forecast.combined_series().len(), 6);
//! ```

pub use price_forecast;
pub use series_math;

pub use price_forecast::{
    ErrorResponse, ForecastConfig, ForecastError, ForecastPipeline, ForecastReport,
    ForecastResponse, PropertyTable, SegmentQuery, SeriesInput,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_runs_a_forecast() {
        let pipeline = ForecastPipeline::new(ForecastConfig::default()).unwrap();
        let report = pipeline.run_prices(vec![10.0, 12.0, 11.0, 14.0]).unwrap();

        assert_eq!(report.forecast.forecast_year(), 2019);
        assert!(report.forecast.predicted_price().is_finite());
    }

    #[test]
    fn test_error_kinds_reach_the_boundary() {
        let err = SeriesInput::new(2015, vec![1.0]).unwrap_err();
        let response = ErrorResponse::from(&err);
        assert_eq!(response.kind, "insufficient_data");
    }
}
