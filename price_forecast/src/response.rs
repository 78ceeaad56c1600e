//! JSON shapes returned to the presentation layer

use crate::error::ForecastError;
use crate::metrics::Diagnostics;
use crate::pipeline::ForecastReport;
use crate::utils::format_price;
use serde::Serialize;

/// One chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    #[serde(rename = "Date")]
    pub date: i32,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// Successful forecast
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    /// Forecast price, two decimals with thousands separators
    pub prediction: String,
    #[serde(rename = "plotData")]
    pub plot_data: Vec<PlotPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

impl ForecastResponse {
    pub fn from_report(report: &ForecastReport, include_diagnostics: bool) -> Self {
        Self {
            prediction: format_price(report.forecast.predicted_price()),
            plot_data: report
                .forecast
                .combined_series()
                .iter()
                .map(|point| PlotPoint {
                    date: point.year,
                    price: point.price,
                })
                .collect(),
            diagnostics: include_diagnostics.then(|| report.diagnostics.clone()),
        }
    }
}

/// Failed forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub error: String,
}

impl From<&ForecastError> for ErrorResponse {
    fn from(err: &ForecastError) -> Self {
        Self {
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }
}
