//! Price series ingestion and property-table lookup

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Shortest series that still yields three lag features
pub const MIN_SERIES_LEN: usize = 4;

/// First year of the property table's price columns
pub const DEFAULT_BASE_YEAR: i32 = 2015;

/// Last price column the lookup reads by default
pub const DEFAULT_MAX_PRICE_YEAR: i32 = 2023;

const PRICE_PREFIX: &str = "price_";

/// Annual prices for one property segment, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesInput {
    /// Year of the first price
    base_year: i32,
    /// One price per consecutive year
    prices: Vec<f64>,
}

impl SeriesInput {
    /// Validate and wrap a price sequence.
    ///
    /// Rejects series shorter than [`MIN_SERIES_LEN`] and any NaN,
    /// infinite or negative price.
    pub fn new(base_year: i32, prices: Vec<f64>) -> Result<Self> {
        if prices.len() < MIN_SERIES_LEN {
            return Err(ForecastError::InsufficientData(format!(
                "need at least {} annual prices, got {}",
                MIN_SERIES_LEN,
                prices.len()
            )));
        }

        // the forecast year is base_year + len
        let span = i32::try_from(prices.len()).ok();
        if span.and_then(|n| base_year.checked_add(n)).is_none() {
            return Err(ForecastError::InvalidParameter(format!(
                "base year {} leaves no room for {} years and a forecast",
                base_year,
                prices.len()
            )));
        }

        series_math::ensure_finite(&prices)?;

        if let Some(index) = prices.iter().position(|p| *p < 0.0) {
            return Err(ForecastError::NumericInstability(format!(
                "negative price {} at position {}",
                prices[index], index
            )));
        }

        Ok(Self { base_year, prices })
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Year of the last observed price
    pub fn last_year(&self) -> i32 {
        self.base_year + self.prices.len() as i32 - 1
    }

    /// `(year, price)` pairs in order
    pub fn years(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.prices
            .iter()
            .enumerate()
            .map(move |(i, p)| (self.base_year + i as i32, *p))
    }
}

/// Lookup key for one property segment
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SegmentQuery {
    pub city: String,
    pub location: String,
    /// Plot size in marla
    pub marla: f64,
}

impl SegmentQuery {
    pub fn new(city: impl Into<String>, location: impl Into<String>, marla: f64) -> Result<Self> {
        let query = Self {
            city: city.into(),
            location: location.into(),
            marla,
        };
        query.validate()?;
        Ok(query)
    }

    fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() || self.location.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "City and location are required".to_string(),
            ));
        }
        if !self.marla.is_finite() || self.marla <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Invalid value for marla: {}",
                self.marla
            )));
        }
        Ok(())
    }
}

/// Property price table, loaded once and shared read-only between requests
#[derive(Debug, Clone)]
pub struct PropertyTable {
    df: DataFrame,
    /// Price columns with their years, ascending
    price_columns: Vec<(i32, String)>,
}

impl PropertyTable {
    /// Load the table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_with_max_year(path, DEFAULT_MAX_PRICE_YEAR)
    }

    /// Load the table, ignoring price columns after `max_year`
    pub fn from_csv_with_max_year<P: AsRef<Path>>(path: P, max_year: i32) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df, max_year)
    }

    /// Wrap an existing DataFrame
    pub fn from_dataframe(mut df: DataFrame, max_year: i32) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        df.set_column_names(names.as_slice())?;

        for required in ["city", "location", "area_marla"] {
            if !names.iter().any(|n| n == required) {
                return Err(ForecastError::DataError(format!(
                    "Missing required column '{}'",
                    required
                )));
            }
        }

        let price_columns = Self::detect_price_columns(&names, max_year);
        if price_columns.is_empty() {
            return Err(ForecastError::DataError(format!(
                "No price columns up to {} found in data",
                max_year
            )));
        }

        Ok(Self { df, price_columns })
    }

    /// Columns named `price_<year>` with `year <= max_year`, sorted by year
    fn detect_price_columns(names: &[String], max_year: i32) -> Vec<(i32, String)> {
        let mut columns: Vec<(i32, String)> = names
            .iter()
            .filter_map(|name| {
                let year = name.strip_prefix(PRICE_PREFIX)?;
                if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let year: i32 = year.parse().ok()?;
                (year <= max_year).then(|| (year, name.clone()))
            })
            .collect();
        columns.sort_by_key(|(year, _)| *year);
        columns
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Years covered by the selected price columns
    pub fn years(&self) -> Vec<i32> {
        self.price_columns.iter().map(|(year, _)| *year).collect()
    }

    /// Resolve a segment to its annual price series.
    ///
    /// City and location match case-insensitively, marla exactly.
    pub fn segment_series(&self, query: &SegmentQuery) -> Result<SeriesInput> {
        query.validate()?;
        debug!(
            city = %query.city,
            location = %query.location,
            marla = query.marla,
            "Resolving property segment"
        );

        let cities = self.df.column("city")?.cast(&DataType::Utf8)?;
        let locations = self.df.column("location")?.cast(&DataType::Utf8)?;
        let marlas = self.df.column("area_marla")?.cast(&DataType::Float64)?;
        let cities = cities.utf8()?;
        let locations = locations.utf8()?;
        let marlas = marlas.f64()?;

        let city = query.city.trim().to_lowercase();
        let location = query.location.trim().to_lowercase();

        let matches: Vec<usize> = (0..self.df.height())
            .filter(|&i| {
                let same_city = cities
                    .get(i)
                    .map_or(false, |c| c.trim().to_lowercase() == city);
                let same_location = locations
                    .get(i)
                    .map_or(false, |l| l.trim().to_lowercase() == location);
                same_city && same_location && marlas.get(i) == Some(query.marla)
            })
            .collect();

        let row = match matches.as_slice() {
            [] => {
                warn!(
                    city = %query.city,
                    location = %query.location,
                    marla = query.marla,
                    "No data available for the specified filters"
                );
                return Err(ForecastError::SegmentNotFound(format!(
                    "{} / {} / {} marla",
                    query.city, query.location, query.marla
                )));
            }
            [row] => *row,
            [row, ..] => {
                warn!(
                    matched = matches.len(),
                    "Several rows match the segment, using the first"
                );
                *row
            }
        };

        let mut prices = Vec::with_capacity(self.price_columns.len());
        for (year, name) in &self.price_columns {
            let column = self.df.column(name)?.cast(&DataType::Float64)?;
            let price = column.f64()?.get(row).ok_or_else(|| {
                ForecastError::DataError(format!("Missing price for {} in row {}", year, row))
            })?;
            prices.push(price);
        }

        let base_year = self.price_columns[0].0;
        SeriesInput::new(base_year, prices)
    }
}
