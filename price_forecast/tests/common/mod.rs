#![allow(dead_code)]

use price_forecast::SeriesInput;

/// Ten years of prices for one segment, 2015 to 2024
pub const SAMPLE_PRICES: [f64; 10] = [
    100000.0, 105000.0, 99000.0, 110000.0, 115000.0, 120000.0, 118000.0, 125000.0, 130000.0,
    128000.0,
];

pub fn sample_series() -> SeriesInput {
    SeriesInput::new(2015, SAMPLE_PRICES.to_vec()).unwrap()
}
