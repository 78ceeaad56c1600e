mod common;

use common::{sample_series, SAMPLE_PRICES};
use price_forecast::{FeatureBuilder, ForecastError, LagMode, SeriesInput, FEATURE_NAMES};
use rstest::rstest;

#[test]
fn test_one_row_per_year() {
    let matrix = FeatureBuilder::default().build(&sample_series()).unwrap();

    assert_eq!(matrix.len(), SAMPLE_PRICES.len());
    assert_eq!(matrix.targets().len(), SAMPLE_PRICES.len());
    for (i, target) in matrix.targets().iter().enumerate() {
        assert_eq!(*target, SAMPLE_PRICES[i]);
    }

    let years: Vec<i32> = matrix.rows().iter().map(|row| row.year).collect();
    assert_eq!(years, (2015..2025).collect::<Vec<_>>());
}

#[test]
fn test_circular_lags_wrap_from_the_tail() {
    let matrix = FeatureBuilder::default().build(&sample_series()).unwrap();
    let rows = matrix.rows();
    let n = SAMPLE_PRICES.len();

    assert_eq!(rows[0].lag1, SAMPLE_PRICES[n - 1]);
    assert_eq!(rows[0].lag2, SAMPLE_PRICES[n - 2]);
    assert_eq!(rows[0].lag3, SAMPLE_PRICES[n - 3]);
    assert_eq!(rows[1].lag2, SAMPLE_PRICES[n - 1]);
    assert_eq!(rows[2].lag3, SAMPLE_PRICES[n - 1]);

    // past the first three rows lags are ordinary
    for i in 3..n {
        assert_eq!(rows[i].lag1, SAMPLE_PRICES[i - 1]);
        assert_eq!(rows[i].lag2, SAMPLE_PRICES[i - 2]);
        assert_eq!(rows[i].lag3, SAMPLE_PRICES[i - 3]);
    }
}

#[test]
fn test_padded_mode_only_changes_wrapped_cells() {
    let circular = FeatureBuilder::new(LagMode::Circular)
        .build(&sample_series())
        .unwrap();
    let padded = FeatureBuilder::new(LagMode::Padded)
        .build(&sample_series())
        .unwrap();

    assert!(padded.rows()[0].lag1.is_nan());
    assert!(padded.rows()[1].lag2.is_nan());
    assert!(padded.rows()[2].lag3.is_nan());
    assert_eq!(&padded.rows()[3..], &circular.rows()[3..]);
}

#[test]
fn test_rolling_average_and_pct_change() {
    let matrix = FeatureBuilder::default().build(&sample_series()).unwrap();
    let rows = matrix.rows();

    assert_eq!(rows[0].rolling_avg2, 100000.0);
    assert_eq!(rows[0].pct_change, 0.0);
    assert_eq!(rows[1].rolling_avg2, 102500.0);
    assert!((rows[1].pct_change - 0.05).abs() < 1e-12);
    assert!((rows[9].pct_change - (128000.0 - 130000.0) / 130000.0).abs() < 1e-12);
}

#[test]
fn test_zero_previous_price_gives_zero_change() {
    let series = SeriesInput::new(2015, vec![0.0, 0.0, 500.0, 0.0, 250.0]).unwrap();
    let matrix = FeatureBuilder::default().build(&series).unwrap();

    let changes: Vec<f64> = matrix.rows().iter().map(|row| row.pct_change).collect();
    assert_eq!(changes, vec![0.0, 0.0, 0.0, -1.0, 0.0]);
}

#[rstest]
#[case(3, false)]
#[case(4, true)]
#[case(5, true)]
fn test_minimum_length(#[case] len: usize, #[case] accepted: bool) {
    let prices: Vec<f64> = (0..len).map(|i| 1000.0 + i as f64).collect();

    match SeriesInput::new(2015, prices) {
        Ok(series) => {
            assert!(accepted);
            assert_eq!(FeatureBuilder::default().build(&series).unwrap().len(), len);
        }
        Err(err) => {
            assert!(!accepted);
            assert!(matches!(err, ForecastError::InsufficientData(_)));
        }
    }
}

#[test]
fn test_feature_names_match_row_order() {
    assert_eq!(FEATURE_NAMES.len(), 6);
    assert_eq!(FEATURE_NAMES[0], "year");
    assert_eq!(FEATURE_NAMES[5], "pct_change");
}
