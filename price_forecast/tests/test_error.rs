use price_forecast::{ErrorResponse, ForecastError};
use series_math::MathError;
use std::io;

#[test]
fn test_error_display() {
    let err = ForecastError::InsufficientData("need at least 4 annual prices, got 3".to_string());
    assert_eq!(
        err.to_string(),
        "Insufficient data: need at least 4 annual prices, got 3"
    );

    let err = ForecastError::TrainingTimeout {
        rounds_completed: 12,
        timeout_ms: 50,
    };
    assert_eq!(
        err.to_string(),
        "Training timed out after 12 rounds (50 ms budget)"
    );
}

#[test]
fn test_error_kinds_are_distinct() {
    let errors = vec![
        ForecastError::InsufficientData(String::new()),
        ForecastError::DegenerateSplit(String::new()),
        ForecastError::NumericInstability(String::new()),
        ForecastError::TrainingTimeout {
            rounds_completed: 0,
            timeout_ms: 0,
        },
        ForecastError::ModelFit(String::new()),
        ForecastError::InvalidParameter(String::new()),
        ForecastError::DataError(String::new()),
        ForecastError::SegmentNotFound(String::new()),
        ForecastError::PolarsError(String::new()),
    ];

    let mut kinds: Vec<&str> = errors.iter().map(ForecastError::kind).collect();
    kinds.sort_unstable();
    kinds.dedup();
    assert_eq!(kinds.len(), errors.len());
}

#[test]
fn test_from_io_error() {
    let err: ForecastError = io::Error::new(io::ErrorKind::NotFound, "prices.csv").into();
    assert!(matches!(err, ForecastError::IoError(_)));
    assert_eq!(err.kind(), "io_error");
}

#[test]
fn test_from_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ForecastError = json_err.into();
    assert!(matches!(err, ForecastError::JsonError(_)));
}

#[test]
fn test_from_math_error() {
    let err: ForecastError = MathError::InsufficientData("short".to_string()).into();
    assert!(matches!(err, ForecastError::InsufficientData(_)));

    let err: ForecastError = MathError::InvalidInput("window 0".to_string()).into();
    assert!(matches!(err, ForecastError::InvalidParameter(_)));

    let err: ForecastError = MathError::NonFinite {
        index: 2,
        value: f64::INFINITY,
    }
    .into();
    assert_eq!(err.kind(), "numeric_instability");
    assert!(err.to_string().contains("position 2"));
}

#[test]
fn test_error_response_from_error() {
    let err = ForecastError::SegmentNotFound("Lahore / DHA / 5 marla".to_string());
    let response = ErrorResponse::from(&err);

    assert_eq!(response.kind, "segment_not_found");
    assert_eq!(response.error, "Segment not found: Lahore / DHA / 5 marla");
}
