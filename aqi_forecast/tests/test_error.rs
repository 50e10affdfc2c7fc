use aqi_forecast::error::ForecastError;
use aqi_math::MathError;
use chrono::{TimeZone, Utc};
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    match ForecastError::from(io_error) {
        ForecastError::IoError(_) => {}
        other => panic!("Expected IoError variant, got {:?}", other),
    }

    let json_error = serde_json::from_str::<Vec<f64>>("[1.0,").unwrap_err();
    match ForecastError::from(json_error) {
        ForecastError::JsonError(_) => {}
        other => panic!("Expected JsonError variant, got {:?}", other),
    }

    let math_error = MathError::InvalidInput("negative concentration".to_string());
    match ForecastError::from(math_error) {
        ForecastError::Math(MathError::InvalidInput(msg)) => {
            assert_eq!(msg, "negative concentration")
        }
        other => panic!("Expected Math variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidHorizon { requested: 0 };
    assert!(error.to_string().contains("horizon must be positive"));

    let error = ForecastError::InsufficientHistory {
        required: 49,
        available: 12,
    };
    let text = error.to_string();
    assert!(text.contains("49"));
    assert!(text.contains("12"));

    let error = ForecastError::PredictionFailure {
        step: 4,
        last_timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 4, 0, 0).unwrap(),
        reason: "non-finite".to_string(),
    };
    let text = error.to_string();
    assert!(text.contains("step 4"));
    assert!(text.contains("2024-03-01 04:00:00"));
    assert!(text.contains("non-finite"));

    let error = ForecastError::FeatureMismatch {
        expected: vec!["aqi_lag_1".to_string()],
        configured: vec!["aqi_lag_2".to_string()],
    };
    assert!(error.to_string().contains("aqi_lag_2"));
}

#[test]
fn test_error_source_is_kept() {
    use std::error::Error;

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error = ForecastError::from(io_error);

    assert!(error.to_string().contains("IO error"));
    assert!(error.source().is_some());
}
