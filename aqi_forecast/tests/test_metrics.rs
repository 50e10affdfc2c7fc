use aqi_forecast::metrics::{evaluate_forecast, forecast_accuracy};
use aqi_forecast::models::PersistencePredictor;
use aqi_forecast::{FeatureSpec, ForecastError, HistoricalSeries, RecursiveForecaster};
use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, TimeZone, Utc};

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let acc = forecast_accuracy(&predicted, &actual).unwrap();

    assert_approx_eq!(acc.mae, 2.4, 0.01);
    assert_approx_eq!(acc.mse, 6.0, 0.01);
    assert_approx_eq!(acc.rmse, 2.449, 0.01);
    assert_approx_eq!(acc.r2, 0.97, 0.01);
    assert_eq!(acc.count, 5);
}

#[test]
fn test_metrics_reject_mismatched_lengths() {
    assert!(matches!(
        forecast_accuracy(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::ValidationError(_))
    ));
    assert!(forecast_accuracy(&[], &[]).is_err());
}

#[test]
fn test_evaluate_against_later_observations() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let history = HistoricalSeries::hourly(start, vec![50.0, 52.0, 54.0]).unwrap();
    let spec = FeatureSpec::new(&[1], &[]).unwrap();
    let predictor = PersistencePredictor::new(&spec);
    let forecast = RecursiveForecaster::new(spec)
        .forecast(&history, &predictor, 4)
        .unwrap();

    // only the first two forecast hours were observed
    let actual =
        HistoricalSeries::hourly(start + Duration::hours(3), vec![56.0, 50.0]).unwrap();
    let acc = evaluate_forecast(&forecast, &actual).unwrap();

    assert_eq!(acc.count, 2);
    assert_approx_eq!(acc.mae, 3.0);
}

#[test]
fn test_evaluate_without_overlap() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let history = HistoricalSeries::hourly(start, vec![50.0, 52.0]).unwrap();
    let spec = FeatureSpec::new(&[1], &[]).unwrap();
    let predictor = PersistencePredictor::new(&spec);
    let forecast = RecursiveForecaster::new(spec)
        .forecast(&history, &predictor, 2)
        .unwrap();

    assert!(matches!(
        evaluate_forecast(&forecast, &history),
        Err(ForecastError::ValidationError(_))
    ));
}
