use aqi_forecast::forecaster::ForecastPoint;
use aqi_forecast::metrics::evaluate_forecast;
use aqi_forecast::{
    ForecastConfig, ForecastError, HistoricalSeries, LinearPredictor, PersistencePredictor,
    RecursiveForecaster, SeriesLoader,
};
use aqi_math::AqiCategory;
use chrono::{Duration, TimeZone, Utc};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

const MODEL_JSON: &str = r#"{
    "name": "hourly-linear",
    "intercept": 3.0,
    "features": ["aqi_lag_1", "aqi_lag_24", "aqi_lag_48", "hour", "day", "month", "weekday"],
    "weights": [0.6, 0.25, 0.1, 0.05, 0.0, 0.0, -0.1]
}"#;

fn write_history_csv(path: &std::path::Path, hours: usize) {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut file = File::create(path).unwrap();
    writeln!(file, "timestamp,aqi,pm2_5").unwrap();
    for i in 0..hours {
        let ts = start + Duration::hours(i as i64);
        let aqi = 40.0 + (i % 24) as f64;
        writeln!(file, "{},{},{}", ts.to_rfc3339(), aqi, aqi / 4.0).unwrap();
    }
}

#[test]
fn test_complete_workflow() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("history.csv");
    let model_path = dir.path().join("model.json");
    let config_path = dir.path().join("forecast.json");
    write_history_csv(&history_path, 72);
    std::fs::write(&model_path, MODEL_JSON).unwrap();
    std::fs::write(&config_path, r#"{"horizon_hours": 24}"#).unwrap();

    // 1. Configuration and inputs
    let config = ForecastConfig::from_json_file(&config_path).unwrap();
    let history = SeriesLoader::from_path(&history_path, &config.series).unwrap();
    let model = LinearPredictor::from_json_file(&model_path).unwrap();
    assert_eq!(history.len(), 72);

    // 2. Forecast
    let forecaster = RecursiveForecaster::new(config.feature_spec().unwrap());
    let forecast = forecaster
        .forecast(&history, &model, config.horizon_hours)
        .unwrap();
    assert_eq!(forecast.len(), 24);
    assert_eq!(forecast.target(), "aqi");
    assert_eq!(
        forecast.points()[0].timestamp,
        history.last_timestamp() + Duration::hours(1)
    );
    assert!(forecast.values().iter().all(|v| v.is_finite()));

    // 3. The lazy iterator agrees with the eager run
    let lazy: Vec<ForecastPoint> = forecaster
        .iter(&history, &model, config.horizon_hours)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(lazy, forecast.points());

    // 4. CSV export
    let csv_path = dir.path().join("forecast.csv");
    forecast.write_csv_path(&csv_path).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["timestamp", "predicted_value"]);
    let rows: Vec<ForecastPoint> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows, forecast.points());

    // 5. Parquet export
    let parquet_path = dir.path().join("forecast.parquet");
    forecast.write_parquet(&parquet_path).unwrap();
    let df = ParquetReader::new(File::open(&parquet_path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 24);
    assert_eq!(df.get_column_names(), vec!["timestamp", "predicted_aqi"]);

    // 6. Category of the average
    let mean = forecast.mean_value().unwrap();
    assert!(!AqiCategory::from_aqi(mean).label().is_empty());

    // 7. Error handling
    let result = SeriesLoader::from_csv("/nonexistent/path.csv", &config.series);
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_persistence_baseline_on_pm25_only_history() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let df = df! {
        "timestamp" => (0..3).map(|i| (start + Duration::hours(i)).to_rfc3339()).collect::<Vec<_>>(),
        "pm2_5" => &[9.0, 12.0, 35.4],
    }
    .unwrap();
    let config = ForecastConfig::from_json_str(
        r#"{"lag_offsets": [1, 2], "time_features": [], "horizon_hours": 3}"#,
    )
    .unwrap();

    let history = SeriesLoader::from_dataframe(&df, &config.series).unwrap();
    let spec = config.feature_spec().unwrap();
    let predictor = PersistencePredictor::new(&spec);
    let forecast = RecursiveForecaster::new(spec)
        .forecast(&history, &predictor, config.horizon_hours)
        .unwrap();

    assert_eq!(forecast.values(), vec![100.0, 100.0, 100.0]);
    assert_eq!(AqiCategory::from_aqi(100.0), AqiCategory::Moderate);
}

#[test]
fn test_forecast_scored_against_held_out_hours() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let values: Vec<f64> = (0..96).map(|i| 40.0 + (i % 24) as f64).collect();
    let full = HistoricalSeries::hourly(start, values.clone()).unwrap();
    let training = HistoricalSeries::hourly(start, values[..72].to_vec()).unwrap();

    let config = ForecastConfig::default();
    let spec = config.feature_spec().unwrap();
    // a lag-24 persistence model is exact on a daily cycle
    let predictor = PersistencePredictor::for_feature(&spec.lag_name(24));
    let forecast = RecursiveForecaster::new(spec)
        .forecast(&training, &predictor, 24)
        .unwrap();

    let accuracy = evaluate_forecast(&forecast, &full).unwrap();
    assert_eq!(accuracy.count, 24);
    assert_eq!(accuracy.mae, 0.0);
    assert_eq!(accuracy.r2, 1.0);
}
