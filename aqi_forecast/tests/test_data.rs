use aqi_forecast::data::{HistoricalSeries, Observation, SeriesLoader, SeriesSchema};
use aqi_forecast::ForecastError;
use chrono::{Duration, TimeZone, Utc};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_loader_from_csv() {
    let file = csv_file(&[
        "timestamp,aqi,pm2_5",
        "2024-03-01 00:00:00,42.0,10.1",
        "2024-03-01 01:00:00,45.0,10.8",
        "2024-03-01 02:00:00,51.0,12.2",
    ]);

    let series = SeriesLoader::from_csv(file.path(), &SeriesSchema::default()).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.index_values(), vec![42.0, 45.0, 51.0]);
    assert_eq!(
        series.last_timestamp(),
        Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap()
    );
    assert_eq!(
        series.measurement("pm2_5"),
        vec![Some(10.1), Some(10.8), Some(12.2)]
    );
}

#[test]
fn test_loader_sorts_unordered_rows() {
    let file = csv_file(&[
        "timestamp,aqi",
        "2024-03-01T02:00:00Z,3.0",
        "2024-03-01T00:00:00Z,1.0",
        "2024-03-01T01:00:00Z,2.0",
    ]);

    let series = SeriesLoader::from_path(file.path(), &SeriesSchema::default()).unwrap();

    assert_eq!(series.index_values(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_loader_derives_index_from_pm25() {
    let file = csv_file(&[
        "event_id,pm2_5,temperature",
        "1709251200,12.0,8.5",
        "1709254800,35.4,8.0",
        "1709258400,0.0,7.5",
    ]);
    let schema = SeriesSchema {
        time_column: "event_id".to_string(),
        ..SeriesSchema::default()
    };

    let series = SeriesLoader::from_csv(file.path(), &schema).unwrap();

    assert_eq!(series.index_values(), vec![50.0, 100.0, 0.0]);
    assert_eq!(
        series.observations()[0].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(series.observations()[0].measurements.get("temperature"), Some(&8.5));
}

#[test]
fn test_loader_missing_columns() {
    let file = csv_file(&["timestamp,no2", "2024-03-01 00:00:00,5.0"]);

    let result = SeriesLoader::from_csv(file.path(), &SeriesSchema::default());

    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_loader_missing_file() {
    let result = SeriesLoader::from_csv("/nonexistent/history.csv", &SeriesSchema::default());
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_loader_drops_null_rows() {
    let df = df! {
        "timestamp" => &["2024-03-01 00:00:00", "2024-03-01 01:00:00", "2024-03-01 02:00:00"],
        "aqi" => &[Some(10.0), None, Some(30.0)],
    }
    .unwrap();

    let series = SeriesLoader::from_dataframe(&df, &SeriesSchema::default()).unwrap();

    assert_eq!(series.index_values(), vec![10.0, 30.0]);
}

#[test]
fn test_parquet_round_trip() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let series = HistoricalSeries::hourly(start, vec![20.0, 22.5, 25.0]).unwrap();
    let mut df = series.to_dataframe("aqi").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.parquet");
    let mut file = std::fs::File::create(&path).unwrap();
    ParquetWriter::new(&mut file).finish(&mut df).unwrap();

    let loaded = SeriesLoader::from_path(&path, &SeriesSchema::default()).unwrap();

    assert_eq!(loaded, series);
}

#[test]
fn test_series_accessors() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let series = HistoricalSeries::hourly(start, vec![1.0, 2.0, 3.0, 4.0]).unwrap();

    assert_eq!(series.tail(2).len(), 2);
    assert_eq!(series.tail(10).len(), 4);
    assert_eq!(series.tail(1)[0].index_value, 4.0);
    assert_eq!(
        series.at(start + Duration::hours(2)).map(|o| o.index_value),
        Some(3.0)
    );
    assert!(series.at(start + Duration::minutes(30)).is_none());
}

#[test]
fn test_series_rejects_unordered_observations() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let observations = vec![
        Observation::new(start + Duration::hours(1), 1.0),
        Observation::new(start, 2.0),
    ];

    assert!(matches!(
        HistoricalSeries::new(observations),
        Err(ForecastError::DataError(_))
    ));
}
