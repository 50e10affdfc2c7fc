//! Utility functions for the aqi_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Naive formats tried after RFC 3339, interpreted as UTC
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a timestamp string into UTC.
///
/// Accepts RFC 3339 (any offset), `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM` and bare dates (midnight). Naive values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(ForecastError::DataError(format!(
        "Unrecognized timestamp '{}'",
        value
    )))
}

/// Convert epoch seconds (the `event_id` convention) into UTC
pub fn from_epoch_seconds(seconds: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
        ForecastError::DataError(format!("Epoch seconds out of range: {}", seconds))
    })
}

/// Create the `horizon` hourly timestamps that follow `last_timestamp`
pub fn hourly_timestamps(last_timestamp: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for _ in 0..horizon {
        current = current + Duration::hours(1);
        timestamps.push(current);
    }

    timestamps
}
