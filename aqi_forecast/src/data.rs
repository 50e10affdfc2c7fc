//! Historical series handling for forecasting

use crate::error::{ForecastError, Result};
use crate::utils::{from_epoch_seconds, parse_timestamp};
use aqi_math::pm25_to_aqi;
use chrono::{DateTime, Duration, TimeZone, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// A single hourly observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Time of the observation
    pub timestamp: DateTime<Utc>,
    /// Observed index value (AQI)
    pub index_value: f64,
    /// Auxiliary raw measurements such as `pm2_5`
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
}

impl Observation {
    /// Create an observation without auxiliary measurements
    pub fn new(timestamp: DateTime<Utc>, index_value: f64) -> Self {
        Self {
            timestamp,
            index_value,
            measurements: BTreeMap::new(),
        }
    }
}

/// Ordered historical series of observations.
///
/// Timestamps are strictly increasing and every index value is finite.
/// Hourly spacing is assumed, not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    observations: Vec<Observation>,
}

impl HistoricalSeries {
    /// Create a series from observations already in ascending order
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::DataError(
                "Historical series is empty".to_string(),
            ));
        }

        for (i, obs) in observations.iter().enumerate() {
            if !obs.index_value.is_finite() {
                return Err(ForecastError::DataError(format!(
                    "Non-finite index value {} at {}",
                    obs.index_value, obs.timestamp
                )));
            }
            if i > 0 && obs.timestamp <= observations[i - 1].timestamp {
                return Err(ForecastError::DataError(format!(
                    "Timestamps must be strictly increasing: {} follows {}",
                    obs.timestamp,
                    observations[i - 1].timestamp
                )));
            }
        }

        Ok(Self { observations })
    }

    /// Create a series from parallel timestamp and value vectors
    pub fn from_values(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }

        Self::new(
            timestamps
                .into_iter()
                .zip(values)
                .map(|(ts, v)| Observation::new(ts, v))
                .collect(),
        )
    }

    /// Create an hourly series whose first observation is at `start`
    pub fn hourly(start: DateTime<Utc>, values: Vec<f64>) -> Result<Self> {
        let timestamps = (0..values.len())
            .map(|i| start + Duration::hours(i as i64))
            .collect();
        Self::from_values(timestamps, values)
    }

    /// All observations, oldest first
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The most recent `n` observations (all of them if `n` exceeds the length)
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Index values, oldest first
    pub fn index_values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.index_value).collect()
    }

    /// Timestamps, oldest first
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    /// Timestamp of the most recent observation
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        // never empty after construction
        self.observations[self.observations.len() - 1].timestamp
    }

    /// Values of one auxiliary measurement; `None` where a row lacks it
    pub fn measurement(&self, name: &str) -> Vec<Option<f64>> {
        self.observations
            .iter()
            .map(|o| o.measurements.get(name).copied())
            .collect()
    }

    /// Look up the observation at an exact timestamp
    pub fn at(&self, timestamp: DateTime<Utc>) -> Option<&Observation> {
        self.observations
            .binary_search_by(|o| o.timestamp.cmp(&timestamp))
            .ok()
            .map(|i| &self.observations[i])
    }

    /// Convert to a DataFrame with `timestamp`, `index_column` and measurement columns
    pub fn to_dataframe(&self, index_column: &str) -> Result<DataFrame> {
        let mut columns = vec![
            timestamp_series("timestamp", self.observations.iter().map(|o| o.timestamp))?,
            Series::new(index_column, self.index_values()),
        ];

        let mut names: Vec<&String> = self
            .observations
            .iter()
            .flat_map(|o| o.measurements.keys())
            .collect();
        names.sort();
        names.dedup();

        for name in names {
            columns.push(Series::new(name.as_str(), self.measurement(name)));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Build a millisecond `Datetime` series from UTC timestamps
pub(crate) fn timestamp_series(
    name: &str,
    timestamps: impl Iterator<Item = DateTime<Utc>>,
) -> Result<Series> {
    let millis: Vec<i64> = timestamps.map(|ts| ts.timestamp_millis()).collect();
    Ok(Series::new(name, millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

/// Column names used when reading a series from tabular data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSchema {
    /// Name of the time column
    pub time_column: String,
    /// Name of the index (target) column
    pub index_column: String,
    /// PM2.5 column used to derive the index when the index column is absent
    pub pm25_column: Option<String>,
}

impl Default for SeriesSchema {
    fn default() -> Self {
        Self {
            time_column: "timestamp".to_string(),
            index_column: "aqi".to_string(),
            pm25_column: Some("pm2_5".to_string()),
        }
    }
}

/// Data loader for historical series
#[derive(Debug)]
pub struct SeriesLoader;

impl SeriesLoader {
    /// Load a historical series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, schema: &SeriesSchema) -> Result<HistoricalSeries> {
        let file = File::open(path.as_ref())?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        info!(path = %path.as_ref().display(), rows = df.height(), "read history csv");
        Self::from_dataframe(&df, schema)
    }

    /// Load a historical series from a Parquet file
    pub fn from_parquet<P: AsRef<Path>>(
        path: P,
        schema: &SeriesSchema,
    ) -> Result<HistoricalSeries> {
        let file = File::open(path.as_ref())?;
        let df = ParquetReader::new(file).finish()?;

        info!(path = %path.as_ref().display(), rows = df.height(), "read history parquet");
        Self::from_dataframe(&df, schema)
    }

    /// Load from a path, choosing the reader by extension (`.parquet` or CSV)
    pub fn from_path<P: AsRef<Path>>(path: P, schema: &SeriesSchema) -> Result<HistoricalSeries> {
        let is_parquet = path
            .as_ref()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("parquet"))
            .unwrap_or(false);

        if is_parquet {
            Self::from_parquet(path, schema)
        } else {
            Self::from_csv(path, schema)
        }
    }

    /// Create a historical series from an existing DataFrame.
    ///
    /// Rows are sorted by time. Rows without an index value are dropped.
    /// Every other numeric column is kept as an auxiliary measurement.
    pub fn from_dataframe(df: &DataFrame, schema: &SeriesSchema) -> Result<HistoricalSeries> {
        if df.height() == 0 {
            return Err(ForecastError::DataError(
                "No rows found in data".to_string(),
            ));
        }

        let timestamps = Self::time_column(df, &schema.time_column)?;
        let index = Self::index_column(df, schema)?;

        let column_names = df.get_column_names();
        let mut aux: Vec<(String, Vec<Option<f64>>)> = Vec::new();
        for name in column_names {
            if name == schema.time_column || name == schema.index_column {
                continue;
            }
            let col = df.column(name)?;
            if col.dtype().is_numeric() {
                aux.push((name.to_string(), column_as_f64(col)?));
            }
        }

        let mut observations = Vec::with_capacity(df.height());
        let mut dropped = 0usize;
        for (row, (ts, value)) in timestamps.into_iter().zip(index).enumerate() {
            let (ts, value) = match (ts, value) {
                (Some(ts), Some(value)) => (ts, value),
                _ => {
                    dropped += 1;
                    continue;
                }
            };

            let measurements = aux
                .iter()
                .filter_map(|(name, values)| values[row].map(|v| (name.clone(), v)))
                .collect();

            observations.push(Observation {
                timestamp: ts,
                index_value: value,
                measurements,
            });
        }

        if dropped > 0 {
            warn!(dropped, "dropped rows with missing timestamp or index value");
        }

        observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        HistoricalSeries::new(observations)
    }

    /// Read the time column as UTC timestamps
    fn time_column(df: &DataFrame, name: &str) -> Result<Vec<Option<DateTime<Utc>>>> {
        let col = df.column(name).map_err(|e| {
            ForecastError::DataError(format!("Time column '{}' not found: {}", name, e))
        })?;

        match col.dtype() {
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .map(|opt| opt.map(parse_timestamp).transpose())
                .collect(),
            DataType::Datetime(unit, _) => {
                let unit = *unit;
                let physical = col.cast(&DataType::Int64)?;
                let values = physical.i64()?;
                values
                    .into_iter()
                    .map(|opt| opt.map(|v| from_datetime_physical(v, unit)).transpose())
                    .collect()
            }
            DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32 => {
                let physical = col.cast(&DataType::Int64)?;
                let values = physical.i64()?;
                values
                    .into_iter()
                    .map(|opt| opt.map(from_epoch_seconds).transpose())
                    .collect()
            }
            other => Err(ForecastError::DataError(format!(
                "Time column '{}' has unsupported type {}",
                name, other
            ))),
        }
    }

    /// Read the index column, deriving it from PM2.5 when it is absent
    fn index_column(df: &DataFrame, schema: &SeriesSchema) -> Result<Vec<Option<f64>>> {
        if let Ok(col) = df.column(&schema.index_column) {
            return column_as_f64(col);
        }

        let pm25_name = schema.pm25_column.as_deref().ok_or_else(|| {
            ForecastError::DataError(format!(
                "Index column '{}' not found and no PM2.5 column configured",
                schema.index_column
            ))
        })?;

        let col = df.column(pm25_name).map_err(|e| {
            ForecastError::DataError(format!(
                "Neither index column '{}' nor PM2.5 column '{}' found: {}",
                schema.index_column, pm25_name, e
            ))
        })?;

        info!(column = pm25_name, "deriving index values from PM2.5");
        column_as_f64(col)?
            .into_iter()
            .map(|opt| opt.map(pm25_to_aqi).transpose().map_err(ForecastError::from))
            .collect()
    }
}

/// Read a numeric column as nullable f64 values
fn column_as_f64(col: &Series) -> Result<Vec<Option<f64>>> {
    if !col.dtype().is_numeric() {
        return Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            col.name()
        )));
    }

    let casted = col.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    Ok(values.into_iter().collect())
}

fn from_datetime_physical(value: i64, unit: TimeUnit) -> Result<DateTime<Utc>> {
    let ts = match unit {
        TimeUnit::Nanoseconds => Some(Utc.timestamp_nanos(value)),
        TimeUnit::Microseconds => Utc
            .timestamp_opt(value.div_euclid(1_000_000), (value.rem_euclid(1_000_000) * 1_000) as u32)
            .single(),
        TimeUnit::Milliseconds => Utc.timestamp_millis_opt(value).single(),
    };

    ts.ok_or_else(|| ForecastError::DataError(format!("Datetime value out of range: {}", value)))
}
