//! Feature layout shared by feature construction and the forecaster
//!
//! A [`FeatureSpec`] fixes the ordered list of feature names: one
//! `<target>_lag_<l>` feature per configured lag (in configured order),
//! followed by the configured calendar features. The same layout builds
//! training rows from history and the input vector of every forecast step.

use crate::data::{timestamp_series, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::window::LagWindow;
use chrono::{DateTime, Datelike, Timelike, Utc};
use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Target name used when none is configured
pub const DEFAULT_TARGET: &str = "index";

/// Calendar feature derived from the timestamp being forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFeature {
    /// Hour of day, 0-23
    Hour,
    /// Day of month, 1-31
    Day,
    /// Month, 1-12
    Month,
    /// Day of week, Monday = 0 through Sunday = 6
    Weekday,
}

impl TimeFeature {
    /// All calendar features in their conventional order
    pub const ALL: [TimeFeature; 4] = [
        TimeFeature::Hour,
        TimeFeature::Day,
        TimeFeature::Month,
        TimeFeature::Weekday,
    ];

    /// Feature name as seen by the predictor
    pub fn name(&self) -> &'static str {
        match self {
            TimeFeature::Hour => "hour",
            TimeFeature::Day => "day",
            TimeFeature::Month => "month",
            TimeFeature::Weekday => "weekday",
        }
    }

    /// Value of this feature at `ts`
    pub fn value_at(&self, ts: DateTime<Utc>) -> f64 {
        match self {
            TimeFeature::Hour => ts.hour() as f64,
            TimeFeature::Day => ts.day() as f64,
            TimeFeature::Month => ts.month() as f64,
            TimeFeature::Weekday => ts.weekday().num_days_from_monday() as f64,
        }
    }
}

impl fmt::Display for TimeFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered feature layout: lag features first, then calendar features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    target: String,
    lag_offsets: Vec<usize>,
    time_features: Vec<TimeFeature>,
    names: Arc<[String]>,
}

impl FeatureSpec {
    /// Create a spec with the neutral target name `index`
    pub fn new(lag_offsets: &[usize], time_features: &[TimeFeature]) -> Result<Self> {
        Self::with_target_name(DEFAULT_TARGET, lag_offsets, time_features)
    }

    /// The air-quality layout: `aqi` lagged by 1, 24 and 48 hours plus all
    /// calendar features
    pub fn air_quality() -> Self {
        let lag_offsets = vec![1, 24, 48];
        let time_features = TimeFeature::ALL.to_vec();
        let names = build_names("aqi", &lag_offsets, &time_features);
        Self {
            target: "aqi".to_string(),
            lag_offsets,
            time_features,
            names,
        }
    }

    /// Create a spec for an explicit target name
    pub fn with_target_name(
        target: &str,
        lag_offsets: &[usize],
        time_features: &[TimeFeature],
    ) -> Result<Self> {
        if target.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Target name must not be empty".to_string(),
            ));
        }
        if lag_offsets.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "At least one lag offset is required".to_string(),
            ));
        }
        if lag_offsets.contains(&0) {
            return Err(ForecastError::InvalidParameter(
                "Lag offsets must be positive".to_string(),
            ));
        }
        for (i, lag) in lag_offsets.iter().enumerate() {
            if lag_offsets[..i].contains(lag) {
                return Err(ForecastError::InvalidParameter(format!(
                    "Duplicate lag offset {}",
                    lag
                )));
            }
        }
        for (i, feature) in time_features.iter().enumerate() {
            if time_features[..i].contains(feature) {
                return Err(ForecastError::InvalidParameter(format!(
                    "Duplicate time feature {}",
                    feature
                )));
            }
        }

        Ok(Self {
            target: target.to_string(),
            lag_offsets: lag_offsets.to_vec(),
            time_features: time_features.to_vec(),
            names: build_names(target, lag_offsets, time_features),
        })
    }

    /// Rename the target, keeping lags and calendar features
    pub fn with_target(self, target: &str) -> Result<Self> {
        Self::with_target_name(target, &self.lag_offsets, &self.time_features)
    }

    /// Target name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Lag offsets in configured order
    pub fn lag_offsets(&self) -> &[usize] {
        &self.lag_offsets
    }

    /// Calendar features in configured order
    pub fn time_features(&self) -> &[TimeFeature] {
        &self.time_features
    }

    /// Ordered feature names
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Name of the lag feature for `lag`
    pub fn lag_name(&self, lag: usize) -> String {
        lag_name(&self.target, lag)
    }

    /// Deepest configured lag
    pub fn max_lag(&self) -> usize {
        self.lag_offsets.iter().copied().max().unwrap_or(0)
    }

    /// Observations needed before the first forecast step
    pub fn required_history(&self) -> usize {
        self.max_lag() + 1
    }

    /// Feature values for the hour `ts`, reading lags from `window`
    pub fn vector_at(&self, window: &LagWindow, ts: DateTime<Utc>) -> Result<FeatureVector> {
        let mut values = Vec::with_capacity(self.names.len());
        for &lag in &self.lag_offsets {
            let value = window.lag(lag).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Lag {} is outside the window of {} values",
                    lag,
                    window.len()
                ))
            })?;
            values.push(value);
        }
        values.extend(self.time_features.iter().map(|f| f.value_at(ts)));

        FeatureVector::new(Arc::clone(&self.names), values)
    }
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self::air_quality()
    }
}

fn lag_name(target: &str, lag: usize) -> String {
    format!("{}_lag_{}", target, lag)
}

fn build_names(target: &str, lag_offsets: &[usize], time_features: &[TimeFeature]) -> Arc<[String]> {
    lag_offsets
        .iter()
        .map(|&lag| lag_name(target, lag))
        .chain(time_features.iter().map(|f| f.name().to_string()))
        .collect()
}

/// Named numeric features in a fixed order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create a vector; `names` and `values` must have the same length
    pub fn new(names: Arc<[String]>, values: Vec<f64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Feature names length ({}) doesn't match values length ({})",
                names.len(),
                values.len()
            )));
        }
        Ok(Self { names, values })
    }

    /// Build a vector from `(name, value)` pairs, keeping their order
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let (names, values): (Vec<String>, Vec<f64>) = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .unzip();
        Self {
            names: names.into(),
            values,
        }
    }

    /// Value of the named feature
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Feature names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Feature values in order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Rearrange into another order given by `order[i]` = source position
    pub(crate) fn reordered(&self, names: Arc<[String]>, order: &[usize]) -> Result<Self> {
        let values = order.iter().map(|&i| self.values[i]).collect();
        Self::new(names, values)
    }
}

/// Lagged feature table built from a historical series
#[derive(Debug, Clone, PartialEq)]
pub struct LagFeatureTable {
    feature_names: Vec<String>,
    target: String,
    timestamps: Vec<DateTime<Utc>>,
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl LagFeatureTable {
    /// Ordered feature names (column order of `rows`)
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Timestamp of each row
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Feature rows
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Observed target for each row
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to a DataFrame: `timestamp`, the features, then the target
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.feature_names.len() + 2);
        columns.push(timestamp_series("timestamp", self.timestamps.iter().copied())?);
        for (j, name) in self.feature_names.iter().enumerate() {
            let column: Vec<f64> = self.rows.iter().map(|row| row[j]).collect();
            columns.push(Series::new(name.as_str(), column));
        }
        columns.push(Series::new(self.target.as_str(), self.targets.clone()));

        Ok(DataFrame::new(columns)?)
    }
}

/// Build lag and calendar features for every row that has a full lag history.
///
/// Row `i` gets `<target>_lag_<l> = index[i - l]` and the calendar features of
/// `timestamp[i]`; its target is `index[i]`. The first `max_lag` rows are
/// dropped.
pub fn build_lag_features(series: &HistoricalSeries, spec: &FeatureSpec) -> LagFeatureTable {
    let observations = series.observations();
    let max_lag = spec.max_lag();
    let capacity = observations.len().saturating_sub(max_lag);

    let mut table = LagFeatureTable {
        feature_names: spec.feature_names().to_vec(),
        target: spec.target().to_string(),
        timestamps: Vec::with_capacity(capacity),
        rows: Vec::with_capacity(capacity),
        targets: Vec::with_capacity(capacity),
    };

    for i in max_lag..observations.len() {
        let ts = observations[i].timestamp;
        let row = spec
            .lag_offsets()
            .iter()
            .map(|&lag| observations[i - lag].index_value)
            .chain(spec.time_features().iter().map(|f| f.value_at(ts)))
            .collect();

        table.timestamps.push(ts);
        table.rows.push(row);
        table.targets.push(observations[i].index_value);
    }

    table
}
