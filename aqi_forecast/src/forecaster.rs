//! Recursive multi-step forecasting
//!
//! Each step builds the feature vector for the next hour from the lag window
//! and the simulated clock, asks the point predictor for a value, emits it,
//! and pushes it back into the window. From the second step on the lag-1
//! feature is the previous prediction, so errors compound over the horizon.
//! Ground truth is never re-read mid-run.

use crate::data::{timestamp_series, HistoricalSeries};
use crate::error::{ForecastError, Result};
use crate::features::{FeatureSpec, FeatureVector, TimeFeature};
use crate::models::PointPredictor;
use crate::window::LagWindow;
use chrono::{DateTime, Duration, Utc};
use polars::prelude::{DataFrame, NamedFrom, ParquetWriter, Series};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One forecast hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted_value: f64,
}

/// A complete forecast, ordered by timestamp with one-hour spacing
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    target: String,
    points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Forecast points in order
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Take ownership of the points
    pub fn into_points(self) -> Vec<ForecastPoint> {
        self.points
    }

    /// Predicted values in order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted_value).collect()
    }

    /// Forecast timestamps in order
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Name of the forecast target
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean predicted value over the horizon
    pub fn mean_value(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().map(|p| p.predicted_value).sum::<f64>() / self.points.len() as f64)
    }

    /// Convert to a DataFrame with `timestamp` and `predicted_<target>` columns
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let timestamps = timestamp_series("timestamp", self.points.iter().map(|p| p.timestamp))?;
        let values = Series::new(&format!("predicted_{}", self.target), self.values());
        Ok(DataFrame::new(vec![timestamps, values])?)
    }

    /// Write `timestamp,predicted_value` rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for point in &self.points {
            writer.serialize(point)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the forecast to a CSV file
    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    /// Write the forecast to a Parquet file
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path)?;
        ParquetWriter::new(&mut file).finish(&mut df)?;
        Ok(())
    }
}

/// Closed-loop forecaster for a fixed feature layout
#[derive(Debug, Clone)]
pub struct RecursiveForecaster {
    spec: FeatureSpec,
}

impl RecursiveForecaster {
    pub fn new(spec: FeatureSpec) -> Self {
        Self { spec }
    }

    /// Feature layout used to build every step's input
    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    /// Lazily forecast `horizon_hours` steps past the end of `history`.
    ///
    /// All preconditions are checked before the iterator is returned. The
    /// iterator yields at most one error, after which it is exhausted.
    pub fn iter<'a, P>(
        &'a self,
        history: &HistoricalSeries,
        predictor: &'a P,
        horizon_hours: usize,
    ) -> Result<ForecastIter<'a, P>>
    where
        P: PointPredictor + ?Sized,
    {
        if horizon_hours == 0 {
            return Err(ForecastError::InvalidHorizon {
                requested: horizon_hours,
            });
        }

        let required = self.spec.required_history();
        if history.len() < required {
            return Err(ForecastError::InsufficientHistory {
                required,
                available: history.len(),
            });
        }

        let layout = self.layout_for(predictor)?;
        let tail: Vec<f64> = history
            .tail(required)
            .iter()
            .map(|o| o.index_value)
            .collect();
        let window = LagWindow::from_history(&tail, required)?;

        Ok(ForecastIter {
            spec: &self.spec,
            predictor,
            layout,
            window,
            current_ts: history.last_timestamp(),
            step: 0,
            horizon: horizon_hours,
            failed: false,
        })
    }

    /// Forecast `horizon_hours` steps; any failure discards the whole run
    pub fn forecast<P>(
        &self,
        history: &HistoricalSeries,
        predictor: &P,
        horizon_hours: usize,
    ) -> Result<Forecast>
    where
        P: PointPredictor + ?Sized,
    {
        info!(
            predictor = predictor.name(),
            horizon_hours,
            history = history.len(),
            start = %history.last_timestamp(),
            "starting recursive forecast"
        );

        let points = self
            .iter(history, predictor, horizon_hours)?
            .collect::<Result<Vec<_>>>()?;

        info!(points = points.len(), "forecast complete");
        Ok(Forecast {
            target: self.spec.target().to_string(),
            points,
        })
    }

    /// Decide the order in which features are handed to `predictor`
    fn layout_for<P>(&self, predictor: &P) -> Result<Option<Layout>>
    where
        P: PointPredictor + ?Sized,
    {
        let configured = self.spec.feature_names();
        let expected = match predictor.feature_names() {
            Some(expected) => expected,
            None => return Ok(None),
        };

        if expected == configured {
            return Ok(None);
        }

        let mismatch = || ForecastError::FeatureMismatch {
            expected: expected.to_vec(),
            configured: configured.to_vec(),
        };

        if expected.len() != configured.len() {
            return Err(mismatch());
        }

        let mut order = Vec::with_capacity(expected.len());
        for name in expected {
            match configured.iter().position(|c| c == name) {
                Some(i) if !order.contains(&i) => order.push(i),
                _ => return Err(mismatch()),
            }
        }

        debug!(?order, "reordering features for predictor");
        Ok(Some(Layout {
            names: expected.iter().cloned().collect(),
            order,
        }))
    }
}

/// Predictor-declared feature order, as positions into the spec's order
#[derive(Debug, Clone)]
struct Layout {
    names: Arc<[String]>,
    order: Vec<usize>,
}

/// Lazy, finite, non-restartable forecast sequence
#[derive(Debug)]
pub struct ForecastIter<'a, P: ?Sized> {
    spec: &'a FeatureSpec,
    predictor: &'a P,
    layout: Option<Layout>,
    window: LagWindow,
    current_ts: DateTime<Utc>,
    step: usize,
    horizon: usize,
    failed: bool,
}

impl<'a, P> ForecastIter<'a, P>
where
    P: PointPredictor + ?Sized,
{
    /// Zero-based index of the next step
    pub fn step(&self) -> usize {
        self.step
    }

    /// Timestamp of the last emitted point, or of the last observation
    pub fn current_timestamp(&self) -> DateTime<Utc> {
        self.current_ts
    }

    /// Current lag window, oldest value first
    pub fn window(&self) -> &LagWindow {
        &self.window
    }

    fn features_for(&self, ts: DateTime<Utc>) -> Result<FeatureVector> {
        let features = self.spec.vector_at(&self.window, ts)?;
        match &self.layout {
            Some(layout) => features.reordered(Arc::clone(&layout.names), &layout.order),
            None => Ok(features),
        }
    }

    fn run_step(&self, next_ts: DateTime<Utc>) -> std::result::Result<f64, String> {
        let features = self.features_for(next_ts).map_err(|e| e.to_string())?;
        let value = self.predictor.predict(&features).map_err(|e| e.to_string())?;
        if !value.is_finite() {
            return Err(format!("predictor returned non-finite value {}", value));
        }
        Ok(value)
    }
}

impl<'a, P> Iterator for ForecastIter<'a, P>
where
    P: PointPredictor + ?Sized,
{
    type Item = Result<ForecastPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.step >= self.horizon {
            return None;
        }

        let next_ts = self.current_ts + Duration::hours(1);
        match self.run_step(next_ts) {
            Ok(value) => {
                debug!(step = self.step, timestamp = %next_ts, value, "forecast step");
                self.window.push(value);
                self.current_ts = next_ts;
                self.step += 1;
                Some(Ok(ForecastPoint {
                    timestamp: next_ts,
                    predicted_value: value,
                }))
            }
            Err(reason) => {
                warn!(step = self.step, last_timestamp = %self.current_ts, %reason, "forecast aborted");
                self.failed = true;
                Some(Err(ForecastError::PredictionFailure {
                    step: self.step,
                    last_timestamp: self.current_ts,
                    reason,
                }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.horizon - self.step;
        (0, Some(remaining))
    }
}

impl<'a, P> FusedIterator for ForecastIter<'a, P> where P: PointPredictor + ?Sized {}

/// Forecast `horizon_hours` steps with lag features named `index_lag_<l>`.
///
/// # Examples
///
/// ```
/// use aqi_forecast::forecaster::forecast;
/// use aqi_forecast::models::FnPredictor;
/// use aqi_forecast::HistoricalSeries;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let history = HistoricalSeries::hourly(start, vec![40.0, 42.0]).unwrap();
/// let predictor = FnPredictor::new(|v| Ok(v.get("index_lag_1").unwrap_or(0.0) + 1.0));
///
/// let result = forecast(&history, &predictor, 2, &[1], &[]).unwrap();
/// assert_eq!(result.values(), vec![43.0, 44.0]);
/// ```
pub fn forecast<P>(
    history: &HistoricalSeries,
    predictor: &P,
    horizon_hours: usize,
    lag_offsets: &[usize],
    time_features: &[TimeFeature],
) -> Result<Forecast>
where
    P: PointPredictor + ?Sized,
{
    let spec = FeatureSpec::new(lag_offsets, time_features)?;
    RecursiveForecaster::new(spec).forecast(history, predictor, horizon_hours)
}
