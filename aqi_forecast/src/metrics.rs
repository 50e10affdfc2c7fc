//! Metrics for evaluating forecast performance

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::Forecast;
use std::fmt;

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Number of compared points
    pub count: usize,
}

impl fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics ({} points):", self.count)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        write!(f, "  R2:    {:.4}", self.r2)
    }
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::ValidationError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let ss_res = errors.iter().map(|e| e.powi(2)).sum::<f64>();
    let mse = ss_res / n;
    let rmse = mse.sqrt();

    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot = actual.iter().map(|a| (a - mean_actual).powi(2)).sum::<f64>();
    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        r2,
        count: forecast.len(),
    })
}

/// Compare a forecast with later observations at the same timestamps.
///
/// Forecast hours without an observation are skipped; at least one hour
/// must match.
pub fn evaluate_forecast(forecast: &Forecast, actual: &HistoricalSeries) -> Result<ForecastAccuracy> {
    let (predicted, observed): (Vec<f64>, Vec<f64>) = forecast
        .points()
        .iter()
        .filter_map(|p| {
            actual
                .at(p.timestamp)
                .map(|obs| (p.predicted_value, obs.index_value))
        })
        .unzip();

    if predicted.is_empty() {
        return Err(ForecastError::ValidationError(
            "No observations overlap the forecast horizon".to_string(),
        ));
    }

    forecast_accuracy(&predicted, &observed)
}
