//! # AQI Workspace
//!
//! `aqi_workspace` bundles the forecasting crate and the index math it
//! depends on.
//!
//! ## Example
//!
//! ```
//! use aqi_workspace::forecast::{forecast, FnPredictor, FeatureVector, HistoricalSeries};
//! use aqi_workspace::math::{pm25_to_aqi, AqiCategory};
//! use chrono::{TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
//! let readings = [9.0, 12.0, 20.0];
//! let index: Vec<f64> = readings.iter().map(|&pm| pm25_to_aqi(pm).unwrap()).collect();
//! let history = HistoricalSeries::hourly(start, index).unwrap();
//!
//! let predictor = FnPredictor::new(|v: &FeatureVector| Ok(v.get("index_lag_1").unwrap_or(0.0)));
//! let result = forecast(&history, &predictor, 2, &[1, 2], &[]).unwrap();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(AqiCategory::from_aqi(result.values()[1]), AqiCategory::Moderate);
//! ```

/// Recursive forecasting
pub mod forecast {
    pub use aqi_forecast::*;
}

/// Air-quality index math
pub mod math {
    pub use aqi_math::*;
}

pub use aqi_forecast::{ForecastError, RecursiveForecaster};
pub use aqi_math::AqiCategory;
