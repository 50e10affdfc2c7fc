//! # AQI Forecast
//!
//! Recursive hour-by-hour forecasting of an air-quality index.
//!
//! ## Features
//!
//! - Historical series loading (CSV, Parquet or a polars `DataFrame`), with
//!   the index derived from PM2.5 when only raw readings are present
//! - A shared feature layout: `<target>_lag_<l>` lags plus calendar features
//! - A closed-loop forecaster that feeds every prediction back into the next
//!   hour's lag features
//! - Point predictors: linear coefficients, persistence baseline, closures
//! - Accuracy metrics for comparing a forecast with later observations
//!
//! ## Quick Start
//!
//! ```no_run
//! use aqi_forecast::{ForecastConfig, LinearPredictor, RecursiveForecaster, SeriesLoader};
//!
//! let config = ForecastConfig::from_json_file("forecast.json")?;
//! let history = SeriesLoader::from_csv("history.csv", &config.series)?;
//! let model = LinearPredictor::from_json_file("model.json")?;
//!
//! let forecaster = RecursiveForecaster::new(config.feature_spec()?);
//! let forecast = forecaster.forecast(&history, &model, config.horizon_hours)?;
//!
//! forecast.write_csv(std::io::stdout())?;
//! # Ok::<(), aqi_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{HistoricalSeries, Observation, SeriesLoader, SeriesSchema};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{build_lag_features, FeatureSpec, FeatureVector, TimeFeature};
pub use crate::forecaster::{forecast, Forecast, ForecastIter, ForecastPoint, RecursiveForecaster};
pub use crate::models::{FnPredictor, LinearPredictor, PersistencePredictor, PointPredictor};
pub use crate::window::LagWindow;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
