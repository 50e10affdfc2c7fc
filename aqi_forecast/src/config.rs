//! Forecast configuration
//!
//! Loaded from JSON and passed explicitly to the pieces that need it.

use crate::data::SeriesSchema;
use crate::error::{ForecastError, Result};
use crate::features::{FeatureSpec, TimeFeature};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings for one forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Target name; lag features are named `<target>_lag_<l>`
    #[serde(default = "default_target")]
    pub target: String,
    /// Lag offsets in hours, in the order the predictor expects them
    #[serde(default = "default_lag_offsets")]
    pub lag_offsets: Vec<usize>,
    /// Calendar features, after the lags
    #[serde(default = "default_time_features")]
    pub time_features: Vec<TimeFeature>,
    /// Hours to forecast
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: usize,
    /// Column names of the historical input
    #[serde(default)]
    pub series: SeriesSchema,
}

fn default_target() -> String {
    "aqi".to_string()
}

fn default_lag_offsets() -> Vec<usize> {
    vec![1, 24, 48]
}

fn default_time_features() -> Vec<TimeFeature> {
    TimeFeature::ALL.to_vec()
}

// three days ahead
fn default_horizon_hours() -> usize {
    72
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            lag_offsets: default_lag_offsets(),
            time_features: default_time_features(),
            horizon_hours: default_horizon_hours(),
            series: SeriesSchema::default(),
        }
    }
}

impl ForecastConfig {
    /// Load and validate a configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Feature layout described by this configuration
    pub fn feature_spec(&self) -> Result<FeatureSpec> {
        FeatureSpec::with_target_name(&self.target, &self.lag_offsets, &self.time_features)
    }

    /// Check the horizon and the feature layout
    pub fn validate(&self) -> Result<()> {
        if self.horizon_hours == 0 {
            return Err(ForecastError::InvalidHorizon {
                requested: self.horizon_hours,
            });
        }
        self.feature_spec()?;
        Ok(())
    }
}
