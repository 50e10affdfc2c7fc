//! Linear point predictor loaded from serialized coefficients

use crate::error::{ForecastError, Result};
use crate::features::FeatureVector;
use crate::models::PointPredictor;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Linear model: `intercept + Σ weight_i * feature_i`.
///
/// The JSON form is
/// `{"name": "...", "intercept": 1.0, "features": ["aqi_lag_1", ...], "weights": [0.9, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPredictor {
    /// Name of the model
    #[serde(default = "default_name")]
    name: String,
    /// Intercept term
    intercept: f64,
    /// Feature names in the order the weights apply
    features: Vec<String>,
    /// One weight per feature
    weights: Vec<f64>,
}

fn default_name() -> String {
    "LinearRegression".to_string()
}

impl LinearPredictor {
    /// Create a linear predictor from `(feature, weight)` pairs
    pub fn new(intercept: f64, coefficients: Vec<(String, f64)>) -> Result<Self> {
        let (features, weights) = coefficients.into_iter().unzip();
        let model = Self {
            name: default_name(),
            intercept,
            features,
            weights,
        };
        model.validate()?;
        Ok(model)
    }

    /// Set the model name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Load coefficients from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;
        Ok(model)
    }

    /// Parse coefficients from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Write coefficients to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn validate(&self) -> Result<()> {
        if self.features.len() != self.weights.len() {
            return Err(ForecastError::ValidationError(format!(
                "Linear model has {} features but {} weights",
                self.features.len(),
                self.weights.len()
            )));
        }
        if self.features.is_empty() {
            return Err(ForecastError::ValidationError(
                "Linear model has no features".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ForecastError::ValidationError(
                "Linear model coefficients must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl PointPredictor for LinearPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(ForecastError::ValidationError(format!(
                "Expected {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }

        // fast path: vector already in our order
        if features.names() == self.features.as_slice() {
            let dot: f64 = features
                .values()
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| x * w)
                .sum();
            return Ok(self.intercept + dot);
        }

        let mut total = self.intercept;
        for (name, weight) in self.features.iter().zip(&self.weights) {
            let x = features.get(name).ok_or_else(|| {
                ForecastError::ValidationError(format!("Missing feature '{}'", name))
            })?;
            total += weight * x;
        }
        Ok(total)
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.features)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
