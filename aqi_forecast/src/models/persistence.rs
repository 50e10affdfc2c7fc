//! Naive persistence baseline

use crate::error::{ForecastError, Result};
use crate::features::{FeatureSpec, FeatureVector};
use crate::models::PointPredictor;

/// Predicts the value of one lag feature unchanged.
///
/// With the lag-1 feature this is the "next hour equals this hour" baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistencePredictor {
    name: String,
    feature: String,
}

impl PersistencePredictor {
    /// Repeat the lag-1 feature of `spec`'s target
    pub fn new(spec: &FeatureSpec) -> Self {
        Self::for_feature(&spec.lag_name(1))
    }

    /// Repeat an arbitrary named feature
    pub fn for_feature(feature: &str) -> Self {
        Self {
            name: format!("Persistence ({})", feature),
            feature: feature.to_string(),
        }
    }

    /// Feature that is repeated
    pub fn feature(&self) -> &str {
        &self.feature
    }
}

impl PointPredictor for PersistencePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        features.get(&self.feature).ok_or_else(|| {
            ForecastError::ValidationError(format!("Missing feature '{}'", self.feature))
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
