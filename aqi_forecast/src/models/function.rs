//! Closure-backed predictor

use crate::error::Result;
use crate::features::FeatureVector;
use crate::models::PointPredictor;
use std::fmt;

/// Adapts any `Fn(&FeatureVector) -> Result<f64>` into a [`PointPredictor`]
pub struct FnPredictor<F> {
    name: String,
    func: F,
    feature_names: Option<Vec<String>>,
}

impl<F> FnPredictor<F>
where
    F: Fn(&FeatureVector) -> Result<f64>,
{
    pub fn new(func: F) -> Self {
        Self {
            name: "function".to_string(),
            func,
            feature_names: None,
        }
    }

    /// Declare the ordered feature names the function expects
    pub fn with_feature_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl<F> PointPredictor for FnPredictor<F>
where
    F: Fn(&FeatureVector) -> Result<f64>,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (self.func)(features)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnPredictor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredictor")
            .field("name", &self.name)
            .field("feature_names", &self.feature_names)
            .finish()
    }
}
