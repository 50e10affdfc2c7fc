//! Point predictors consumed by the recursive forecaster

use crate::error::Result;
use crate::features::FeatureVector;
use std::sync::Arc;

/// A trained model mapping one feature vector to one scalar.
///
/// Implementations must be deterministic and free of side effects for the
/// duration of a forecast. Predictors shared across threads must be `Sync`.
pub trait PointPredictor {
    /// Predict the target for a single feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Ordered feature names the predictor was built on, if it declares them.
    ///
    /// When present, the forecaster checks its configured features against
    /// this list and hands the vector over in this order.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Name of the predictor
    fn name(&self) -> &str {
        "predictor"
    }
}

impl<P: PointPredictor + ?Sized> PointPredictor for &P {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn feature_names(&self) -> Option<&[String]> {
        (**self).feature_names()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: PointPredictor + ?Sized> PointPredictor for Box<P> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn feature_names(&self) -> Option<&[String]> {
        (**self).feature_names()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: PointPredictor + ?Sized> PointPredictor for Arc<P> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn feature_names(&self) -> Option<&[String]> {
        (**self).feature_names()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub mod function;
pub mod linear;
pub mod persistence;

pub use function::FnPredictor;
pub use linear::LinearPredictor;
pub use persistence::PersistencePredictor;
