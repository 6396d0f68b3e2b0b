//! Pump Failure Inference Engine
//!
//! Loads the trained model artifact bundle and scores engineered pump
//! features with it.

mod bundle;
mod engine;
mod forest;
mod scaler;

#[cfg(test)]
pub(crate) mod test_support;

pub use bundle::{ArtifactPaths, ModelBundle};
pub use engine::{InferenceEngine, Prediction};
pub use forest::{Classifier, DecisionTree, Node, RandomForest};
pub use scaler::StandardScaler;

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error("Model expects feature {name:?}, which the feature engine does not produce")]
    FeatureMismatch { name: String },
    #[error("Failed to load {artifact} artifact: {reason}")]
    ArtifactLoad {
        artifact: &'static str,
        reason: String,
    },
    #[error("Failed to save {artifact} artifact: {reason}")]
    ArtifactSave {
        artifact: &'static str,
        reason: String,
    },
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}
