//! Model Artifact Bundle

use crate::forest::{Classifier, RandomForest};
use crate::scaler::StandardScaler;
use crate::InferenceError;
use feature_engine::{feature_index, EngineeredFeatures};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// File names of the three artifacts inside a model directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Classifier, postcard-encoded
    pub classifier: String,
    /// Fitted scaler, JSON
    pub scaler: String,
    /// Ordered feature names, JSON array
    pub feature_names: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            classifier: "pump_failure_model.bin".to_string(),
            scaler: "scaler.json".to_string(),
            feature_names: "feature_names.json".to_string(),
        }
    }
}

/// Trained classifier, fitted scaler and the ordered feature names they were
/// trained on. Immutable once built.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    classifier: RandomForest,
    scaler: StandardScaler,
    feature_names: Vec<String>,
    /// Position of each model column in the engineered feature vector
    columns: Vec<usize>,
}

impl ModelBundle {
    /// Assemble a bundle, resolving the feature names against the engineered
    /// feature layout.
    pub fn new(
        classifier: RandomForest,
        scaler: StandardScaler,
        feature_names: Vec<String>,
    ) -> Result<Self, InferenceError> {
        let columns = feature_names
            .iter()
            .map(|name| {
                feature_index(name).ok_or_else(|| InferenceError::FeatureMismatch {
                    name: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if scaler.n_features() != columns.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("scaler over {} features", columns.len()),
                actual: format!("scaler over {} features", scaler.n_features()),
            });
        }

        if classifier.n_features() != columns.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("classifier over {} features", columns.len()),
                actual: format!("classifier over {} features", classifier.n_features()),
            });
        }

        Ok(Self {
            classifier,
            scaler,
            feature_names,
            columns,
        })
    }

    /// Load the three artifacts from `dir`
    pub fn load(dir: impl AsRef<Path>, paths: &ArtifactPaths) -> Result<Self, InferenceError> {
        let dir = dir.as_ref();
        info!("Loading model artifacts from {}", dir.display());

        let classifier = load_classifier(&dir.join(&paths.classifier))?;
        let scaler = load_scaler(&dir.join(&paths.scaler))?;
        let feature_names = load_feature_names(&dir.join(&paths.feature_names))?;

        let bundle = Self::new(classifier, scaler, feature_names)?;
        info!(
            "Model loaded: {} trees over {} features",
            bundle.classifier.n_trees(),
            bundle.feature_names.len()
        );
        Ok(bundle)
    }

    /// Write the three artifacts into `dir`, creating it if needed
    pub fn save(&self, dir: impl AsRef<Path>, paths: &ArtifactPaths) -> Result<(), InferenceError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| save_error("model directory", e))?;

        let classifier =
            postcard::to_allocvec(&self.classifier).map_err(|e| save_error("classifier", e))?;
        fs::write(dir.join(&paths.classifier), classifier)
            .map_err(|e| save_error("classifier", e))?;

        let scaler =
            serde_json::to_vec_pretty(&self.scaler).map_err(|e| save_error("scaler", e))?;
        fs::write(dir.join(&paths.scaler), scaler).map_err(|e| save_error("scaler", e))?;

        let names = serde_json::to_vec_pretty(&self.feature_names)
            .map_err(|e| save_error("feature names", e))?;
        fs::write(dir.join(&paths.feature_names), names)
            .map_err(|e| save_error("feature names", e))?;

        debug!("Model artifacts written to {}", dir.display());
        Ok(())
    }

    pub fn classifier(&self) -> &RandomForest {
        &self.classifier
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Select the model's columns, in model order, from engineered rows
    pub fn select(&self, rows: &[EngineeredFeatures]) -> Array2<f64> {
        let vectors: Vec<_> = rows.iter().map(EngineeredFeatures::to_vector).collect();
        Array2::from_shape_fn((rows.len(), self.columns.len()), |(i, j)| {
            vectors[i][self.columns[j]]
        })
    }
}

fn read_artifact(artifact: &'static str, path: &Path) -> Result<Vec<u8>, InferenceError> {
    debug!("Reading {} artifact: {}", artifact, path.display());
    fs::read(path).map_err(|e| InferenceError::ArtifactLoad {
        artifact,
        reason: format!("{}: {}", path.display(), e),
    })
}

fn load_classifier(path: &Path) -> Result<RandomForest, InferenceError> {
    let bytes = read_artifact("classifier", path)?;
    let forest: RandomForest =
        postcard::from_bytes(&bytes).map_err(|e| load_error("classifier", e))?;
    forest.validate().map_err(|e| load_error("classifier", e))?;
    Ok(forest)
}

fn load_scaler(path: &Path) -> Result<StandardScaler, InferenceError> {
    let bytes = read_artifact("scaler", path)?;
    let scaler: StandardScaler =
        serde_json::from_slice(&bytes).map_err(|e| load_error("scaler", e))?;
    scaler.validate().map_err(|e| load_error("scaler", e))?;
    Ok(scaler.with_unit_constant_columns())
}

fn load_feature_names(path: &Path) -> Result<Vec<String>, InferenceError> {
    let bytes = read_artifact("feature names", path)?;
    serde_json::from_slice(&bytes).map_err(|e| load_error("feature names", e))
}

fn load_error(artifact: &'static str, err: impl std::fmt::Display) -> InferenceError {
    InferenceError::ArtifactLoad {
        artifact,
        reason: err.to_string(),
    }
}

fn save_error(artifact: &'static str, err: impl std::fmt::Display) -> InferenceError {
    InferenceError::ArtifactSave {
        artifact,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pump_bundle, scratch_dir};
    use feature_engine::FEATURE_NAMES;

    #[test]
    fn test_unknown_feature_name_rejected() {
        let names = vec!["vibration".to_string(), "bearing_noise".to_string()];
        let forest = RandomForest::new(2, vec![crate::DecisionTree::leaf(0.5).unwrap()]).unwrap();

        match ModelBundle::new(forest, StandardScaler::identity(2), names) {
            Err(InferenceError::FeatureMismatch { name }) => assert_eq!(name, "bearing_noise"),
            other => panic!("expected FeatureMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_scaler_width_mismatch_rejected() {
        let names = vec!["vibration".to_string()];
        let forest = RandomForest::new(1, vec![crate::DecisionTree::leaf(0.5).unwrap()]).unwrap();
        assert!(matches!(
            ModelBundle::new(forest, StandardScaler::identity(2), names),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }

    #[test]
    fn test_columns_follow_model_order() {
        let bundle = pump_bundle();
        assert_eq!(bundle.feature_names().len(), FEATURE_NAMES.len());
        assert_eq!(bundle.feature_names()[0], "rpm_rate_of_change");
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("save-load");
        let bundle = pump_bundle();
        let paths = ArtifactPaths::default();

        bundle.save(&dir, &paths).unwrap();
        let loaded = ModelBundle::load(&dir, &paths).unwrap();

        assert_eq!(loaded.classifier(), bundle.classifier());
        assert_eq!(loaded.scaler(), bundle.scaler());
        assert_eq!(loaded.feature_names(), bundle.feature_names());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = scratch_dir("missing");
        let paths = ArtifactPaths::default();
        pump_bundle().save(&dir, &paths).unwrap();
        fs::remove_file(dir.join(&paths.scaler)).unwrap();

        assert!(matches!(
            ModelBundle::load(&dir, &paths),
            Err(InferenceError::ArtifactLoad {
                artifact: "scaler",
                ..
            })
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_classifier() {
        let dir = scratch_dir("corrupt");
        let paths = ArtifactPaths::default();
        pump_bundle().save(&dir, &paths).unwrap();
        fs::write(dir.join(&paths.classifier), b"\xff\xff\xff").unwrap();

        assert!(matches!(
            ModelBundle::load(&dir, &paths),
            Err(InferenceError::ArtifactLoad {
                artifact: "classifier",
                ..
            })
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_name_on_disk_is_feature_mismatch() {
        let dir = scratch_dir("mismatch");
        let paths = ArtifactPaths::default();
        pump_bundle().save(&dir, &paths).unwrap();

        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        names[3] = "vibration_rolling_max_1h".to_string();
        fs::write(
            dir.join(&paths.feature_names),
            serde_json::to_vec(&names).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            ModelBundle::load(&dir, &paths),
            Err(InferenceError::FeatureMismatch { .. })
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
