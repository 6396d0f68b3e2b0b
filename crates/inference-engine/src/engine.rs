//! Inference Engine Implementation

use crate::bundle::ModelBundle;
use crate::forest::Classifier;
use crate::InferenceError;
use chrono::{DateTime, Utc};
use feature_engine::{FeatureEngineer, RawRecord, Reading, ReadingSequence};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Failure probability for one reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Timestamp of the scored reading
    pub timestamp: DateTime<Utc>,
    /// Probability of the failure class (0.0 to 1.0)
    pub probability: f64,
}

/// Scores pump readings against a loaded model bundle
pub struct InferenceEngine<'a> {
    /// Artifacts, shared read-only
    bundle: &'a ModelBundle,
    /// Feature engineering applied before column selection
    engineer: FeatureEngineer,
}

impl<'a> InferenceEngine<'a> {
    /// Create an engine with the default feature engineer
    pub fn new(bundle: &'a ModelBundle) -> Self {
        Self::with_engineer(bundle, FeatureEngineer::default())
    }

    /// Create an engine with a custom feature engineer
    pub fn with_engineer(bundle: &'a ModelBundle, engineer: FeatureEngineer) -> Self {
        info!(
            "Creating inference engine: {} features, window={}",
            bundle.feature_names().len(),
            engineer.window()
        );
        Self { bundle, engineer }
    }

    /// Score every reading of a sequence, in input order
    pub fn predict_sequence(&self, sequence: &ReadingSequence) -> Result<Vec<f64>, InferenceError> {
        let features = self.engineer.engineer(sequence);

        let mut matrix = self.bundle.select(&features);
        self.bundle.scaler().transform(&mut matrix)?;

        let probabilities = self.bundle.classifier().predict_proba_batch(&matrix);
        debug!("Scored {} readings", probabilities.len());

        Ok(probabilities)
    }

    /// Score dict-like records; fails on the first missing column
    pub fn predict_records(&self, records: &[RawRecord]) -> Result<Vec<f64>, InferenceError> {
        let sequence = ReadingSequence::from_records(records)?;
        self.predict_sequence(&sequence)
    }

    /// Score a single observation.
    ///
    /// The reading is engineered as a sequence of one: rolling means equal
    /// the raw values, rolling std and rate-of-change are 0.
    pub fn predict_reading(&self, reading: &Reading) -> Result<f64, InferenceError> {
        let sequence = ReadingSequence::single(reading.clone());
        self.predict_sequence(&sequence)?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InvalidInputShape {
                expected: "1 probability".to_string(),
                actual: "0 probabilities".to_string(),
            })
    }

    /// Score a sequence, pairing each probability with its timestamp
    pub fn predict_history(
        &self,
        sequence: &ReadingSequence,
    ) -> Result<Vec<Prediction>, InferenceError> {
        let probabilities = self.predict_sequence(sequence)?;

        Ok(sequence
            .readings()
            .iter()
            .zip(probabilities)
            .map(|(reading, probability)| Prediction {
                timestamp: reading.timestamp,
                probability,
            })
            .collect())
    }

    pub fn bundle(&self) -> &ModelBundle {
        self.bundle
    }
}
