//! Fitted Feature Scaler

use crate::InferenceError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Per-column standardization fitted at training time: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted column means and scales.
    ///
    /// A zero scale marks a constant training column and is stored as 1.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, InferenceError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler.with_unit_constant_columns())
    }

    /// Identity transform over `n` columns
    pub fn identity(n: usize) -> Self {
        Self {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    /// Number of columns the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Check the fitted parameters are usable
    pub(crate) fn validate(&self) -> Result<(), InferenceError> {
        if self.mean.len() != self.scale.len() {
            return Err(InferenceError::InvalidModel(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }

        let non_finite = self
            .mean
            .iter()
            .chain(&self.scale)
            .any(|v| !v.is_finite());
        if non_finite {
            return Err(InferenceError::InvalidModel(
                "scaler parameters must be finite".to_string(),
            ));
        }

        if self.scale.iter().any(|&s| s < 0.0) {
            return Err(InferenceError::InvalidModel(
                "scaler scales must be non-negative".to_string(),
            ));
        }

        Ok(())
    }

    pub(crate) fn with_unit_constant_columns(mut self) -> Self {
        for s in self.scale.iter_mut().filter(|s| **s == 0.0) {
            *s = 1.0;
        }
        self
    }

    /// Standardize every row of `features` in place
    pub fn transform(&self, features: &mut Array2<f64>) -> Result<(), InferenceError> {
        if features.ncols() != self.n_features() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[_, {}]", self.n_features()),
                actual: format!("{:?}", features.shape()),
            });
        }

        for mut row in features.rows_mut() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (*value - self.mean[j]) / self.scale[j];
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let mut x = array![[3.0, 10.0], [1.0, 20.0]];
        scaler.transform(&mut x).unwrap();
        assert_eq!(x, array![[1.0, 0.0], [0.0, 2.0]]);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![5.0], vec![0.0]).unwrap();
        assert_eq!(scaler.scale(), &[1.0]);

        let mut x = array![[7.0]];
        scaler.transform(&mut x).unwrap();
        assert_eq!(x, array![[2.0]]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(matches!(
            StandardScaler::new(vec![0.0, 1.0], vec![1.0]),
            Err(InferenceError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_wrong_width_rejected() {
        let scaler = StandardScaler::identity(3);
        let mut x = array![[1.0, 2.0]];
        assert!(matches!(
            scaler.transform(&mut x),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }
}
