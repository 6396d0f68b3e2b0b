//! Tree-Ensemble Failure Classifier

use crate::InferenceError;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Binary classifier scoring one scaled feature row
pub trait Classifier {
    /// Width of the feature rows the classifier was trained on
    fn n_features(&self) -> usize;

    /// Probability mass of the positive ("failure") class, in `[0, 1]`
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64;

    /// Score every row of a feature matrix, in row order
    fn predict_proba_batch(&self, rows: &Array2<f64>) -> Vec<f64> {
        rows.rows()
            .into_iter()
            .map(|row| self.predict_proba(row))
            .collect()
    }
}

/// Node of a decision tree, addressed by index into the tree's node list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Go `left` when `row[feature] <= threshold`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Fraction of positive training samples that reached this leaf
    Leaf { probability: f64 },
}

/// Binary decision tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Create a tree from its node list, checking its structure
    pub fn new(nodes: Vec<Node>, n_features: usize) -> Result<Self, InferenceError> {
        let tree = Self { nodes };
        tree.validate(n_features)?;
        Ok(tree)
    }

    /// Tree consisting of a single leaf; the probability must lie in `0..=1`
    pub fn leaf(probability: f64) -> Result<Self, InferenceError> {
        Self::new(vec![Node::Leaf { probability }], 0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Children must point strictly forward, which rules out cycles and
    /// guarantees every walk ends at a leaf.
    fn validate(&self, n_features: usize) -> Result<(), InferenceError> {
        if self.nodes.is_empty() {
            return Err(InferenceError::InvalidModel("empty decision tree".into()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(InferenceError::InvalidModel(format!(
                            "node {} splits on feature {} of {}",
                            idx, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(InferenceError::InvalidModel(format!(
                            "node {} has a NaN threshold",
                            idx
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(InferenceError::InvalidModel(format!(
                                "node {} has invalid child {}",
                                idx, child
                            )));
                        }
                    }
                }
                Node::Leaf { probability } => {
                    if !(0.0..=1.0).contains(&probability) {
                        return Err(InferenceError::InvalidModel(format!(
                            "leaf {} has probability {}",
                            idx, probability
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf and return its probability
    pub fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
                Node::Leaf { probability } => return probability,
            }
        }
    }
}

/// Random-forest classifier: the mean of its trees' leaf probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Create a forest over rows of `n_features` columns
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Result<Self, InferenceError> {
        let forest = Self { n_features, trees };
        forest.validate()?;
        Ok(forest)
    }

    /// Check every tree against the forest's feature width
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::InvalidModel("forest has no trees".into()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.n_features))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_proba(row)).sum();
        (total / self.trees.len() as f64).clamp(0.0, 1.0)
    }
}
