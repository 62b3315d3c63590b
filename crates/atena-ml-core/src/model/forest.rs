//! Random-forest regressor.
//!
//! Each tree is grown on a bootstrap resample of the training rows; the
//! forest predicts the mean of its trees. All randomness comes from one
//! seeded PCG stream, so a given seed and input always produce the same
//! forest.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};
use crate::error::TrainingError;
use crate::features::FeatureMatrix;

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// Maximum tree depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Minimum samples a node needs before it may split
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,

    /// Minimum samples on each side of a split
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,

    /// Features considered per split (unset = all)
    #[serde(default)]
    pub max_features: Option<usize>,

    /// Resample rows with replacement for each tree
    #[serde(default = "default_bootstrap")]
    pub bootstrap: bool,

    /// Random seed for reproducibility
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_n_estimators() -> usize {
    100
}
fn default_max_depth() -> usize {
    10
}
fn default_min_samples_split() -> usize {
    2
}
fn default_min_samples_leaf() -> usize {
    1
}
fn default_bootstrap() -> bool {
    true
}
fn default_seed() -> u64 {
    42
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: default_max_depth(),
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            max_features: None,
            bootstrap: default_bootstrap(),
            seed: default_seed(),
        }
    }
}

impl ForestParams {
    /// Check parameter ranges.
    ///
    /// # Errors
    /// Returns [`TrainingError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<(), TrainingError> {
        let invalid = |name: &str, message: &str| {
            Err(TrainingError::InvalidParameter {
                name: name.to_string(),
                message: message.to_string(),
            })
        };

        if self.n_estimators == 0 {
            return invalid("n_estimators", "must be at least 1");
        }
        if self.min_samples_split < 2 {
            return invalid("min_samples_split", "must be at least 2");
        }
        if self.min_samples_leaf == 0 {
            return invalid("min_samples_leaf", "must be at least 1");
        }
        if self.max_features == Some(0) {
            return invalid("max_features", "must be at least 1 when set");
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }
}

/// Bagged ensemble of regression trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor {
    params: ForestParams,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl RandomForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Column count the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Fit on `x`/`y`, replacing any previously fitted trees.
    ///
    /// On error the previous fit is kept.
    ///
    /// # Errors
    /// Fails on invalid parameters, an empty matrix, or a target vector
    /// whose length differs from the row count.
    pub fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<(), TrainingError> {
        self.params.validate()?;
        if x.is_empty() {
            return Err(TrainingError::EmptyBatch);
        }
        if x.n_rows() != y.len() {
            return Err(TrainingError::LengthMismatch {
                rows: x.n_rows(),
                targets: y.len(),
            });
        }

        let n = x.n_rows();
        let tree_params = self.params.tree_params();
        let mut rng = Mcg128Xsl64::seed_from_u64(self.params.seed);

        let trees: Vec<RegressionTree> = (0..self.params.n_estimators)
            .map(|_| {
                let sample: Vec<usize> = if self.params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(x, y, sample, &tree_params, &mut rng)
            })
            .collect();

        self.trees = trees;
        self.n_features = x.n_cols();
        Ok(())
    }

    /// Mean tree prediction for one encoded row.
    ///
    /// # Errors
    /// Fails before the first fit or when the row width is wrong.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, TrainingError> {
        if !self.is_fitted() {
            return Err(TrainingError::NotTrained);
        }
        if row.len() != self.n_features {
            return Err(TrainingError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        let total: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        Ok(total / self.trees.len() as f64)
    }

    /// Predict every row of `x`.
    ///
    /// # Errors
    /// Fails before the first fit or when the column count is wrong.
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>, TrainingError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        x.rows().map(|row| self.predict_row(row)).collect()
    }
}
