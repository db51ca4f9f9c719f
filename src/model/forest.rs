//! Balanced bagging ensemble of decision trees. Every tree sees a bootstrap in which
//! each class is resampled with replacement to the minority-class size, so class
//! imbalance is handled inside the ensemble.

use crate::config::ForestConfig;
use crate::error::{PipelineError, Result};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use std::collections::BTreeMap;

type Tree = DecisionTreeClassifier<f64, usize, DenseMatrix<f64>, Vec<usize>>;

fn to_dense(x: &Array2<f64>) -> Result<DenseMatrix<f64>> {
    let (rows, cols) = x.dim();
    let values: Vec<f64> = x.iter().copied().collect();
    DenseMatrix::new(rows, cols, values, false).map_err(|e| PipelineError::Model(e.to_string()))
}

#[derive(Serialize, Deserialize)]
pub struct BalancedForest {
    trees: Vec<Tree>,
    n_features: usize,
}

impl std::fmt::Debug for BalancedForest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalancedForest")
            .field("trees", &self.trees.len())
            .field("n_features", &self.n_features)
            .finish()
    }
}

impl BalancedForest {
    /// Fit on `x` (one row per session) with labels `y`. Needs at least two classes.
    pub fn fit(x: &Array2<f64>, y: &[usize], config: &ForestConfig) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(PipelineError::Model("no training rows".to_string()));
        }
        if x.nrows() != y.len() {
            return Err(PipelineError::Model(format!(
                "{} rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }

        let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &label) in y.iter().enumerate() {
            by_class.entry(label).or_default().push(i);
        }
        if by_class.len() < 2 {
            return Err(PipelineError::Model(
                "need at least 2 classes to train".to_string(),
            ));
        }
        let minority = by_class.values().map(Vec::len).min().unwrap_or(0);

        let params = DecisionTreeClassifierParameters::default()
            .with_max_depth(config.max_depth)
            .with_min_samples_leaf(config.min_samples_leaf)
            .with_min_samples_split(config.min_samples_split);

        let mut trees = Vec::with_capacity(config.n_trees);
        for t in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
            let mut rows = Vec::with_capacity(minority * by_class.len());
            for members in by_class.values() {
                for _ in 0..minority {
                    rows.push(members[rng.gen_range(0..members.len())]);
                }
            }
            let sample = to_dense(&x.select(Axis(0), &rows))?;
            let labels: Vec<usize> = rows.iter().map(|&r| y[r]).collect();

            match DecisionTreeClassifier::fit(&sample, &labels, params.clone()) {
                Ok(tree) => trees.push(tree),
                Err(e) => tracing::warn!(tree = t, error = %e, "failed to train tree"),
            }
        }
        if trees.is_empty() {
            return Err(PipelineError::Model("all trees failed to train".to_string()));
        }

        tracing::info!(
            trees = trees.len(),
            per_class = minority,
            features = x.ncols(),
            "trained balanced forest"
        );
        Ok(Self {
            trees,
            n_features: x.ncols(),
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fraction of trees voting for class 1, per row.
    pub fn predict_scores(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if x.ncols() != self.n_features {
            return Err(PipelineError::SchemaMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }
        let dense = to_dense(x)?;
        let mut votes = vec![0usize; x.nrows()];
        for tree in &self.trees {
            let predicted = tree
                .predict(&dense)
                .map_err(|e| PipelineError::Model(e.to_string()))?;
            for (v, class) in votes.iter_mut().zip(predicted) {
                *v += usize::from(class == 1);
            }
        }
        let n = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v as f64 / n).collect())
    }

    /// Majority vote at 0.5; a tied vote goes to class 0.
    pub fn threshold(score: f64) -> usize {
        usize::from(score > 0.5)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        Ok(self
            .predict_scores(x)?
            .into_iter()
            .map(Self::threshold)
            .collect())
    }
}
