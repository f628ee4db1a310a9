//! Bagged Gini decision trees with per-split feature subsampling.
//!
//! - Each tree is grown on a bootstrap sample drawn from a seeded RNG, so the
//!   same seed and data always produce the same forest.
//! - Predictions average the leaf class distributions of all trees.

mod tree;

pub use tree::{DecisionTree, TreeNode};

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Classifier, FitError, TrainedClassifier, check_fit_inputs};
use tree::{GrowParams, grow_tree};

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestOptions {
    /// Number of trees.
    pub n_trees: usize,
    /// Maximum tree depth; unlimited when `None`.
    pub max_depth: Option<usize>,
    /// Nodes with fewer rows become leaves.
    pub min_samples_split: usize,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl ForestOptions {
    pub(crate) fn normalized(self) -> Self {
        Self {
            n_trees: self.n_trees.clamp(1, 1_000),
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split.max(2),
        }
    }
}

/// Random forest classifier configuration plus its RNG seed.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub options: ForestOptions,
    pub seed: u64,
}

impl RandomForest {
    pub fn new(options: ForestOptions, seed: u64) -> Self {
        Self { options, seed }
    }
}

/// Fitted forest.
#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

#[cfg(test)]
impl ForestModel {
    pub(crate) fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl Classifier for RandomForest {
    type Model = ForestModel;

    fn fit(
        &self,
        features: ArrayView2<'_, f32>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<ForestModel, FitError> {
        check_fit_inputs(features, labels, n_classes)?;
        let n_rows = labels.len();
        let params = GrowParams {
            n_classes,
            max_depth: self.options.max_depth,
            min_samples_split: self.options.min_samples_split.max(2),
            max_features: sqrt_features(features.ncols()),
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let n_trees = self.options.n_trees.max(1);
        let mut trees = Vec::with_capacity(n_trees);
        for _ in 0..n_trees {
            let mut tree_rng = StdRng::seed_from_u64(rng.random::<u64>());
            let mut sample: Vec<usize> = (0..n_rows)
                .map(|_| tree_rng.random_range(0..n_rows))
                .collect();
            trees.push(grow_tree(features, labels, &mut sample, params, &mut tree_rng));
        }
        Ok(ForestModel { trees, n_classes })
    }
}

impl TrainedClassifier for ForestModel {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba_row(&self, row: ArrayView1<'_, f32>) -> Vec<f32> {
        let mut totals = vec![0.0f32; self.n_classes];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.predict_proba_row(row)) {
                *total += p;
            }
        }
        let n_trees = self.trees.len().max(1) as f32;
        for total in &mut totals {
            *total /= n_trees;
        }
        totals
    }
}

fn sqrt_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn separable() -> (Array2<f32>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30 {
            let class = i % 3;
            let base = class as f32 * 10.0;
            rows.extend_from_slice(&[base + (i % 4) as f32, 50.0, base * 2.0 + 1.0]);
            labels.push(class);
        }
        (Array2::from_shape_vec((30, 3), rows).unwrap(), labels)
    }

    #[test]
    fn fits_the_requested_number_of_trees() {
        let (x, y) = separable();
        let options = ForestOptions {
            n_trees: 7,
            ..ForestOptions::default()
        };
        let model = RandomForest::new(options, 42).fit(x.view(), &y, 3).unwrap();
        assert_eq!(model.trees().len(), 7);
        assert_eq!(model.n_classes(), 3);
    }

    #[test]
    fn learns_separable_classes() {
        let (x, y) = separable();
        let model = RandomForest::new(ForestOptions::default(), 42)
            .fit(x.view(), &y, 3)
            .unwrap();
        assert_eq!(model.predict(x.view()), y);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (x, y) = separable();
        let model = RandomForest::new(ForestOptions::default(), 3)
            .fit(x.view(), &y, 3)
            .unwrap();
        for row in x.rows() {
            let proba = model.predict_proba_row(row);
            assert_eq!(proba.len(), 3);
            assert!((proba.iter().sum::<f32>() - 1.0).abs() < 1e-4);
            assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn same_seed_gives_same_forest() {
        let (x, y) = separable();
        let probe = ndarray::arr1(&[14.0f32, 50.0, 15.0]);
        let a = RandomForest::new(ForestOptions::default(), 42)
            .fit(x.view(), &y, 3)
            .unwrap();
        let b = RandomForest::new(ForestOptions::default(), 42)
            .fit(x.view(), &y, 3)
            .unwrap();
        assert_eq!(
            a.predict_proba_row(probe.view()),
            b.predict_proba_row(probe.view())
        );
    }

    #[test]
    fn single_class_training_predicts_that_class() {
        let x = Array2::from_shape_vec((3, 1), vec![1.0f32, 2.0, 3.0]).unwrap();
        let model = RandomForest::new(ForestOptions::default(), 0)
            .fit(x.view(), &[2, 2, 2], 3)
            .unwrap();
        assert_eq!(model.predict(x.view()), vec![2, 2, 2]);
    }

    #[test]
    fn normalization_clamps_options() {
        let options = ForestOptions {
            n_trees: 0,
            max_depth: Some(3),
            min_samples_split: 0,
        }
        .normalized();
        assert_eq!(options.n_trees, 1);
        assert_eq!(options.min_samples_split, 2);
        assert_eq!(options.max_depth, Some(3));
    }
}
