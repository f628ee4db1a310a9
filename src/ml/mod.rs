//! Machine learning helpers for training and inference.
//!
//! Both classifiers are small deterministic implementations kept in-crate; the
//! rest of the app only sees them through [`Classifier`] and [`TrainedClassifier`].

use std::fmt;

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod forest;
pub mod gbdt_stump;
pub mod metrics;
pub mod split;

/// Errors raised when a classifier cannot be fitted.
#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("Cannot fit on an empty dataset")]
    EmptyDataset,
    #[error("Feature rows ({features}) and labels ({labels}) differ in length")]
    LengthMismatch { features: usize, labels: usize },
    #[error("Need at least 2 classes, got {0}")]
    TooFewClasses(usize),
    #[error("Label {label} is outside 0..{n_classes}")]
    LabelOutOfRange { label: usize, n_classes: usize },
}

/// Something that can be fitted on a feature matrix and integer class labels.
pub trait Classifier {
    type Model: TrainedClassifier + 'static;

    /// Fit on `features` (`[rows][cols]`) and `labels` in `0..n_classes`.
    fn fit(
        &self,
        features: ArrayView2<'_, f32>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Self::Model, FitError>;
}

/// A fitted model that predicts class indices.
pub trait TrainedClassifier: fmt::Debug {
    /// Number of classes the model was fitted for.
    fn n_classes(&self) -> usize;

    /// Class probabilities for one feature row; sums to 1.
    fn predict_proba_row(&self, row: ArrayView1<'_, f32>) -> Vec<f32>;

    /// Most likely class for one feature row.
    fn predict_row(&self, row: ArrayView1<'_, f32>) -> usize {
        argmax(&self.predict_proba_row(row))
    }

    /// Most likely class for every row.
    fn predict(&self, features: ArrayView2<'_, f32>) -> Vec<usize> {
        features
            .rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect()
    }
}

/// Which classifier the trainer fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Bagged Gini decision trees.
    #[default]
    RandomForest,
    /// Softmax-boosted decision stumps.
    GbdtStump,
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierKind::RandomForest => f.write_str("random forest"),
            ClassifierKind::GbdtStump => f.write_str("boosted stumps"),
        }
    }
}

/// Shared input checks for every classifier.
pub(crate) fn check_fit_inputs(
    features: ArrayView2<'_, f32>,
    labels: &[usize],
    n_classes: usize,
) -> Result<(), FitError> {
    if features.nrows() != labels.len() {
        return Err(FitError::LengthMismatch {
            features: features.nrows(),
            labels: labels.len(),
        });
    }
    if labels.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    if n_classes < 2 {
        return Err(FitError::TooFewClasses(n_classes));
    }
    if let Some(&label) = labels.iter().find(|&&label| label >= n_classes) {
        return Err(FitError::LabelOutOfRange { label, n_classes });
    }
    Ok(())
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn fit_input_checks() {
        let x = Array2::<f32>::zeros((2, 3));
        assert_eq!(
            check_fit_inputs(x.view(), &[0], 3),
            Err(FitError::LengthMismatch {
                features: 2,
                labels: 1
            })
        );
        assert_eq!(
            check_fit_inputs(x.view(), &[0, 1], 1),
            Err(FitError::TooFewClasses(1))
        );
        assert_eq!(
            check_fit_inputs(x.view(), &[0, 5], 3),
            Err(FitError::LabelOutOfRange {
                label: 5,
                n_classes: 3
            })
        );
        let empty = Array2::<f32>::zeros((0, 3));
        assert_eq!(
            check_fit_inputs(empty.view(), &[], 3),
            Err(FitError::EmptyDataset)
        );
        assert!(check_fit_inputs(x.view(), &[0, 2], 3).is_ok());
    }

    #[test]
    fn classifier_kind_uses_snake_case_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: ClassifierKind,
        }
        let parsed: Wrapper = toml::from_str("kind = \"gbdt_stump\"").unwrap();
        assert_eq!(parsed.kind, ClassifierKind::GbdtStump);
    }
}
