use thiserror::Error;

use crate::dataset::{LoadError, RiskCategory, SchemaError};
use crate::ml::FitError;

/// The dataset cannot produce a usable model.
#[derive(Debug, Error, PartialEq)]
pub enum TrainingError {
    #[error("Need at least 2 rows to train, got {rows}")]
    TooFewRows { rows: usize },
    #[error("Every row is labelled {only}; need at least 2 risk levels to train")]
    SingleClass { only: RiskCategory },
    #[error("Split left {train} training and {test} test rows; both must be non-empty")]
    EmptyPartition { train: usize, test: usize },
    #[error("Classifier fit failed: {0}")]
    Fit(#[from] FitError),
}

/// A prediction could not be produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("No model has been trained yet; upload a dataset first")]
    NoModel,
    #[error("Model returned unknown class code {0}")]
    UnknownClass(usize),
}

/// Any failure of the load → clean → train → predict chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
