//! Load → clean → split → train → predict, independent of any UI.

mod error;
mod predictor;
mod trainer;

pub use error::{InferenceError, PipelineError, TrainingError};
pub use predictor::{Prediction, predict_risk};
pub use trainer::{EvaluationReport, TrainedModel, TrainingOptions, train_model};

use std::path::Path;

use crate::dataset::{Table, prepare_dataset};

/// Clean a loaded table and train a model on it.
pub fn train_from_table(
    table: &Table,
    options: &TrainingOptions,
) -> Result<TrainedModel, PipelineError> {
    let prepared = prepare_dataset(table)?;
    Ok(train_model(&prepared.dataset, options)?)
}

/// Read a CSV file and train a model on it.
pub fn train_from_path(
    path: &Path,
    options: &TrainingOptions,
) -> Result<TrainedModel, PipelineError> {
    tracing::info!("Loading dataset from {}", path.display());
    let table = Table::from_path(path)?;
    train_from_table(&table, options)
}

/// Parse in-memory CSV bytes and train a model on them.
pub fn train_from_bytes(
    bytes: &[u8],
    options: &TrainingOptions,
) -> Result<TrainedModel, PipelineError> {
    let table = Table::from_bytes(bytes)?;
    train_from_table(&table, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SchemaError;

    #[test]
    fn non_numeric_feature_surfaces_as_schema_error() {
        let csv = "Age,SystolicBP,DiastolicBP,BS,BodyTemp,HeartRate,RiskLevel\n\
                   abc,130,80,15,98,86,high risk\n\
                   30,120,80,6,98,70,low risk\n";
        let err = train_from_bytes(csv.as_bytes(), &TrainingOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Schema(SchemaError::InvalidValue { column: "Age", row: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = train_from_path(
            Path::new("/definitely/not/here.csv"),
            &TrainingOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Load(_)));
    }

    #[test]
    fn header_only_file_cannot_train() {
        let csv = "Age,SystolicBP,DiastolicBP,BS,BodyTemp,HeartRate,RiskLevel\n";
        let err = train_from_bytes(csv.as_bytes(), &TrainingOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Training(TrainingError::TooFewRows { rows: 0 })
        ));
    }
}
