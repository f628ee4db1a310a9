use super::error::InferenceError;
use super::trainer::TrainedModel;
use crate::dataset::{PatientRecord, RiskCategory};

/// Predicted risk category plus the class probabilities behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub category: RiskCategory,
    /// Indexed by class code.
    pub probabilities: [f32; RiskCategory::COUNT],
}

impl Prediction {
    /// Display label, e.g. `High Risk`.
    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    /// Probability of the predicted category.
    pub fn confidence(&self) -> f32 {
        self.probabilities[self.category.code()]
    }
}

impl TrainedModel {
    /// Classify one patient record.
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction, InferenceError> {
        let features = record.to_matrix();
        let row = features.row(0);
        let proba = self.classifier.predict_proba_row(row);
        let code = self.classifier.predict_row(row);
        let category = RiskCategory::from_code(code).ok_or(InferenceError::UnknownClass(code))?;
        let mut probabilities = [0.0; RiskCategory::COUNT];
        for (slot, p) in probabilities.iter_mut().zip(proba) {
            *slot = p;
        }
        Ok(Prediction {
            category,
            probabilities,
        })
    }
}

/// Classify `record` with `model`, failing when nothing has been trained yet.
pub fn predict_risk(
    model: Option<&TrainedModel>,
    record: &PatientRecord,
) -> Result<Prediction, InferenceError> {
    let model = model.ok_or(InferenceError::NoModel)?;
    let prediction = model.predict(record)?;
    tracing::info!(
        "Predicted {} ({:.2}) for {:?}",
        prediction.label(),
        prediction.confidence(),
        record
    );
    Ok(prediction)
}
