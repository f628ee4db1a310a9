//! One interactive run: at most one trained model, replaced on every upload.
//!
//! ```text
//! NoFileUploaded --upload ok--> ModelTrained --predict--> PredictionShown
//!        ^                          |  ^                        |
//!        +------ upload failed -----+  +---- upload ok ---------+
//! ```

use std::path::Path;

use crate::dataset::PatientRecord;
use crate::pipeline::{
    self, EvaluationReport, PipelineError, Prediction, TrainedModel, TrainingOptions,
};

/// Where the session is in the upload → train → predict flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoFileUploaded,
    ModelTrained,
    PredictionShown,
}

/// Holds the current model and the last prediction made with it.
#[derive(Debug, Default)]
pub struct Session {
    options: TrainingOptions,
    dataset_name: Option<String>,
    model: Option<TrainedModel>,
    last_prediction: Option<Prediction>,
}

impl Session {
    pub fn new(options: TrainingOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.model, &self.last_prediction) {
            (None, _) => SessionState::NoFileUploaded,
            (Some(_), None) => SessionState::ModelTrained,
            (Some(_), Some(_)) => SessionState::PredictionShown,
        }
    }

    pub fn options(&self) -> &TrainingOptions {
        &self.options
    }

    /// Name of the file the current model was trained on.
    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn accuracy(&self) -> Option<f32> {
        self.model.as_ref().map(|model| model.accuracy)
    }

    pub fn report(&self) -> Option<&EvaluationReport> {
        self.model.as_ref().map(|model| &model.report)
    }

    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last_prediction.as_ref()
    }

    /// Train on a CSV file, replacing whatever model came before.
    pub fn upload_path(&mut self, path: &Path) -> Result<f32, PipelineError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.reset();
        let model = pipeline::train_from_path(path, &self.options)?;
        Ok(self.install(name, model))
    }

    /// Train on in-memory CSV bytes, e.g. a dropped file without a path.
    pub fn upload_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<f32, PipelineError> {
        self.reset();
        let model = pipeline::train_from_bytes(bytes, &self.options)?;
        Ok(self.install(name.to_string(), model))
    }

    /// Classify `record` with the current model.
    pub fn predict(&mut self, record: &PatientRecord) -> Result<Prediction, PipelineError> {
        let prediction = pipeline::predict_risk(self.model.as_ref(), record)?;
        self.last_prediction = Some(prediction);
        Ok(prediction)
    }

    /// Forget the model and prediction.
    pub fn reset(&mut self) {
        self.model = None;
        self.dataset_name = None;
        self.last_prediction = None;
    }

    fn install(&mut self, name: String, model: TrainedModel) -> f32 {
        let accuracy = model.accuracy;
        tracing::info!("Model ready from {name}: accuracy {accuracy:.2}");
        self.dataset_name = Some(name);
        self.model = Some(model);
        accuracy
    }
}
