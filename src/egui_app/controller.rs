use std::path::{Path, PathBuf};

use rfd::FileDialog;

use crate::config::{self, AppSettings};
use crate::dataset::{FEATURE_COLUMNS, PatientRecord, RISK_LEVEL_COLUMN, RiskCategory};
use crate::egui_app::state::{PredictionView, ReportView, UiState};
use crate::egui_app::ui::style::StatusTone;
use crate::pipeline::{EvaluationReport, PipelineError, Prediction};
use crate::session::{Session, SessionState};

/// Owns the session and translates its results into [`UiState`].
pub struct EguiController {
    pub ui: UiState,
    session: Session,
    settings: AppSettings,
}

impl EguiController {
    pub fn new(settings: AppSettings) -> Self {
        let mut ui = UiState {
            form: settings.form,
            ..UiState::default()
        };
        ui.status.set(
            format!(
                "Upload a CSV with {} and {RISK_LEVEL_COLUMN} columns",
                FEATURE_COLUMNS.join(", ")
            ),
            StatusTone::Idle,
        );
        Self {
            ui,
            session: Session::new(settings.training.clone()),
            settings,
        }
    }

    /// Load `config.toml`, falling back to defaults when it cannot be read.
    pub fn from_config() -> Self {
        match config::load_or_default() {
            Ok(settings) => Self::new(settings),
            Err(err) => {
                tracing::warn!("Using default settings: {err}");
                let mut controller = Self::new(AppSettings::default());
                controller.set_status(format!("Using default settings: {err}"), StatusTone::Warning);
                controller
            }
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Prediction needs a trained model.
    pub fn can_predict(&self) -> bool {
        self.session.model().is_some()
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }

    /// Ask for a CSV file and train on it.
    pub fn upload_via_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_title("Upload maternal health dataset")
            .pick_file()
        else {
            return;
        };
        self.upload_path(&path);
    }

    /// Train on the CSV at `path`, replacing the current model.
    pub fn upload_path(&mut self, path: &Path) {
        self.before_upload();
        let result = self.session.upload_path(path);
        self.after_upload(result);
    }

    /// Train on CSV bytes that arrived without a readable path.
    pub fn upload_bytes(&mut self, name: &str, bytes: &[u8]) {
        self.before_upload();
        let result = self.session.upload_bytes(name, bytes);
        self.after_upload(result);
    }

    /// Use the first dropped CSV; anything else gets a warning.
    pub fn handle_dropped_files(&mut self, files: &[egui::DroppedFile]) {
        let Some(file) = files.iter().find(|file| is_csv_drop(file)) else {
            if !files.is_empty() {
                self.set_status("Drop a .csv file to train a model", StatusTone::Warning);
            }
            return;
        };
        if let Some(path) = &file.path {
            self.upload_path(path);
        } else if let Some(bytes) = &file.bytes {
            self.upload_bytes(&file.name, bytes);
        }
    }

    /// Classify the values currently in the form.
    pub fn predict(&mut self) {
        let record = self.ui.form.clamped();
        self.ui.form = record;
        match self.session.predict(&record) {
            Ok(prediction) => {
                let view = prediction_view(&prediction);
                self.set_status(view.message.clone(), StatusTone::Info);
                self.ui.prediction = Some(view);
                self.ui.error_message = None;
            }
            Err(err) => self.show_error(&err),
        }
    }

    /// Put the form back to the configured starting values.
    pub fn reset_form(&mut self) {
        self.ui.form = self.settings.form;
    }

    fn before_upload(&mut self) {
        self.ui.dataset_label = None;
        self.ui.accuracy_message = None;
        self.ui.prediction = None;
        self.ui.report = None;
        self.ui.error_message = None;
        self.set_status("Training model...", StatusTone::Busy);
    }

    fn after_upload(&mut self, result: Result<f32, PipelineError>) {
        match result {
            Ok(accuracy) => {
                let message = accuracy_message(accuracy);
                self.ui.dataset_label = self.session.dataset_name().map(str::to_string);
                self.ui.report = self.session.report().map(report_view);
                self.set_status(message.clone(), StatusTone::Info);
                self.ui.accuracy_message = Some(message);
            }
            Err(err) => self.show_error(&err),
        }
    }

    fn show_error(&mut self, err: &PipelineError) {
        tracing::error!("{err}");
        let message = err.to_string();
        self.set_status(message.clone(), StatusTone::Error);
        self.ui.error_message = Some(message);
    }
}

fn is_csv_drop(file: &egui::DroppedFile) -> bool {
    let by_path = file.path.as_deref().is_some_and(has_csv_extension);
    let by_name = file.path.is_none()
        && file.bytes.is_some()
        && has_csv_extension(&PathBuf::from(&file.name));
    by_path || by_name
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

pub(crate) fn accuracy_message(accuracy: f32) -> String {
    format!("Model trained successfully with an accuracy of {accuracy:.2}")
}

pub(crate) fn prediction_message(category: RiskCategory) -> String {
    format!("Predicted Risk Level: {}", category.label())
}

fn prediction_view(prediction: &Prediction) -> PredictionView {
    PredictionView {
        message: prediction_message(prediction.category),
        category: prediction.category,
        probabilities: RiskCategory::ALL
            .iter()
            .map(|category| {
                (
                    category.label(),
                    prediction.probabilities[category.code()] * 100.0,
                )
            })
            .collect(),
    }
}

fn report_view(report: &EvaluationReport) -> ReportView {
    let n = report.confusion.n_classes;
    ReportView {
        summary: format!(
            "{} trained on {} rows, evaluated on {} held-out rows",
            report.classifier, report.train_rows, report.test_rows
        ),
        rows: RiskCategory::ALL
            .iter()
            .zip(&report.per_class)
            .map(|(category, stats)| {
                (
                    category.label(),
                    stats.precision,
                    stats.recall,
                    stats.f1,
                    stats.support,
                )
            })
            .collect(),
        confusion: (0..n)
            .map(|truth| (0..n).map(|pred| report.confusion.get(truth, pred)).collect())
            .collect(),
    }
}

impl Default for EguiController {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    const HEADER: &str = "Age,SystolicBP,DiastolicBP,BS,BodyTemp,HeartRate,RiskLevel\n";

    fn banded_csv() -> String {
        let mut csv = HEADER.to_string();
        for i in 0..60 {
            let (age, sbp, label) = match i % 3 {
                0 => (20 + i % 5, 100, "low risk"),
                1 => (32 + i % 5, 130, "mid risk"),
                _ => (45 + i % 5, 160, "high risk"),
            };
            csv.push_str(&format!("{age},{sbp},80,6.0,98,75,{label}\n"));
        }
        csv
    }

    #[test]
    fn messages_match_the_expected_wording() {
        assert_eq!(
            accuracy_message(0.987),
            "Model trained successfully with an accuracy of 0.99"
        );
        assert_eq!(
            prediction_message(RiskCategory::Mid),
            "Predicted Risk Level: Mid Risk"
        );
    }

    #[test]
    fn predict_before_upload_shows_an_error() {
        let mut controller = EguiController::default();
        assert!(!controller.can_predict());
        controller.predict();
        assert!(controller.ui.prediction.is_none());
        assert!(controller.ui.error_message.is_some());
        assert_eq!(controller.ui.status.badge_label, "Error");
    }

    #[test]
    fn upload_then_predict_fills_the_view() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("maternal.csv");
        std::fs::write(&path, banded_csv()).unwrap();

        let mut controller = EguiController::default();
        controller.upload_path(&path);
        assert!(controller.can_predict());
        assert_eq!(controller.ui.dataset_label.as_deref(), Some("maternal.csv"));
        let message = controller.ui.accuracy_message.clone().unwrap();
        assert!(message.starts_with("Model trained successfully with an accuracy of "));
        assert_eq!(controller.ui.report.as_ref().unwrap().rows.len(), 3);

        controller.ui.form = PatientRecord {
            age: 47,
            systolic_bp: 160,
            ..PatientRecord::default()
        };
        controller.predict();
        let prediction = controller.ui.prediction.clone().unwrap();
        assert_eq!(prediction.category, RiskCategory::High);
        assert_eq!(prediction.message, "Predicted Risk Level: High Risk");
        assert_eq!(controller.session_state(), SessionState::PredictionShown);
    }

    #[test]
    fn failed_upload_clears_previous_results() {
        let mut controller = EguiController::default();
        controller.upload_bytes("good.csv", banded_csv().as_bytes());
        controller.predict();
        assert!(controller.ui.prediction.is_some());

        controller.upload_bytes("bad.csv", b"Age,RiskLevel\n30,low risk\n");
        assert!(controller.ui.prediction.is_none());
        assert!(controller.ui.accuracy_message.is_none());
        assert!(controller.ui.error_message.as_deref().unwrap().contains("SystolicBP"));
        assert!(!controller.can_predict());
    }

    #[test]
    fn dropped_bytes_with_csv_name_are_used() {
        let mut controller = EguiController::default();
        let dropped = egui::DroppedFile {
            name: "web.csv".into(),
            bytes: Some(Arc::from(banded_csv().into_bytes().into_boxed_slice())),
            ..Default::default()
        };
        controller.handle_dropped_files(&[dropped]);
        assert!(controller.can_predict());
    }

    #[test]
    fn non_csv_drop_only_warns() {
        let mut controller = EguiController::default();
        let dropped = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/notes.txt")),
            ..Default::default()
        };
        controller.handle_dropped_files(&[dropped]);
        assert!(!controller.can_predict());
        assert_eq!(controller.ui.status.badge_label, "Warning");
    }

    #[test]
    fn predict_clamps_out_of_range_form_values() {
        let mut controller = EguiController::default();
        controller.upload_bytes("good.csv", banded_csv().as_bytes());
        controller.ui.form.age = 500;
        controller.predict();
        assert_eq!(controller.ui.form.age, 100);
    }
}
