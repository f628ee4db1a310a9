//! Plain data the renderer reads each frame.

use egui::Color32;

use crate::dataset::{PatientRecord, RiskCategory};
use crate::egui_app::ui::style::{self, StatusTone};

/// Keep the status log short enough to show in a hover.
const MAX_STATUS_LOG: usize = 20;

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub status: StatusBarState,
    /// Values currently in the six form fields.
    pub form: PatientRecord,
    /// File name of the dataset behind the current model.
    pub dataset_label: Option<String>,
    pub accuracy_message: Option<String>,
    pub prediction: Option<PredictionView>,
    /// Last upload or prediction failure, shown until the next success.
    pub error_message: Option<String>,
    pub report: Option<ReportView>,
    /// True while a file is hovering over the window.
    pub drop_hover: bool,
}

/// Rendered prediction line.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionView {
    pub message: String,
    pub category: RiskCategory,
    /// Percent per category, in class-code order.
    pub probabilities: Vec<(&'static str, f32)>,
}

/// Held-out evaluation, pre-formatted.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportView {
    pub summary: String,
    /// `(label, precision, recall, f1, support)` per category.
    pub rows: Vec<(&'static str, f32, f32, f32, u32)>,
    /// Row-major counts, true category by predicted category.
    pub confusion: Vec<Vec<u32>>,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
    /// Most recent messages, oldest first.
    pub log: Vec<String>,
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self::idle()
    }
}

impl StatusBarState {
    pub fn idle() -> Self {
        let (label, color) = style::status_badge(StatusTone::Idle);
        Self {
            text: "Upload a CSV dataset to train a model".into(),
            badge_label: label.into(),
            badge_color: color,
            log: Vec::new(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.text = text.into();
        self.badge_label = label.into();
        self.badge_color = color;
        self.log.push(self.text.clone());
        if self.log.len() > MAX_STATUS_LOG {
            let excess = self.log.len() - MAX_STATUS_LOG;
            self.log.drain(..excess);
        }
    }

    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}
