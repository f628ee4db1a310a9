use eframe::egui::{self, RichText};

use super::{EguiApp, style};
use crate::dataset::RiskCategory;

impl EguiApp {
    pub(super) fn render_results(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let state = &self.controller.ui;
        if let Some(message) = &state.error_message {
            ui.label(RichText::new(message).color(palette.danger));
        }
        if let Some(message) = &state.accuracy_message {
            ui.label(RichText::new(message).color(palette.success));
        }
        if let Some(prediction) = &state.prediction {
            ui.label(
                RichText::new(&prediction.message)
                    .strong()
                    .size(18.0)
                    .color(style::risk_color(prediction.category)),
            );
            ui.horizontal(|ui| {
                for (label, percent) in &prediction.probabilities {
                    ui.label(
                        RichText::new(format!("{label}: {percent:.0}%")).color(palette.text_muted),
                    );
                }
            });
        }
        if let Some(report) = &state.report {
            egui::CollapsingHeader::new("Evaluation report")
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(RichText::new(&report.summary).color(palette.text_muted));
                    egui::Grid::new("per_class_stats")
                        .striped(true)
                        .num_columns(5)
                        .show(ui, |ui| {
                            for heading in ["Level", "Precision", "Recall", "F1", "Support"] {
                                ui.label(RichText::new(heading).strong());
                            }
                            ui.end_row();
                            for (label, precision, recall, f1, support) in &report.rows {
                                ui.label(*label);
                                ui.label(format!("{precision:.2}"));
                                ui.label(format!("{recall:.2}"));
                                ui.label(format!("{f1:.2}"));
                                ui.label(support.to_string());
                                ui.end_row();
                            }
                        });
                    ui.add_space(6.0);
                    ui.label(RichText::new("Confusion matrix (rows: actual)").strong());
                    egui::Grid::new("confusion_matrix")
                        .striped(true)
                        .show(ui, |ui| {
                            ui.label("");
                            for category in RiskCategory::ALL {
                                ui.label(category.label());
                            }
                            ui.end_row();
                            for (category, row) in RiskCategory::ALL.iter().zip(&report.confusion) {
                                ui.label(category.label());
                                for count in row {
                                    ui.label(count.to_string());
                                }
                                ui.end_row();
                            }
                        });
                });
        }
    }
}
