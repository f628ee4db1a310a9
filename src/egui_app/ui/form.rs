use eframe::egui::{self, RichText};

use super::{EguiApp, style};
use crate::dataset::features::{
    AGE_BOUNDS, BLOOD_SUGAR_BOUNDS, BODY_TEMP_BOUNDS, DIASTOLIC_BP_BOUNDS, FieldBounds,
    HEART_RATE_BOUNDS, SYSTOLIC_BP_BOUNDS,
};

impl EguiApp {
    pub(super) fn render_upload_section(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Dataset").strong().color(palette.text_primary));
        ui.horizontal(|ui| {
            if ui
                .button("Upload CSV…")
                .on_hover_text("Pick a CSV with the six vitals and a RiskLevel column")
                .clicked()
            {
                self.controller.upload_via_dialog();
            }
            let hint = if self.controller.ui.drop_hover {
                RichText::new("Release to upload").color(palette.accent_ice)
            } else {
                RichText::new("or drop a .csv file onto the window").color(palette.text_muted)
            };
            ui.label(hint);
        });
    }

    pub(super) fn render_form(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Patient").strong().color(palette.text_primary));
        let form = &mut self.controller.ui.form;
        egui::Grid::new("patient_form")
            .num_columns(2)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                whole_field(ui, "Age", &mut form.age, AGE_BOUNDS, "");
                whole_field(
                    ui,
                    "Systolic Blood Pressure",
                    &mut form.systolic_bp,
                    SYSTOLIC_BP_BOUNDS,
                    " mmHg",
                );
                whole_field(
                    ui,
                    "Diastolic Blood Pressure",
                    &mut form.diastolic_bp,
                    DIASTOLIC_BP_BOUNDS,
                    " mmHg",
                );
                decimal_field(ui, "Blood Sugar Level", &mut form.blood_sugar, BLOOD_SUGAR_BOUNDS);
                decimal_field(ui, "Body Temperature", &mut form.body_temp, BODY_TEMP_BOUNDS);
                whole_field(
                    ui,
                    "Heart Rate",
                    &mut form.heart_rate,
                    HEART_RATE_BOUNDS,
                    " bpm",
                );
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let predict = ui
                .add_enabled(
                    self.controller.can_predict(),
                    egui::Button::new("Predict Risk Level"),
                )
                .on_disabled_hover_text("Upload a dataset first");
            if predict.clicked() {
                self.controller.predict();
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_form();
            }
        });
    }
}

fn whole_field(ui: &mut egui::Ui, label: &str, value: &mut u32, bounds: FieldBounds, suffix: &str) {
    ui.label(label);
    ui.add(
        egui::DragValue::new(value)
            .range(bounds.min as u32..=bounds.max as u32)
            .speed(bounds.step)
            .suffix(suffix),
    );
    ui.end_row();
}

fn decimal_field(ui: &mut egui::Ui, label: &str, value: &mut f32, bounds: FieldBounds) {
    ui.label(label);
    ui.add(
        egui::DragValue::new(value)
            .range(bounds.min as f32..=bounds.max as f32)
            .speed(bounds.step)
            .fixed_decimals(1),
    );
    ui.end_row();
}
