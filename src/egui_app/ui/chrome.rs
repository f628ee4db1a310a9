use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};

use super::{EguiApp, style};

impl EguiApp {
    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(10, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        RichText::new("Maternal Health Risk Predictor")
                            .strong()
                            .color(palette.text_primary),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(name) = &self.controller.ui.dataset_label {
                            ui.label(RichText::new(name).color(palette.text_muted))
                                .on_hover_text("Dataset behind the current model");
                        }
                    });
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::section_stroke(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(6.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    let response =
                        ui.label(RichText::new(&status.text).color(palette.text_primary));
                    if !status.log.is_empty() {
                        response.on_hover_text(status.log_text());
                    }
                });
            });
    }
}
