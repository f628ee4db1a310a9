//! egui renderer for the predictor window.

mod chrome;
mod form;
mod results;
pub mod style;

use eframe::egui;

use crate::egui_app::controller::EguiController;

/// Smallest window that still fits the form and the report.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(520.0, 560.0);

/// Renders the controller state each frame and forwards user actions to it.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    pub fn new(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) =
            ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.controller.ui.drop_hover = hovering;
        if !dropped.is_empty() {
            self.controller.handle_dropped_files(&dropped);
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.handle_file_drops(ctx);
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_upload_section(ui);
                ui.separator();
                self.render_form(ui);
                ui.separator();
                self.render_results(ui);
            });
        });
    }
}
