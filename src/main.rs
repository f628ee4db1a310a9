//! Entry point for the Maternal Health Risk Predictor window.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use matrisk::egui_app::controller::EguiController;
use matrisk::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use matrisk::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("Maternal Health Risk Predictor")
        .with_inner_size([640.0, 720.0])
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_drag_and_drop(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Maternal Health Risk Predictor",
        native_options,
        Box::new(|_cc| Ok(Box::new(EguiApp::new(EguiController::from_config())))),
    )?;
    Ok(())
}
