//! Maternal health risk prediction: train on an uploaded CSV, classify one patient at a time.
/// Locations of the config file and logs.
pub mod app_dirs;
/// TOML settings.
pub mod config;
/// CSV loading, label cleanup and feature selection.
pub mod dataset;
/// egui front end.
pub mod egui_app;
/// Tracing setup.
pub mod logging;
/// In-crate classifiers and metrics.
pub mod ml;
/// Train and predict without any UI.
pub mod pipeline;
/// Upload/predict state machine.
pub mod session;
