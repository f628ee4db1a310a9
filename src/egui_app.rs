//! egui front end: the controller owns the session, the renderer draws it.

pub mod controller;
pub mod state;
pub mod ui;
