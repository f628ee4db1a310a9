use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::dataset::RiskCategory;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_ice: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub danger: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 13, 15),
        bg_secondary: Color32::from_rgb(24, 26, 29),
        bg_tertiary: Color32::from_rgb(40, 43, 47),
        panel_outline: Color32::from_rgb(38, 42, 48),
        grid_soft: Color32::from_rgb(30, 32, 36),
        text_primary: Color32::from_rgb(190, 196, 204),
        text_muted: Color32::from_rgb(140, 146, 155),
        accent_ice: Color32::from_rgb(167, 217, 255),
        warning: Color32::from_rgb(214, 160, 72),
        success: Color32::from_rgb(102, 176, 136),
        danger: Color32::from_rgb(206, 84, 70),
    }
}

/// Severity of the message shown in the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

/// Badge text and colour for a status tone.
pub fn status_badge(tone: StatusTone) -> (&'static str, Color32) {
    match tone {
        StatusTone::Idle => ("Idle", Color32::from_rgb(42, 42, 42)),
        StatusTone::Busy => ("Training", Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info", Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning", Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error", Color32::from_rgb(192, 57, 43)),
    }
}

/// Text colour for a predicted risk level.
pub fn risk_color(category: RiskCategory) -> Color32 {
    let palette = palette();
    match category {
        RiskCategory::Low => palette.success,
        RiskCategory::Mid => palette.warning,
        RiskCategory::High => palette.danger,
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_ice;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.danger;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_ice);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        square_off(widget, palette);
    }
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
}

fn square_off(widget: &mut WidgetVisuals, palette: Palette) {
    widget.corner_radius = CornerRadius::ZERO;
    widget.bg_fill = palette.bg_tertiary;
    widget.weak_bg_fill = palette.grid_soft;
    widget.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    widget.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}
