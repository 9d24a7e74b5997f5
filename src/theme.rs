use eframe::egui;
use egui::{Color32, CornerRadius, Margin, Stroke};

pub const ACCENT_COLOR: Color32 = Color32::from_rgb(25, 118, 210);
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 87, 34);
pub const GREEN_COLOR: Color32 = Color32::from_rgb(76, 175, 80);

// Region palette, aligned with the region table order plus "Other".
pub const REGION_COLORS: &[(&str, Color32)] = &[
    ("Asia", Color32::from_rgb(255, 87, 34)),
    ("Europe", Color32::from_rgb(76, 175, 80)),
    ("North America", Color32::from_rgb(25, 118, 210)),
    ("South America", Color32::from_rgb(156, 39, 176)),
    ("Africa", Color32::from_rgb(255, 193, 7)),
    ("Oceania", Color32::from_rgb(0, 188, 212)),
    ("Other", Color32::from_rgb(158, 158, 158)),
];

pub fn region_color(region: &str) -> Color32 {
    REGION_COLORS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, color)| *color)
        .unwrap_or(Color32::GRAY)
}

/// Opacity hint applied to a mark color.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
}

/// Diverging blue-to-red fill for correlation cells in `[-1, 1]`.
pub fn correlation_color(value: f64) -> Color32 {
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let cold = Color32::from_rgb(33, 102, 172);
    let warm = Color32::from_rgb(178, 24, 43);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    Color32::from_rgb(lerp(cold.r(), warm.r()), lerp(cold.g(), warm.g()), lerp(cold.b(), warm.b()))
}

pub fn apply_wattscope_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();

    visuals.widgets.active.bg_fill = ACCENT_COLOR;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(21, 101, 192);
    visuals.widgets.hovered.corner_radius = CornerRadius::same(6);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(45, 45, 45);
    visuals.widgets.inactive.corner_radius = CornerRadius::same(6);

    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(30, 30, 30);
    visuals.widgets.noninteractive.corner_radius = CornerRadius::same(6);

    visuals.selection.bg_fill = ACCENT_COLOR.linear_multiply(0.4);

    visuals.faint_bg_color = Color32::from_rgb(35, 35, 35);
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 20);

    ctx.set_visuals(visuals);

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

pub fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(CornerRadius::same(10))
        .inner_margin(Margin::same(12))
        .stroke(Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
}

pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(Color32::from_rgb(30, 30, 30))
        .inner_margin(Margin {
            left: 20,
            right: 30,
            top: 10,
            bottom: 10,
        })
        .stroke(Stroke::new(1.0, Color32::from_rgb(45, 45, 45)))
}
