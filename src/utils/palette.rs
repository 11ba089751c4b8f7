use eframe::egui::Color32;

pub const ACCENT: Color32 = Color32::from_rgb(249, 115, 22);
pub const SUCCESS: Color32 = Color32::from_rgb(22, 163, 74);
pub const ERROR: Color32 = Color32::from_rgb(220, 50, 50);

/// Soft background tint of `color` for badges and highlighted surfaces.
pub fn wash(color: Color32, dark_mode: bool) -> Color32 {
    let alpha = if dark_mode { 48 } else { 32 };
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
