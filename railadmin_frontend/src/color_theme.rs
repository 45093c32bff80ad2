/// Color helpers turning the operator's branding colors into egui visuals
use eframe::egui;

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(raw: &str) -> Option<egui::Color32> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Some(egui::Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(egui::Color32::from_rgba_unmultiplied(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

/// Convert RGB to HSV color space
/// Returns (hue [0-360], saturation [0-1], value [0-1])
fn rgb_to_hsv(color: egui::Color32) -> (f32, f32, f32) {
    let r = color.r() as f32 / 255.0;
    let g = color.g() as f32 / 255.0;
    let b = color.b() as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let hue = if hue < 0.0 { hue + 360.0 } else { hue };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation, max)
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> egui::Color32 {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    egui::Color32::from_rgb(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Adjust saturation by a factor (0.0 to 1.0 reduces, >1.0 increases)
fn adjust_saturation(color: egui::Color32, factor: f32) -> egui::Color32 {
    let (hue, sat, val) = rgb_to_hsv(color);
    hsv_to_rgb(hue, (sat * factor).clamp(0.0, 1.0), val)
}

/// Adjust value/brightness by a factor
fn adjust_value(color: egui::Color32, factor: f32) -> egui::Color32 {
    let (hue, sat, val) = rgb_to_hsv(color);
    hsv_to_rgb(hue, sat, (val * factor).clamp(0.0, 1.0))
}

/// Mixes `color` toward white; `amount` 0.0 keeps it, 1.0 gives white.
fn tint(color: egui::Color32, amount: f32) -> egui::Color32 {
    let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount.clamp(0.0, 1.0)).round() as u8;
    egui::Color32::from_rgb(mix(color.r()), mix(color.g()), mix(color.b()))
}

/// The three branding colors, as used by the admin console.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub primary: egui::Color32,
    pub secondary: egui::Color32,
    pub accent: egui::Color32,
}

impl ColorScheme {
    pub fn new(primary: egui::Color32, secondary: egui::Color32, accent: egui::Color32) -> Self {
        Self {
            primary,
            secondary,
            accent,
        }
    }

    /// Light visuals in the console's look: neutral panels, primary-tinted
    /// widgets, accent selection. `rounding` follows the button style.
    pub fn to_light_visuals(&self, rounding: f32) -> egui::Visuals {
        let mut visuals = egui::Visuals::light();

        visuals.window_fill = egui::Color32::from_gray(250);
        visuals.panel_fill = egui::Color32::from_gray(245);
        visuals.extreme_bg_color = egui::Color32::WHITE;
        visuals.faint_bg_color = tint(self.primary, 0.94);

        // Inactive: barely tinted, secondary outline
        visuals.widgets.inactive.bg_fill = tint(self.primary, 0.88);
        visuals.widgets.inactive.weak_bg_fill = tint(self.primary, 0.92);
        visuals.widgets.inactive.bg_stroke.color = tint(self.secondary, 0.5);

        // Hovered: the "15" alpha highlight of the web sidebar, approximated
        visuals.widgets.hovered.bg_fill = tint(self.primary, 0.8);
        visuals.widgets.hovered.weak_bg_fill = tint(self.primary, 0.85);
        visuals.widgets.hovered.bg_stroke.color = self.primary;
        visuals.widgets.hovered.fg_stroke.color = adjust_value(self.primary, 0.7);

        visuals.widgets.active.bg_fill = adjust_value(self.primary, 0.9);
        visuals.widgets.active.weak_bg_fill = self.primary;
        visuals.widgets.active.bg_stroke.color = adjust_value(self.primary, 0.7);

        visuals.widgets.open.bg_fill = tint(self.secondary, 0.8);
        visuals.widgets.open.weak_bg_fill = tint(self.secondary, 0.85);
        visuals.widgets.open.bg_stroke.color = self.secondary;

        visuals.selection.bg_fill = adjust_saturation(tint(self.accent, 0.55), 1.1);
        visuals.selection.stroke.color = adjust_value(self.accent, 0.6);

        visuals.hyperlink_color = adjust_value(self.primary, 0.8);
        visuals.window_stroke.color = tint(self.secondary, 0.6);

        let rounding = egui::Rounding::same(rounding);
        visuals.window_rounding = rounding;
        visuals.menu_rounding = rounding;
        visuals.widgets.inactive.rounding = rounding;
        visuals.widgets.hovered.rounding = rounding;
        visuals.widgets.active.rounding = rounding;
        visuals.widgets.open.rounding = rounding;
        visuals.widgets.noninteractive.rounding = rounding;

        visuals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Some(egui::Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("007bff"), Some(egui::Color32::from_rgb(0, 123, 255)));
        assert_eq!(parse_hex_color("#0f8"), Some(egui::Color32::from_rgb(0, 255, 136)));
        assert_eq!(
            parse_hex_color("#00000080"),
            Some(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128))
        );
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#éé"), None);
    }

    #[test]
    fn test_rgb_hsv_conversion() {
        let color = egui::Color32::from_rgb(255, 0, 0);
        let (h, s, v) = rgb_to_hsv(color);
        assert!((h - 0.0).abs() < 1.0);
        assert!((s - 1.0).abs() < 0.01);
        assert!((v - 1.0).abs() < 0.01);
        assert_eq!(color, hsv_to_rgb(h, s, v));
    }

    #[test]
    fn test_tint_moves_toward_white() {
        let blue = egui::Color32::from_rgb(0, 123, 255);
        assert_eq!(tint(blue, 0.0), blue);
        assert_eq!(tint(blue, 1.0), egui::Color32::WHITE);
        assert!(tint(blue, 0.5).r() > 100);
    }

    #[test]
    fn test_visuals_use_primary_for_hover() {
        let scheme = ColorScheme::new(
            egui::Color32::from_rgb(255, 0, 0),
            egui::Color32::from_rgb(108, 117, 125),
            egui::Color32::from_rgb(40, 167, 69),
        );
        let visuals = scheme.to_light_visuals(6.0);
        assert_eq!(visuals.widgets.hovered.bg_stroke.color, scheme.primary);
        assert_eq!(visuals.widgets.inactive.rounding, egui::Rounding::same(6.0));
        assert!(!visuals.dark_mode);
    }
}
