//! Branding-driven theme handed down from the navigation shell.

use eframe::egui;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::color_theme::{parse_hex_color, ColorScheme};
use crate::models::{
    BrandingSettings, DEFAULT_ACCENT_COLOR, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR,
};

pub const PRIMARY_COLOR_VAR: &str = "--primary-color";
pub const SECONDARY_COLOR_VAR: &str = "--secondary-color";
pub const ACCENT_COLOR_VAR: &str = "--accent-color";
pub const FONT_FAMILY_VAR: &str = "--font-family";

lazy_static! {
    static ref CUSTOM_PROPERTY: Regex =
        Regex::new(r"(?m)(--[A-Za-z0-9_-]+)\s*:\s*([^;{}\n]+?)\s*(?:!important\s*)?(?:;|\}|$)")
            .expect("custom property pattern");
}

/// The four named style variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleVariables {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_family: String,
}

impl StyleVariables {
    fn from_branding(branding: &BrandingSettings) -> Self {
        let mut variables = Self {
            primary_color: branding.primary_color.clone(),
            secondary_color: branding.secondary_color.clone(),
            accent_color: branding.accent_color.clone(),
            font_family: branding.font_family.clone(),
        };
        // Custom style text is applied after the variables, so its
        // declarations win.
        for (name, value) in custom_properties(&branding.custom_css) {
            if !variables.set(&name, value) {
                debug!("custom style declares {name}, which has no native counterpart");
            }
        }
        variables
    }

    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (PRIMARY_COLOR_VAR, &self.primary_color),
            (SECONDARY_COLOR_VAR, &self.secondary_color),
            (ACCENT_COLOR_VAR, &self.accent_color),
            (FONT_FAMILY_VAR, &self.font_family),
        ]
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            PRIMARY_COLOR_VAR => &mut self.primary_color,
            SECONDARY_COLOR_VAR => &mut self.secondary_color,
            ACCENT_COLOR_VAR => &mut self.accent_color,
            FONT_FAMILY_VAR => &mut self.font_family,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Extracts `--name: value` declarations in source order.
pub fn custom_properties(css: &str) -> Vec<(String, String)> {
    CUSTOM_PROPERTY
        .captures_iter(css)
        .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
        .collect()
}

/// Theme state owned by the mounted shell. Created with defaults at mount,
/// replaced on a successful settings read, dropped on unmount.
pub struct ThemeContext {
    branding: BrandingSettings,
    variables: StyleVariables,
    scheme: ColorScheme,
    revision: u64,
    applied_revision: Option<u64>,
}

impl ThemeContext {
    pub fn new(branding: BrandingSettings) -> Self {
        let variables = StyleVariables::from_branding(&branding);
        Self {
            scheme: color_scheme(&variables),
            branding,
            variables,
            revision: 0,
            applied_revision: None,
        }
    }

    pub fn branding(&self) -> &BrandingSettings {
        &self.branding
    }

    pub fn variables(&self) -> &StyleVariables {
        &self.variables
    }

    pub fn custom_styles(&self) -> &str {
        &self.branding.custom_css
    }

    pub fn update(&mut self, branding: BrandingSettings) {
        let variables = StyleVariables::from_branding(&branding);
        if variables != self.variables
            || branding.custom_css != self.branding.custom_css
            || branding.button_style != self.branding.button_style
        {
            self.revision += 1;
            self.scheme = color_scheme(&variables);
        }
        self.branding = branding;
        self.variables = variables;
    }

    pub fn needs_apply(&self) -> bool {
        self.applied_revision != Some(self.revision)
    }

    pub fn primary_color(&self) -> egui::Color32 {
        self.scheme.primary
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// egui only ships a proportional and a monospace family; the configured
    /// font name picks between them.
    pub fn font_family(&self) -> egui::FontFamily {
        let name = self.variables.font_family.to_ascii_lowercase();
        if name.contains("mono") || name.contains("courier") || name.contains("consol") {
            egui::FontFamily::Monospace
        } else {
            egui::FontFamily::Proportional
        }
    }

    pub fn widget_rounding(&self) -> f32 {
        match self.branding.button_style.as_str() {
            "square" | "flat" => 0.0,
            "pill" => 12.0,
            _ => 6.0,
        }
    }

    /// Pushes the theme into egui when it changed since the last call.
    pub fn apply(&mut self, ctx: &egui::Context) {
        if !self.needs_apply() {
            return;
        }
        let visuals = self.color_scheme().to_light_visuals(self.widget_rounding());
        let family = self.font_family();
        ctx.set_visuals(visuals);
        ctx.style_mut(|style| {
            style.text_styles = egui::Style::default().text_styles;
            for (text_style, font) in style.text_styles.iter_mut() {
                if *text_style != egui::TextStyle::Monospace {
                    font.family = family.clone();
                }
            }
        });
        self.applied_revision = Some(self.revision);
    }
}

fn color_scheme(variables: &StyleVariables) -> ColorScheme {
    ColorScheme::new(
        color_or_default(&variables.primary_color, DEFAULT_PRIMARY_COLOR, PRIMARY_COLOR_VAR),
        color_or_default(&variables.secondary_color, DEFAULT_SECONDARY_COLOR, SECONDARY_COLOR_VAR),
        color_or_default(&variables.accent_color, DEFAULT_ACCENT_COLOR, ACCENT_COLOR_VAR),
    )
}

fn color_or_default(raw: &str, default: &str, name: &str) -> egui::Color32 {
    parse_hex_color(raw).unwrap_or_else(|| {
        warn!("{name} value `{raw}` is not a hex color, using {default}");
        parse_hex_color(default).unwrap_or(egui::Color32::GRAY)
    })
}
