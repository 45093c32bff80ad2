use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a news post. The API hands out either
/// numeric or textual ids depending on its storage, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NewsId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsId::Number(value) => write!(f, "{value}"),
            NewsId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NewsId {
    fn from(value: i64) -> Self {
        NewsId::Number(value)
    }
}

impl From<&str> for NewsId {
    fn from(value: &str) -> Self {
        NewsId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// A news post ("actualité") as exchanged with `/api/actualites`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewsPost {
    #[serde(default)]
    pub id: Option<NewsId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scheduled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

impl NewsPost {
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub const DEFAULT_COMPANY_NAME: &str = "Ma Société Ferroviaire";
pub const DEFAULT_LOGO_URL: &str = "/images/sncf-logo.png";
pub const DEFAULT_PRIMARY_COLOR: &str = "#007bff";
pub const DEFAULT_SECONDARY_COLOR: &str = "#6c757d";
pub const DEFAULT_ACCENT_COLOR: &str = "#28a745";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_BUTTON_STYLE: &str = "rounded";
pub const DEFAULT_HEADER_STYLE: &str = "default";

/// Envelope returned by `GET /api/entreprise`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntrepriseResponse {
    #[serde(rename = "entrepriseSettings", default)]
    pub entreprise_settings: Option<EntrepriseSettingsPayload>,
}

/// Raw settings record; every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntrepriseSettingsPayload {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub button_style: Option<String>,
    #[serde(default)]
    pub header_style: Option<String>,
    #[serde(default)]
    pub custom_css: Option<String>,
}

/// Operator branding with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandingSettings {
    pub company_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub button_style: String,
    pub header_style: String,
    pub custom_css: String,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            button_style: DEFAULT_BUTTON_STYLE.to_string(),
            header_style: DEFAULT_HEADER_STYLE.to_string(),
            custom_css: String::new(),
        }
    }
}

impl From<EntrepriseSettingsPayload> for BrandingSettings {
    fn from(payload: EntrepriseSettingsPayload) -> Self {
        // Empty strings count as missing, same as null.
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            company_name: or_default(payload.company_name, DEFAULT_COMPANY_NAME),
            logo_url: or_default(payload.logo_url, DEFAULT_LOGO_URL),
            primary_color: or_default(payload.primary_color, DEFAULT_PRIMARY_COLOR),
            secondary_color: or_default(payload.secondary_color, DEFAULT_SECONDARY_COLOR),
            accent_color: or_default(payload.accent_color, DEFAULT_ACCENT_COLOR),
            font_family: or_default(payload.font_family, DEFAULT_FONT_FAMILY),
            button_style: or_default(payload.button_style, DEFAULT_BUTTON_STYLE),
            header_style: or_default(payload.header_style, DEFAULT_HEADER_STYLE),
            custom_css: payload.custom_css.unwrap_or_default(),
        }
    }
}
