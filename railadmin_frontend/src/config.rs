use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::warn;

use crate::api::DEFAULT_TIMEOUT;
use crate::auth::{Session, ADMIN_ROLE};
use crate::shell::NEWS_ROUTE;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// How picked files become references when a post is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentMode {
    /// Upload each file first and store the URL the server returns.
    #[default]
    Upload,
    /// Store `file://` URLs of the picked files. Not durable: the links only
    /// work on this machine while the files stay in place.
    Local,
}

impl FromStr for AttachmentMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upload" => Ok(AttachmentMode::Upload),
            "local" => Ok(AttachmentMode::Local),
            other => Err(anyhow!("unknown attachment mode `{other}`")),
        }
    }
}

impl fmt::Display for AttachmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttachmentMode::Upload => "upload",
            AttachmentMode::Local => "local",
        })
    }
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api_url: String,
    pub http_timeout: Duration,
    pub attachment_mode: AttachmentMode,
    pub start_route: String,
    pub session: Session,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: DEFAULT_TIMEOUT,
            attachment_mode: AttachmentMode::default(),
            start_route: NEWS_ROUTE.to_string(),
            session: Session::admin(),
        }
    }
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        let api_url = non_empty("RAILADMIN_API_URL").unwrap_or(defaults.api_url);
        let http_timeout = non_empty("RAILADMIN_HTTP_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let attachment_mode = non_empty("RAILADMIN_ATTACHMENT_MODE")
            .and_then(|raw| match raw.parse() {
                Ok(mode) => Some(mode),
                Err(err) => {
                    warn!("{err}; falling back to {}", defaults.attachment_mode);
                    None
                }
            })
            .unwrap_or(defaults.attachment_mode);
        let start_route = non_empty("RAILADMIN_START_ROUTE").unwrap_or(defaults.start_route);

        // The session comes from the external auth service; absent variables
        // describe the usual signed-in administrator.
        let authenticated = non_empty("RAILADMIN_AUTHENTICATED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);
        let role = non_empty("RAILADMIN_ROLE").or_else(|| Some(ADMIN_ROLE.to_string()));

        Self {
            api_url,
            http_timeout,
            attachment_mode,
            start_route,
            session: Session::new(authenticated, role),
        }
    }
}
