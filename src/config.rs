//! Runtime configuration for a shared bundle.

use std::time::Duration;

use crate::error::{Result, XtError};

/// How long the "copied" indicator stays visible.
pub const COPIED_FEEDBACK: Duration = Duration::from_millis(3000);

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "XTLINKS_API_URL";

/// Settings passed through to link generation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API base URL, if configured.
    pub api_url: Option<String>,
    /// Opaque bundle token.
    pub xtlink: String,
    /// Opaque bundle secret.
    pub password: String,
}

impl Config {
    /// Create a configuration.
    pub fn new(
        api_url: Option<String>,
        xtlink: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_url,
            xtlink: xtlink.into(),
            password: password.into(),
        }
    }

    /// The API base URL, or an error if it is absent or blank.
    pub fn api_base(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(XtError::ApiUrlMissing)
    }
}
