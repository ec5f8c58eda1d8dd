//! Client configuration.
//!
//! Precedence, lowest first: built-in defaults, a TOML file, the
//! `RECIPES_API_URL` environment variable, then explicit overrides from the
//! command line.

use crate::error::{RecipeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const BASE_URL_ENV: &str = "RECIPES_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the recipe service, without a trailing slash.
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validated()
    }

    /// Loads a TOML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecipeError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies `RECIPES_API_URL` if it is set and non-empty.
    pub fn with_env(self) -> Result<Self> {
        let from_env = std::env::var(BASE_URL_ENV).ok();
        self.with_base_url_override(from_env.as_deref())
    }

    /// Replaces the base URL when `base_url` is `Some` and non-empty.
    pub fn with_base_url_override(mut self, base_url: Option<&str>) -> Result<Self> {
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.base_url = url.to_string();
        }
        self.validated()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validated(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(RecipeError::config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(RecipeError::config("request_timeout_secs must be positive"));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }
}
