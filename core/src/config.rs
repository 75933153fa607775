//! Client configuration.

use std::env;

use crate::error::{DocsError, Result};

/// Where to reach the docs API and which key to authenticate with.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, always ending in a single `/`.
    pub base_url: String,
    /// Sent as the HTTP Basic username; the password is always `x`.
    pub api_key: String,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://docsapi.helpscout.net/v1/";
    pub const API_KEY_VAR: &'static str = "HELPSCOUT_DOCS_API_KEY";
    pub const BASE_URL_VAR: &'static str = "HELPSCOUT_DOCS_BASE_URL";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = format!("{}/", base_url.trim_end_matches('/'));
        self
    }

    /// Load configuration from environment variables.
    ///
    /// `HELPSCOUT_DOCS_API_KEY` is required; `HELPSCOUT_DOCS_BASE_URL`
    /// falls back to the public endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(Self::API_KEY_VAR)
            .map_err(|_| DocsError::Config(format!("{} is not set", Self::API_KEY_VAR)))?;
        let config = Self::new(api_key);
        Ok(match env::var(Self::BASE_URL_VAR) {
            Ok(url) if !url.is_empty() => config.with_base_url(&url),
            _ => config,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
