//! Client configuration: endpoint and credentials.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://onetimesecret.com/api/v1";

pub const ENV_USERNAME: &str = "OTS_USERNAME";
pub const ENV_API_KEY: &str = "OTS_API_KEY";
pub const ENV_BASE_URL: &str = "OTS_BASE_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Where to send requests and whom to authenticate as.
///
/// Credentials are opaque: neither is validated, and an empty API key is
/// sent as-is.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub username: String,
    pub api_key: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Config {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `OTS_USERNAME`, `OTS_API_KEY` and the optional `OTS_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let username = lookup(ENV_USERNAME).ok_or(ConfigError::MissingVar(ENV_USERNAME))?;
        let api_key = lookup(ENV_API_KEY).ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let config = Self::new(username, api_key);
        Ok(match lookup(ENV_BASE_URL) {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }
}

// Keep the API key out of logs and panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
