//! Client configuration.
//!
//! # Responsibility
//! - Hold the backend endpoint, transport timeout and logging settings.
//! - Load overrides from `STUDYNOTES_*` environment variables.
//!
//! # Invariants
//! - `base_url` is an absolute `http`/`https` URL.
//! - `timeout_secs` is positive.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Default backend endpoint (local dev server).
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default per-request transport timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "STUDYNOTES_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "STUDYNOTES_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "STUDYNOTES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STUDYNOTES_LOG_DIR";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl { value: String, message: String },
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl { value, message } => {
                write!(f, "invalid backend url `{value}`: {message}")
            }
            Self::InvalidTimeout(value) => {
                write!(f, "invalid timeout `{value}`; expected a positive number of seconds")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for one client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; routes are appended to it.
    pub base_url: String,
    /// Transport timeout applied by the HTTP client.
    pub timeout_secs: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = read(ENV_API_URL) {
            config.base_url = base_url;
        }
        if let Some(raw) = read(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Checks URL shape and timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            value: self.base_url.clone(),
            message: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
                message: format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs.to_string()));
        }
        Ok(())
    }
}
