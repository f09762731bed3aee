//! Client configuration.

use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Environment variable overriding the evaluation service base URL.
pub const API_URL_ENV: &str = "TRUSTNET_API_URL";

/// Environment variable overriding the request timeout (humantime, e.g. `15s`).
pub const TIMEOUT_ENV: &str = "TRUSTNET_TIMEOUT";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from invalid client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api_url must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
}

/// Where and how to reach the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the evaluation service
    pub api_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `TRUSTNET_API_URL` | Evaluation service base URL |
    /// | `TRUSTNET_TIMEOUT` | Request timeout, e.g. `15s` |
    ///
    /// Unparseable values are logged and replaced by defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match parse_duration(&raw) {
                Ok(timeout) => config.timeout = timeout,
                Err(e) => warn!(env = TIMEOUT_ENV, error = %e, "ignoring invalid timeout"),
            }
        }

        config
    }

    /// Set the base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configuration before building a client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.api_url.clone()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Full URL for a service route, e.g. `endpoint("/evaluate")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Parse a human-readable duration such as `15s` or `2m`.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
