//! Transport abstraction for reaching the evaluation service.
//!
//! The client only needs one capability: POST a JSON body and get back
//! either a JSON body or a failure with a human-readable message.
//! [`HttpTransport`] implements it with reqwest (feature `http`); tests and
//! embedders can plug in their own implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Shown when the service fails without saying why.
pub const GENERIC_FAILURE: &str = "Failed to evaluate answer";

/// Shown for failures that carry no message meant for the user.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Errors from the transport layer.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Timeout after {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    #[error("API error: {status} - {}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Api { status: u16, detail: Option<String> },

    #[error("Invalid response body: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl TransportError {
    /// Message for the error slot of the UI.
    ///
    /// A service-provided `detail` is shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Api { detail: None, .. } => GENERIC_FAILURE.to_string(),
            Self::Http(_) | Self::Timeout(_) | Self::Config(_) => self.to_string(),
            Self::Parse(_) => UNEXPECTED_ERROR.to_string(),
        }
    }
}

/// Sends JSON to the evaluation service.
#[async_trait]
pub trait EvaluationTransport: Send + Sync {
    /// POST `body` to `url`. A 2xx response yields its parsed JSON body.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError>;

    /// Transport name for logs.
    fn name(&self) -> &str;
}
