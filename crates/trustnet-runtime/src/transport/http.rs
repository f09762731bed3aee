//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{EvaluationTransport, TransportError};
use crate::config::ClientConfig;

const USER_AGENT_VALUE: &str = concat!("trustnet/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport from validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| TransportError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl EvaluationTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout)
                } else {
                    TransportError::Http(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            // Error bodies are expected to be {"detail": "..."}; anything else
            // falls back to the generic message.
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));

            debug!(status = status.as_u16(), detail = ?detail, "service returned error");
            return Err(TransportError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ClientConfig::default().with_api_url("ftp://example.com");
        assert!(matches!(
            HttpTransport::new(&config),
            Err(TransportError::Config(_))
        ));
    }

    #[test]
    fn test_new_with_defaults() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(transport.name(), "http");
    }
}
