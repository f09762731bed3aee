//! Evaluator client: one request in, one canonical result out.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use trustnet_core::{normalize_value, reconcile_signals, EvaluationRequest, EvaluationResult, RawSignals, Signal};

use crate::config::ClientConfig;
use crate::transport::{EvaluationTransport, TransportError};

/// Route for full evaluations.
pub const EVALUATE_PATH: &str = "/evaluate";

/// Route returning only the signal breakdown.
pub const SIGNALS_PATH: &str = "/signals";

/// Client for the evaluation service.
///
/// Issues exactly one request per call and never retries.
#[derive(Clone)]
pub struct EvaluatorClient {
    config: ClientConfig,
    transport: Arc<dyn EvaluationTransport>,
}

impl std::fmt::Debug for EvaluatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorClient")
            .field("config", &self.config)
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl EvaluatorClient {
    /// Create a client over any transport.
    pub fn new(config: ClientConfig, transport: Arc<dyn EvaluationTransport>) -> Self {
        Self { config, transport }
    }

    /// Create a client backed by [`HttpTransport`](crate::transport::HttpTransport).
    #[cfg(feature = "http")]
    pub fn http(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = crate::transport::HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a request to `POST /evaluate` and normalize the response.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, TransportError> {
        let url = self.config.endpoint(EVALUATE_PATH);
        info!(url = %url, transport = self.transport.name(), "submitting evaluation");

        let raw = self.transport.post_json(&url, &encode(request)?).await?;
        let result = normalize_value(&raw, request);

        info!(
            label = %result.predicted_label,
            trust_score = result.trust_score,
            decision = %result.decision,
            "evaluation complete"
        );
        Ok(result)
    }

    /// Fetch only the signal breakdown from `POST /signals`.
    ///
    /// The service answers with a name → value mapping; it is reconciled the
    /// same way as the `signals` field of a full evaluation.
    pub async fn signals(&self, request: &EvaluationRequest) -> Result<Vec<Signal>, TransportError> {
        let url = self.config.endpoint(SIGNALS_PATH);
        info!(url = %url, transport = self.transport.name(), "requesting signals");

        let raw = self.transport.post_json(&url, &encode(request)?).await?;
        let signals = reconcile_signals(&RawSignals::from_value(&raw));

        debug!(count = signals.len(), "signals received");
        Ok(signals)
    }
}

fn encode(request: &EvaluationRequest) -> Result<Value, TransportError> {
    serde_json::to_value(request)
        .map_err(|e| TransportError::Parse(format!("failed to encode request: {}", e)))
}
