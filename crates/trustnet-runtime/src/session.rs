//! Single-flight evaluation session.
//!
//! Models the state of one evaluation form: the current result, the current
//! error, and whether a request is in flight. At most one evaluation may be
//! in flight; a second submission is rejected instead of racing the first.
//!
//! State transitions:
//! - submit while in flight: rejected, nothing changes
//! - validation failure: result cleared, error set, no request sent
//! - request started: error and result cleared
//! - success: result set
//! - failure: error set, result stays empty
//!
//! The in-flight flag is reset on every completion path.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use trustnet_core::{EvaluationRequest, EvaluationResult, ValidationError};

use crate::client::EvaluatorClient;
use crate::transport::TransportError;

/// Errors returned by [`EvaluationSession::submit`].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("An evaluation is already in progress")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// Message for the error slot of the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Busy => self.to_string(),
            Self::Validation(e) => e.user_message().to_string(),
            Self::Transport(e) => e.user_message(),
        }
    }
}

/// Point-in-time view of the session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub result: Option<EvaluationResult>,
    pub error: Option<String>,
    pub in_flight: bool,

    /// When the last request finished, successfully or not
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct SessionState {
    result: Option<EvaluationResult>,
    error: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

/// One evaluation form's worth of state.
#[derive(Debug)]
pub struct EvaluationSession {
    client: EvaluatorClient,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EvaluationSession {
    pub fn new(client: EvaluatorClient) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &EvaluatorClient {
        &self.client
    }

    /// Validate the inputs and run one evaluation.
    ///
    /// The returned value mirrors what was stored in the session.
    pub async fn submit(
        &self,
        question: &str,
        context: &str,
        answer: &str,
    ) -> Result<EvaluationResult, SessionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("submission rejected: evaluation already in flight");
            return Err(SessionError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = match EvaluationRequest::build(question, context, answer) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "submission rejected by validation");
                let mut state = self.state.lock();
                state.result = None;
                state.error = Some(e.user_message().to_string());
                return Err(e.into());
            }
        };

        {
            let mut state = self.state.lock();
            state.error = None;
            state.result = None;
        }

        let outcome = self.client.evaluate(&request).await;

        let mut state = self.state.lock();
        state.completed_at = Some(Utc::now());
        match outcome {
            Ok(result) => {
                state.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "evaluation failed");
                state.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Current state of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            result: state.result.clone(),
            error: state.error.clone(),
            in_flight: self.is_in_flight(),
            completed_at: state.completed_at,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Drop the current result and error.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.result = None;
        state.error = None;
    }
}
