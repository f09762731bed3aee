//! # trustnet-runtime
//!
//! Async plumbing around `trustnet-core`: configuration, the transport to
//! the evaluation service, and a single-flight session holding the current
//! result or error.
//!
//! ## Important
//!
//! All interpretation of service responses happens in `trustnet-core`.
//! This crate only moves bytes and keeps state; it never retries and never
//! has more than one request in flight per session.
//!
//! ## Example
//!
//! ```rust,ignore
//! use trustnet_runtime::{ClientConfig, EvaluationSession, EvaluatorClient};
//!
//! let client = EvaluatorClient::http(ClientConfig::from_env())?;
//! let session = EvaluationSession::new(client);
//!
//! match session.submit("What color is the sky?", "The sky is blue.", "Blue.").await {
//!     Ok(result) => println!("{} ({})", result.decision, result.trust_score),
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! ```

pub mod client;
pub mod config;
pub mod session;
pub mod transport;

pub use client::{EvaluatorClient, EVALUATE_PATH, SIGNALS_PATH};
pub use config::{ClientConfig, ConfigError, API_URL_ENV, DEFAULT_API_URL, TIMEOUT_ENV};
pub use session::{EvaluationSession, SessionError, SessionSnapshot};
pub use transport::{EvaluationTransport, TransportError, GENERIC_FAILURE, UNEXPECTED_ERROR};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
