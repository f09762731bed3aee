//! # trustnet-core
//!
//! Deterministic normalization and decision classification for TrustNet
//! evaluations.
//!
//! The evaluation service is not under this client's control, so its
//! responses are treated as loosely shaped. This crate turns them into one
//! strict contract:
//!
//! 1. **Validated input**: [`EvaluationRequest::build`] rejects blank fields
//! 2. **Total normalization**: [`normalize`] never fails on a response
//! 3. **Always a decision**: derived from the trust score when omitted
//! 4. **Always a list**: signals sent as a mapping get default weights
//!
//! No I/O happens here; transport lives in `trustnet-runtime`.
//!
//! ## Example
//!
//! ```rust
//! use trustnet_core::{normalize_value, Decision, EvaluationRequest, Label};
//!
//! let request = EvaluationRequest::build(
//!     "What color is the sky?",
//!     "The sky appears blue due to Rayleigh scattering.",
//!     "The sky is blue.",
//! )?;
//!
//! let raw = serde_json::json!({
//!     "label": "grounded",
//!     "trust_score": 0.92,
//!     "signals": {"semantic_similarity": 0.95, "entity_overlap": 0.88}
//! });
//!
//! let result = normalize_value(&raw, &request);
//! assert_eq!(result.predicted_label, Label::Grounded);
//! assert_eq!(result.decision, Decision::Show);
//! assert_eq!(result.signals[1].weight, 0.3);
//! # Ok::<(), trustnet_core::ValidationError>(())
//! ```

pub mod normalize;
pub mod presentation;
pub mod request;
pub mod types;

// Re-export main types at crate root
pub use normalize::{
    coerce_score, normalize, normalize_value, reconcile_signals, resolve_decision,
    resolve_label,
};
pub use presentation::{format_percent, format_signal_name, format_weight, RiskTier, VisualCategory};
pub use request::{EvaluationRequest, ValidationError, FILL_IN_ALL_FIELDS};
pub use types::{
    default_weight, Decision, EvaluationResult, Label, RawEvaluationResponse, RawSignals, Signal,
    DEFAULT_WEIGHTS,
};
