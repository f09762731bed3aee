//! Core types for TrustNet evaluations.
//!
//! The canonical types ([`EvaluationResult`], [`Signal`], [`Label`],
//! [`Decision`]) are what the rest of the client works with. The raw types
//! ([`RawEvaluationResponse`], [`RawSignals`]) describe what the evaluation
//! service may send and are only read by the normalizer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Default weight per signal name, in canonical display order.
///
/// Only used to backfill `weight` when the service sends signals as a bare
/// name → value mapping.
pub const DEFAULT_WEIGHTS: [(&str, f64); 4] = [
    ("semantic_similarity", 0.5),
    ("entity_overlap", 0.3),
    ("self_consistency", 0.1),
    ("entropy", 0.1),
];

/// Look up the default weight for a signal name. Unrecognized names weigh 0.
pub fn default_weight(name: &str) -> f64 {
    DEFAULT_WEIGHTS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0)
}

/// Groundedness label predicted by the evaluation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Grounded,
    PartiallyGrounded,
    Hallucinated,

    /// Missing or unrecognized label
    #[serde(other)]
    Unknown,
}

impl Label {
    /// Parse a label string. Anything outside the three canonical labels
    /// becomes [`Label::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s {
            "grounded" => Self::Grounded,
            "partially_grounded" => Self::PartiallyGrounded,
            "hallucinated" => Self::Hallucinated,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grounded => "grounded",
            Self::PartiallyGrounded => "partially_grounded",
            Self::Hallucinated => "hallucinated",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for the three labels the service is documented to emit.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the answer should be treated by whoever displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Trust score > 0.8
    Show,

    /// 0.5 <= trust score <= 0.8
    ShowWithWarning,

    /// Trust score < 0.5
    Flag,
}

impl Decision {
    /// Parse one of the three decision literals. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "show" => Some(Self::Show),
            "show_with_warning" => Some(Self::ShowWithWarning),
            "flag" => Some(Self::Flag),
            _ => None,
        }
    }

    /// Derive a decision from a trust score.
    ///
    /// The upper bound is exclusive (exactly 0.8 is a warning) and the lower
    /// bound inclusive (exactly 0.5 is a warning, not a flag).
    pub fn from_trust_score(score: f64) -> Self {
        if score > 0.8 {
            Self::Show
        } else if score >= 0.5 {
            Self::ShowWithWarning
        } else {
            Self::Flag
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::ShowWithWarning => "show_with_warning",
            Self::Flag => "flag",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, weighted sub-measurement behind the trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Signal identifier (e.g., "semantic_similarity")
    pub name: String,

    /// Measured value, expected in [0, 1]
    pub value: f64,

    /// Presentation weight, expected in [0, 1]
    pub weight: f64,
}

impl Signal {
    pub fn new(name: impl Into<String>, value: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
        }
    }
}

/// Canonical result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub predicted_label: Label,
    pub trust_score: f64,

    /// Always present, derived from `trust_score` when the service omits it
    pub decision: Decision,

    /// Always an ordered list, whatever shape the service used
    pub signals: Vec<Signal>,

    /// Echoed from the submitted request
    pub question: String,
    pub context: String,
    pub answer: String,
}

/// Signals as sent by the service: either already a list of records or a
/// name → value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawSignals {
    /// Ordered `{name, value, weight}` records
    List(Vec<Value>),

    /// Name → value entries in source order; no weights
    Map(Map<String, Value>),

    /// Missing, null, or of an unusable JSON type
    #[default]
    Absent,
}

impl RawSignals {
    /// Classify a signals payload by shape.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.clone()),
            Value::Object(entries) => Self::Map(entries.clone()),
            Value::Null => Self::Absent,
            other => {
                debug!(kind = json_kind(other), "ignoring signals of unexpected type");
                Self::Absent
            }
        }
    }
}

/// Loosely-typed service response.
///
/// Every field is optional and keeps its raw JSON value; a JSON `null` is
/// stored as `None`. Building one never fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEvaluationResponse {
    pub predicted_label: Option<Value>,

    /// Alternate name for the label used by older service versions
    pub label: Option<Value>,

    pub trust_score: Option<Value>,
    pub decision: Option<Value>,
    pub signals: RawSignals,
}

impl RawEvaluationResponse {
    /// Read the known fields out of an arbitrary JSON value.
    ///
    /// A non-object payload yields a response with every field absent.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            debug!(kind = json_kind(value), "raw response is not a JSON object");
            return Self::default();
        };

        let present = |key: &str| fields.get(key).filter(|v| !v.is_null()).cloned();

        Self {
            predicted_label: present("predicted_label"),
            label: present("label"),
            trust_score: present("trust_score"),
            decision: present("decision"),
            signals: fields
                .get("signals")
                .map(RawSignals::from_value)
                .unwrap_or_default(),
        }
    }
}

impl From<&Value> for RawEvaluationResponse {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Value> for RawEvaluationResponse {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
