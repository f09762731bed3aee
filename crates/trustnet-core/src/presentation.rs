//! Presentation derivations consumed by renderers.
//!
//! These are stateless lookups. Note that [`RiskTier`] thresholds (0.7/0.4)
//! are unrelated to the decision thresholds (0.8/0.5) in
//! [`Decision::from_trust_score`](crate::Decision::from_trust_score).

use std::fmt;

use serde::Serialize;

use crate::types::Decision;

/// Visual category of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualCategory {
    Trusted,
    Warning,
    Hallucinated,
    Unknown,
}

impl VisualCategory {
    /// Map a decision string to its category. Never fails.
    pub fn for_decision(decision: &str) -> Self {
        match decision {
            "show" => Self::Trusted,
            "show_with_warning" => Self::Warning,
            "flag" => Self::Hallucinated,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Trusted => "Trusted",
            Self::Warning => "Warning",
            Self::Hallucinated => "Hallucinated",
            Self::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Trusted => "✓",
            Self::Warning => "⚠",
            Self::Hallucinated => "✕",
            Self::Unknown => "?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Trusted => "High confidence - safe to display",
            Self::Warning => "Moderate confidence - review recommended",
            Self::Hallucinated => "Low confidence - likely contains errors",
            Self::Unknown => "Unable to determine",
        }
    }
}

impl From<Decision> for VisualCategory {
    fn from(decision: Decision) -> Self {
        Self::for_decision(decision.as_str())
    }
}

impl fmt::Display for VisualCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk tier of a score, used for the overall score and for each signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// score >= 0.7
    High,

    /// 0.4 <= score < 0.7
    Medium,

    /// score < 0.4
    Low,
}

impl RiskTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn a snake_case identifier into a title ("entity_overlap" → "Entity Overlap").
pub fn format_signal_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a [0, 1] score as a whole percentage ("92%").
///
/// Halves round up, so 0.625 reads "63%".
pub fn format_percent(score: f64) -> String {
    format!("{}%", (score * 100.0).round())
}

/// Format a weight with two decimals ("0.50").
pub fn format_weight(weight: f64) -> String {
    format!("{:.2}", weight)
}
