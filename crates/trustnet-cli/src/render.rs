//! Terminal and JSON rendering of evaluation results.

use serde::Serialize;
use trustnet_core::{
    format_percent, format_signal_name, format_weight, EvaluationResult, RiskTier, Signal,
    VisualCategory,
};

/// Result plus the presentation fields a renderer needs.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub result: &'a EvaluationResult,
    pub category: VisualCategory,
    pub risk_tier: RiskTier,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a EvaluationResult) -> Self {
        Self {
            result,
            category: VisualCategory::from(result.decision),
            risk_tier: RiskTier::from_score(result.trust_score),
        }
    }
}

/// Render a full assessment for the terminal.
pub fn render_result(result: &EvaluationResult) -> String {
    let report = Report::new(result);
    let mut out = String::new();

    out.push_str(&format!(
        "Trust Score: {} [{}]\n",
        format_percent(result.trust_score),
        report.risk_tier
    ));
    out.push_str(&format!(
        "{} {} - {}\n",
        report.category.icon(),
        report.category.label(),
        report.category.description()
    ));
    out.push_str(&format!(
        "Classification: {}\n",
        format_signal_name(result.predicted_label.as_str())
    ));

    if !result.signals.is_empty() {
        out.push('\n');
        out.push_str(&render_signals(&result.signals));
    }

    out
}

/// Render the per-signal breakdown.
pub fn render_signals(signals: &[Signal]) -> String {
    let mut out = String::from("Signal Breakdown\n");

    let width = signals
        .iter()
        .map(|s| format_signal_name(&s.name).chars().count())
        .max()
        .unwrap_or(0);

    for signal in signals {
        out.push_str(&format!(
            "  {:<width$}  {:>4}  weight {}  [{}]\n",
            format_signal_name(&signal.name),
            format_percent(signal.value),
            format_weight(signal.weight),
            RiskTier::from_score(signal.value),
            width = width
        ));
    }

    out
}
