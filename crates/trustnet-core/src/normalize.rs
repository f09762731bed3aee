//! Response normalization and decision classification.
//!
//! Turns whatever the evaluation service sent back into a canonical
//! [`EvaluationResult`]. This stage never fails: missing or malformed
//! fields degrade to defaults.
//!
//! Resolution policy, one function per field:
//! 1. label: `predicted_label`, then `label`, then [`Label::Unknown`]
//! 2. trust score: numeric coercion, 0 when unusable
//! 3. decision: explicit valid literal, else derived from the trust score
//! 4. signals: list passes through in order, mapping is expanded with
//!    default weights
//! 5. question/context/answer: always from the submitted request

use serde_json::{Map, Value};
use tracing::debug;

use crate::request::EvaluationRequest;
use crate::types::{
    default_weight, json_kind, Decision, EvaluationResult, Label, RawEvaluationResponse,
    RawSignals, Signal,
};

/// Name given to signals that arrive without a usable name.
pub const UNNAMED_SIGNAL: &str = "unknown";

/// Normalize a raw service response into a canonical result.
pub fn normalize(raw: &RawEvaluationResponse, echo: &EvaluationRequest) -> EvaluationResult {
    let predicted_label = resolve_label(raw);
    let trust_score = coerce_score(raw.trust_score.as_ref());
    let decision = resolve_decision(raw, trust_score);
    let signals = reconcile_signals(&raw.signals);

    debug!(
        label = %predicted_label,
        trust_score,
        decision = %decision,
        signals = signals.len(),
        "normalized evaluation response"
    );

    EvaluationResult {
        predicted_label,
        trust_score,
        decision,
        signals,
        question: echo.question().to_string(),
        context: echo.context().to_string(),
        answer: echo.answer().to_string(),
    }
}

/// Normalize straight from a JSON value.
pub fn normalize_value(raw: &Value, echo: &EvaluationRequest) -> EvaluationResult {
    normalize(&RawEvaluationResponse::from_value(raw), echo)
}

/// Resolve the predicted label.
///
/// The primary field wins whenever it is present, even if its value is not
/// a recognized label; only an absent primary falls through to `label`.
pub fn resolve_label(raw: &RawEvaluationResponse) -> Label {
    match raw.predicted_label.as_ref().or(raw.label.as_ref()) {
        Some(Value::String(s)) => Label::parse(s),
        Some(other) => {
            debug!(kind = json_kind(other), "label is not a string");
            Label::Unknown
        }
        None => Label::Unknown,
    }
}

/// Coerce a JSON value to a finite number.
///
/// Numbers pass through, strings are parsed after trimming. Everything
/// else, and any non-finite result, becomes 0.
pub fn coerce_score(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    coerced.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Resolve the decision: an explicit valid literal from the service is kept,
/// anything else is derived from `trust_score`.
pub fn resolve_decision(raw: &RawEvaluationResponse, trust_score: f64) -> Decision {
    if let Some(decision) = raw.decision.as_ref().and_then(Value::as_str).and_then(Decision::parse) {
        return decision;
    }

    if let Some(invalid) = &raw.decision {
        debug!(decision = %invalid, "ignoring invalid decision from service");
    }

    Decision::from_trust_score(trust_score)
}

/// Reconcile either signal shape into an ordered list.
pub fn reconcile_signals(raw: &RawSignals) -> Vec<Signal> {
    match raw {
        RawSignals::List(items) => signals_from_list(items),
        RawSignals::Map(entries) => signals_from_map(entries),
        RawSignals::Absent => Vec::new(),
    }
}

fn signals_from_list(items: &[Value]) -> Vec<Signal> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let Value::Object(record) = item else {
                debug!(index, kind = json_kind(item), "skipping non-object signal entry");
                return None;
            };

            let name = record
                .get("name")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNNAMED_SIGNAL);

            Some(Signal {
                name: name.to_string(),
                value: coerce_score(record.get("value")),
                weight: coerce_score(record.get("weight")),
            })
        })
        .collect()
}

fn signals_from_map(entries: &Map<String, Value>) -> Vec<Signal> {
    entries
        .iter()
        .map(|(name, value)| Signal {
            name: if name.is_empty() { UNNAMED_SIGNAL.to_string() } else { name.clone() },
            value: coerce_score(Some(value)),
            weight: default_weight(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn echo() -> EvaluationRequest {
        EvaluationRequest::build(
            "What color is the sky?",
            "The sky appears blue due to Rayleigh scattering.",
            "The sky is blue.",
        )
        .unwrap()
    }

    fn parse_raw(value: Value) -> RawEvaluationResponse {
        RawEvaluationResponse::from_value(&value)
    }

    // ==================== LABEL ====================

    #[test]
    fn test_label_prefers_predicted_label() {
        let raw = parse_raw(json!({"predicted_label": "hallucinated", "label": "grounded"}));
        assert_eq!(resolve_label(&raw), Label::Hallucinated);
    }

    #[test]
    fn test_label_falls_back_to_alternate_name() {
        let raw = parse_raw(json!({"label": "partially_grounded"}));
        assert_eq!(resolve_label(&raw), Label::PartiallyGrounded);
    }

    #[test]
    fn test_label_null_primary_falls_through() {
        let raw = parse_raw(json!({"predicted_label": null, "label": "grounded"}));
        assert_eq!(resolve_label(&raw), Label::Grounded);
    }

    #[test]
    fn test_label_missing_is_unknown() {
        assert_eq!(resolve_label(&parse_raw(json!({}))), Label::Unknown);
    }

    #[test]
    fn test_label_unrecognized_primary_does_not_fall_through() {
        let raw = parse_raw(json!({"predicted_label": "maybe", "label": "grounded"}));
        assert_eq!(resolve_label(&raw), Label::Unknown);
    }

    #[test]
    fn test_label_non_string_is_unknown() {
        assert_eq!(resolve_label(&parse_raw(json!({"label": 3}))), Label::Unknown);
    }

    // ==================== SCORE ====================

    #[test]
    fn test_coerce_score_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_score(Some(&json!(0.92))), 0.92);
        assert_eq!(coerce_score(Some(&json!(1))), 1.0);
        assert_eq!(coerce_score(Some(&json!("0.75"))), 0.75);
        assert_eq!(coerce_score(Some(&json!("  0.3 "))), 0.3);
    }

    #[test]
    fn test_coerce_score_defaults_to_zero() {
        assert_eq!(coerce_score(None), 0.0);
        assert_eq!(coerce_score(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_score(Some(&json!("high"))), 0.0);
        assert_eq!(coerce_score(Some(&json!(""))), 0.0);
        assert_eq!(coerce_score(Some(&json!(true))), 0.0);
        assert_eq!(coerce_score(Some(&json!([0.5]))), 0.0);
    }

    #[test]
    fn test_coerce_score_rejects_non_finite_strings() {
        assert_eq!(coerce_score(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_score(Some(&json!("inf"))), 0.0);
        assert_eq!(coerce_score(Some(&json!("-infinity"))), 0.0);
    }

    // ==================== DECISION ====================

    #[test]
    fn test_explicit_decision_takes_precedence() {
        let raw = parse_raw(json!({"trust_score": 0.95, "decision": "flag"}));
        assert_eq!(resolve_decision(&raw, 0.95), Decision::Flag);
    }

    #[test]
    fn test_invalid_decision_is_derived() {
        let raw = parse_raw(json!({"decision": "maybe"}));
        assert_eq!(resolve_decision(&raw, 0.9), Decision::Show);

        let raw = parse_raw(json!({"decision": 1}));
        assert_eq!(resolve_decision(&raw, 0.6), Decision::ShowWithWarning);
    }

    #[test]
    fn test_decision_boundaries_through_normalize() {
        let cases = [
            (json!(0.8), Decision::ShowWithWarning),
            (json!(0.80000001), Decision::Show),
            (json!(0.5), Decision::ShowWithWarning),
            (json!(0.49999), Decision::Flag),
            (json!("0.81"), Decision::Show),
        ];

        for (score, expected) in cases {
            let result = normalize(&parse_raw(json!({"trust_score": score.clone()})), &echo());
            assert_eq!(result.decision, expected, "trust_score = {}", score);
        }
    }

    #[test]
    fn test_missing_score_flags() {
        let result = normalize(&parse_raw(json!({})), &echo());
        assert_eq!(result.trust_score, 0.0);
        assert_eq!(result.decision, Decision::Flag);
    }

    // ==================== SIGNALS ====================

    #[test]
    fn test_map_signals_get_default_weights_in_source_order() {
        let raw = parse_raw(json!({
            "signals": {"semantic_similarity": 0.9, "custom_signal": 0.2}
        }));
        let signals = reconcile_signals(&raw.signals);

        assert_eq!(
            signals,
            vec![
                Signal::new("semantic_similarity", 0.9, 0.5),
                Signal::new("custom_signal", 0.2, 0.0),
            ]
        );
    }

    #[test]
    fn test_map_signals_keep_non_canonical_order() {
        let raw = parse_raw(json!({
            "signals": {"entropy": 0.1, "entity_overlap": 0.4, "semantic_similarity": 0.8}
        }));
        let names: Vec<_> = reconcile_signals(&raw.signals)
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, vec!["entropy", "entity_overlap", "semantic_similarity"]);
    }

    #[test]
    fn test_map_signal_values_are_coerced() {
        let raw = parse_raw(json!({"signals": {"entropy": "0.25", "self_consistency": null}}));
        let signals = reconcile_signals(&raw.signals);

        assert_eq!(signals[0], Signal::new("entropy", 0.25, 0.1));
        assert_eq!(signals[1], Signal::new("self_consistency", 0.0, 0.1));
    }

    #[test]
    fn test_list_signals_pass_through() {
        let raw = parse_raw(json!({"signals": [{"name": "x", "value": 0.3, "weight": 0.2}]}));
        assert_eq!(reconcile_signals(&raw.signals), vec![Signal::new("x", 0.3, 0.2)]);
    }

    #[test]
    fn test_list_signals_coerce_value_and_default_weight() {
        let raw = parse_raw(json!({"signals": [
            {"name": "b", "value": "0.7"},
            {"name": "a", "value": "oops", "weight": 0.4},
        ]}));

        assert_eq!(
            reconcile_signals(&raw.signals),
            vec![Signal::new("b", 0.7, 0.0), Signal::new("a", 0.0, 0.4)]
        );
    }

    #[test]
    fn test_list_signals_do_not_use_default_weights() {
        let raw = parse_raw(json!({"signals": [{"name": "semantic_similarity", "value": 0.9}]}));
        assert_eq!(reconcile_signals(&raw.signals)[0].weight, 0.0);
    }

    #[test]
    fn test_list_signals_skip_garbage_entries() {
        let raw = parse_raw(json!({"signals": [1, "two", {"value": 0.5}, null]}));
        assert_eq!(
            reconcile_signals(&raw.signals),
            vec![Signal::new(UNNAMED_SIGNAL, 0.5, 0.0)]
        );
    }

    #[test]
    fn test_absent_signals_are_empty() {
        assert!(reconcile_signals(&RawSignals::Absent).is_empty());
        let result = normalize(&parse_raw(json!({"signals": 42})), &echo());
        assert!(result.signals.is_empty());
    }

    // ==================== END TO END ====================

    #[test]
    fn test_grounded_scenario() {
        let raw = json!({
            "label": "grounded",
            "trust_score": 0.92,
            "signals": {"semantic_similarity": 0.95, "entity_overlap": 0.88}
        });
        let result = normalize_value(&raw, &echo());

        assert_eq!(result.predicted_label, Label::Grounded);
        assert_eq!(result.trust_score, 0.92);
        assert_eq!(result.decision, Decision::Show);
        assert_eq!(
            result.signals,
            vec![
                Signal::new("semantic_similarity", 0.95, 0.5),
                Signal::new("entity_overlap", 0.88, 0.3),
            ]
        );
        assert_eq!(result.question, "What color is the sky?");
    }

    #[test]
    fn test_echo_ignores_service_echo() {
        let raw = json!({"question": "something else", "answer": "nope", "trust_score": 0.1});
        let result = normalize_value(&raw, &echo());

        assert_eq!(result.question, "What color is the sky?");
        assert_eq!(result.context, "The sky appears blue due to Rayleigh scattering.");
        assert_eq!(result.answer, "The sky is blue.");
    }

    #[test]
    fn test_canonical_result_is_a_fixed_point() {
        let first = normalize_value(
            &json!({
                "predicted_label": "partially_grounded",
                "trust_score": "0.61",
                "signals": {"semantic_similarity": 0.7, "entropy": 0.4, "custom": 1}
            }),
            &echo(),
        );

        let refed = serde_json::to_value(&first).unwrap();
        let second = normalize_value(&refed, &echo());

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_label_survives_round_trip() {
        let first = normalize_value(&json!({"trust_score": 0.2}), &echo());
        assert_eq!(first.predicted_label, Label::Unknown);

        let second = normalize_value(&serde_json::to_value(&first).unwrap(), &echo());
        assert_eq!(second.predicted_label, Label::Unknown);
    }

    // ==================== PROPERTIES ====================

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<f64>().prop_map(|f| json!(f)),
            any::<i64>().prop_map(|i| json!(i)),
            "[a-z_]{0,12}".prop_map(Value::String),
            "-?[0-9]{0,2}\\.?[0-9]{0,4}".prop_map(Value::String),
        ];

        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(
                    (
                        prop_oneof![
                            Just("predicted_label".to_string()),
                            Just("label".to_string()),
                            Just("trust_score".to_string()),
                            Just("decision".to_string()),
                            Just("signals".to_string()),
                            Just("name".to_string()),
                            Just("value".to_string()),
                            Just("weight".to_string()),
                            "[a-z_]{1,10}",
                        ],
                        inner,
                    ),
                    0..6,
                )
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_total(value in arb_json()) {
            let result = normalize_value(&value, &echo());

            prop_assert!(result.trust_score.is_finite());
            prop_assert!(Decision::parse(result.decision.as_str()).is_some());
            prop_assert!(result.signals.iter().all(|s| !s.name.is_empty()));
            prop_assert!(result.signals.iter().all(|s| s.value.is_finite() && s.weight.is_finite()));
            prop_assert_eq!(result.question.as_str(), "What color is the sky?");
        }

        #[test]
        fn prop_normalize_is_idempotent(value in arb_json()) {
            let first = normalize_value(&value, &echo());
            let second = normalize_value(&serde_json::to_value(&first).unwrap(), &echo());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_derived_decision_matches_thresholds(score in -1.0f64..2.0) {
            let result = normalize_value(&json!({"trust_score": score}), &echo());
            let expected = if score > 0.8 {
                Decision::Show
            } else if score >= 0.5 {
                Decision::ShowWithWarning
            } else {
                Decision::Flag
            };
            prop_assert_eq!(result.decision, expected);
        }
    }
}
