use crate::model::{
    category_icon, AnalysisResult, CausalStep, ConfidenceLabel, Fix, FixPriority, ReasoningStep,
    StepType,
};
use crate::payload::{Fields, Object};
use inframind_core::{AppError, AppResult};
use serde_json::{Map, Value};
use tracing::debug;

const INCIDENT_ID: &[&str] = &["incidentId", "incident_id"];
const EXECUTIVE_SUMMARY: &[&str] = &["executiveSummary", "executive_summary", "summary"];
const ROOT_CAUSE: &[&str] = &["rootCause", "root_cause"];
const CONFIDENCE: &[&str] = &["confidence", "overall_confidence", "overallConfidence"];
const ROOT_CAUSE_CONFIDENCE: &[&str] = &["rootCauseConfidence", "root_cause_confidence"];
const CONFIDENCE_LABEL: &[&str] = &["confidenceLabel", "confidence_label"];
const CONTRIBUTING_FACTORS: &[&str] = &["contributingFactors", "contributing_factors"];
const SYMPTOMS: &[&str] = &["symptoms"];
const CAUSAL_CHAIN: &[&str] = &["causalChain", "causal_chain"];
const FIXES: &[&str] = &["fixes", "fix_suggestions", "fixSuggestions"];
const REASONING_STEPS: &[&str] = &["reasoningSteps", "reasoning_steps"];

const STEP_TYPE: &[&str] = &["type", "stepType", "step_type"];
const EVENT: &[&str] = &["event"];
const SERVICE: &[&str] = &["service"];
const IS_ROOT_CAUSE: &[&str] = &["is_root_cause", "isRootCause"];
const IS_SYMPTOM: &[&str] = &["is_symptom", "isSymptom"];

const PRIORITY: &[&str] = &["priority"];
const CATEGORY: &[&str] = &["category"];
const CATEGORY_ICON: &[&str] = &["categoryIcon", "category_icon"];
const TITLE: &[&str] = &["title", "description"];
const IMPLEMENTATION_STEPS: &[&str] = &[
    "implementationSteps",
    "implementation_steps",
    "implementation",
];
const EXPECTED_IMPACT: &[&str] = &["expectedImpact", "expected_impact", "impact"];

const CONCLUSION: &[&str] = &["conclusion"];
const EVIDENCE: &[&str] = &["evidence"];
const EVIDENCE_SOURCE: &[&str] = &["source"];
const EVIDENCE_TEXT: &[&str] = &["description", "text"];

const DEFAULT_CATEGORY: &str = "GENERAL";

/// Normalizes a backend payload into the view model.
///
/// Accepts the dashboard shape (camelCase fields) as well as the native
/// backend response, where the analysis sits under `rca` next to
/// `incident_id` and `summary`. Missing or misshapen fields fall back to
/// empty values; the only failure is an unrecognized causal step `type` or
/// fix `priority`, reported as [`inframind_core::ErrorKind::MalformedResponse`].
///
/// Step numbers and counts are always recomputed from the received order.
pub fn transform(payload: &Value) -> AppResult<AnalysisResult> {
    let empty = Map::new();
    let root = payload.as_object().unwrap_or(&empty);
    let fields = Fields::from_response(root);

    let confidence_score = fields.score(CONFIDENCE);
    let confidence = confidence_score.map(|s| s.value()).unwrap_or(0);
    let confidence_label = fields
        .label(CONFIDENCE_LABEL)
        .or_else(|| confidence_score.and_then(|s| s.implied_label()))
        .unwrap_or_else(|| ConfidenceLabel::from_score(confidence));
    let root_cause_confidence = fields
        .score(ROOT_CAUSE_CONFIDENCE)
        .map(|s| s.value())
        .unwrap_or(confidence);

    let contributing_factors = fields.strings(CONTRIBUTING_FACTORS);
    let symptoms = fields.strings(SYMPTOMS);

    let causal_chain = fields
        .objects(CAUSAL_CHAIN)
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| causal_step(idx, entry))
        .collect::<AppResult<Vec<_>>>()?;

    let fixes = fields
        .objects(FIXES)
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| fix(idx, entry))
        .collect::<AppResult<Vec<_>>>()?;

    let reasoning_steps: Vec<ReasoningStep> = fields
        .objects(REASONING_STEPS)
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| reasoning_step(idx, entry))
        .collect();

    let result = AnalysisResult {
        incident_id: fields.text(INCIDENT_ID),
        confidence,
        confidence_label,
        steps_count: reasoning_steps.len(),
        factors_count: contributing_factors.len(),
        fixes_count: fixes.len(),
        executive_summary: fields.text(EXECUTIVE_SUMMARY),
        root_cause: fields.text(ROOT_CAUSE),
        root_cause_confidence,
        contributing_factors,
        symptoms,
        causal_chain,
        fixes,
        reasoning_steps,
    };

    debug!(
        incident_id = %result.incident_id,
        confidence = result.confidence,
        label = %result.confidence_label,
        chain = result.causal_chain.len(),
        steps = result.steps_count,
        factors = result.factors_count,
        fixes = result.fixes_count,
        "transformed analysis payload"
    );
    Ok(result)
}

fn causal_step(idx: usize, entry: &Object) -> AppResult<CausalStep> {
    let fields = Fields::new(entry);
    let step_type = match fields.get(STEP_TYPE) {
        Some(value) => value.as_str().and_then(StepType::parse).ok_or_else(|| {
            AppError::malformed_response(format!(
                "causal chain entry {} has unknown type {value}",
                idx + 1
            ))
        })?,
        None if fields.flag(IS_ROOT_CAUSE) => StepType::RootCause,
        None if fields.flag(IS_SYMPTOM) => StepType::Symptom,
        None => StepType::Propagation,
    };

    let score = fields.score(CONFIDENCE);
    let confidence = score.map(|s| s.value()).unwrap_or(0);
    let confidence_label = fields
        .label(CONFIDENCE_LABEL)
        .or_else(|| score.and_then(|s| s.implied_label()))
        .unwrap_or_else(|| ConfidenceLabel::from_score(confidence));

    Ok(CausalStep {
        step_number: step_number(idx),
        step_type,
        event: fields.text(EVENT),
        service: fields.text(SERVICE),
        confidence,
        confidence_label,
    })
}

fn fix(idx: usize, entry: &Object) -> AppResult<Fix> {
    let fields = Fields::new(entry);
    let priority = match fields.get(PRIORITY) {
        Some(value) => value.as_str().and_then(FixPriority::parse).ok_or_else(|| {
            AppError::malformed_response(format!(
                "fix {} has unknown priority {value}",
                idx + 1
            ))
        })?,
        None => FixPriority::ShortTerm,
    };

    let category = fields
        .optional_text(CATEGORY)
        .map(|c| c.trim().to_ascii_uppercase())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let category_icon = fields
        .optional_text(CATEGORY_ICON)
        .unwrap_or_else(|| category_icon(&category).to_string());

    Ok(Fix {
        priority,
        category,
        category_icon,
        title: fields.text(TITLE),
        implementation_steps: fields.optional_text(IMPLEMENTATION_STEPS),
        expected_impact: fields.optional_text(EXPECTED_IMPACT),
    })
}

fn reasoning_step(idx: usize, entry: &Object) -> ReasoningStep {
    let fields = Fields::new(entry);
    let evidence = fields
        .array(EVIDENCE)
        .iter()
        .filter_map(evidence_line)
        .collect();

    ReasoningStep {
        step_number: step_number(idx),
        title: fields.text(TITLE),
        conclusion: fields.text(CONCLUSION),
        evidence,
    }
}

/// Evidence arrives either as plain strings or as `{source, description}`.
fn evidence_line(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Object(entry) => {
            let fields = Fields::new(entry);
            let text = fields.text(EVIDENCE_TEXT);
            match fields.optional_text(EVIDENCE_SOURCE) {
                Some(source) if text.is_empty() => Some(format!("[{source}]")),
                Some(source) => Some(format!("[{source}] {text}")),
                None if text.is_empty() => None,
                None => Some(text),
            }
        }
        _ => None,
    }
}

fn step_number(idx: usize) -> u32 {
    u32::try_from(idx + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inframind_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn empty_payload_uses_defaults() {
        let result = transform(&json!({})).unwrap();
        assert_eq!(result.incident_id, "");
        assert_eq!(result.executive_summary, "");
        assert_eq!(result.root_cause, "");
        assert_eq!(result.confidence, 0);
        assert_eq!(result.root_cause_confidence, 0);
        assert_eq!(result.confidence_label, ConfidenceLabel::Low);
        assert!(result.contributing_factors.is_empty());
        assert!(result.symptoms.is_empty());
        assert!(result.causal_chain.is_empty());
        assert!(result.fixes.is_empty());
        assert!(result.reasoning_steps.is_empty());
        assert_eq!(
            (result.steps_count, result.factors_count, result.fixes_count),
            (0, 0, 0)
        );
    }

    #[test]
    fn non_object_payload_is_treated_as_empty() {
        let result = transform(&json!(["not", "an", "object"])).unwrap();
        assert_eq!(result.incident_id, "");
        assert!(result.counts_consistent());
    }

    #[test]
    fn explicit_label_wins_over_score() {
        let result = transform(&json!({"confidence": 95, "confidenceLabel": "LOW"})).unwrap();
        assert_eq!(result.confidence, 95);
        assert_eq!(result.confidence_label, ConfidenceLabel::Low);
    }

    #[test]
    fn missing_label_is_derived() {
        let result = transform(&json!({"confidence": 80})).unwrap();
        assert_eq!(result.confidence_label, ConfidenceLabel::High);
        assert_eq!(result.root_cause_confidence, 80);
    }

    #[test]
    fn unparseable_label_falls_back_to_derivation() {
        let result = transform(&json!({"confidence": 55, "confidenceLabel": "SURE"})).unwrap();
        assert_eq!(result.confidence_label, ConfidenceLabel::Medium);
    }

    #[test]
    fn backend_counts_are_ignored() {
        let result = transform(&json!({
            "stepsCount": 9,
            "factorsCount": 9,
            "fixesCount": 9,
            "contributingFactors": ["a", "b"],
            "fixes": [{"priority": "LONG_TERM", "title": "t"}]
        }))
        .unwrap();
        assert_eq!(result.steps_count, 0);
        assert_eq!(result.factors_count, 2);
        assert_eq!(result.fixes_count, 1);
    }

    #[test]
    fn causal_steps_are_renumbered() {
        let result = transform(&json!({
            "causalChain": [
                {"stepNumber": 7, "type": "ROOT_CAUSE", "event": "a"},
                {"stepNumber": 3, "type": "SYMPTOM", "event": "b"}
            ]
        }))
        .unwrap();
        let numbers: Vec<u32> = result.causal_chain.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(result.causal_chain[0].event, "a");
    }

    #[test]
    fn step_type_falls_back_to_flags() {
        let result = transform(&json!({
            "causal_chain": [
                {"event": "root", "is_root_cause": true},
                {"event": "hop"},
                {"event": "seen", "is_symptom": true}
            ]
        }))
        .unwrap();
        let types: Vec<StepType> = result.causal_chain.iter().map(|s| s.step_type).collect();
        assert_eq!(
            types,
            vec![StepType::RootCause, StepType::Propagation, StepType::Symptom]
        );
    }

    #[test]
    fn unknown_step_type_is_malformed() {
        let err = transform(&json!({"causalChain": [{"type": "UNKNOWN"}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.message().contains("UNKNOWN"));
    }

    #[test]
    fn step_type_spelling_is_not_folded() {
        for spelling in ["propagation", "root-cause", "Symptom"] {
            let err = transform(&json!({"causalChain": [{"type": spelling}]})).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse, "{spelling}");
        }
    }

    #[test]
    fn non_string_step_type_is_malformed() {
        let err = transform(&json!({"causalChain": [{"type": 3}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn unknown_priority_is_malformed() {
        let err = transform(&json!({"fixes": [{"priority": "critical"}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn fix_defaults_and_icons() {
        let result = transform(&json!({
            "fixes": [
                {"title": "no priority"},
                {"priority": "immediate", "category": "configuration", "description": "raise pool", "implementation": ""}
            ]
        }))
        .unwrap();
        assert_eq!(result.fixes[0].priority, FixPriority::ShortTerm);
        assert_eq!(result.fixes[0].category, DEFAULT_CATEGORY);
        assert_eq!(result.fixes[1].category, "CONFIGURATION");
        assert_eq!(result.fixes[1].category_icon, "\u{2699}\u{FE0F}");
        assert_eq!(result.fixes[1].title, "raise pool");
        assert_eq!(result.fixes[1].implementation_steps, None);
    }

    #[test]
    fn explicit_category_icon_is_kept() {
        let result = transform(&json!({
            "fixes": [{"priority": "LONG_TERM", "category": "PROCESS", "categoryIcon": "*"}]
        }))
        .unwrap();
        assert_eq!(result.fixes[0].category_icon, "*");
    }

    #[test]
    fn evidence_objects_are_flattened() {
        let result = transform(&json!({
            "reasoning_steps": [{
                "step_number": 4,
                "description": "Check pool",
                "conclusion": "exhausted",
                "evidence": [
                    {"source": "log", "description": "timeout after 30s"},
                    "plain line",
                    {"description": "no source"},
                    {"source": "metric"},
                    {},
                    12
                ]
            }]
        }))
        .unwrap();
        let step = &result.reasoning_steps[0];
        assert_eq!(step.step_number, 1);
        assert_eq!(step.title, "Check pool");
        assert_eq!(
            step.evidence,
            vec!["[log] timeout after 30s", "plain line", "no source", "[metric]"]
        );
    }

    #[test]
    fn label_only_confidence_uses_representative_score() {
        let result = transform(&json!({
            "rca": {
                "overall_confidence": "HIGH",
                "causal_chain": [{"event": "e", "confidence": "LOW"}]
            }
        }))
        .unwrap();
        assert_eq!(result.confidence, 90);
        assert_eq!(result.confidence_label, ConfidenceLabel::High);
        assert_eq!(result.causal_chain[0].confidence, 30);
        assert_eq!(result.causal_chain[0].confidence_label, ConfidenceLabel::Low);
    }
}
