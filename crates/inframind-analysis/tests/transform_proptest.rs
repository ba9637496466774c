use inframind_analysis::{derive_label, transform, ConfidenceLabel};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::{json, Value};

const STEP_TYPES: [&str; 3] = ["ROOT_CAUSE", "SYMPTOM", "PROPAGATION"];
const PRIORITIES: [&str; 6] = [
    "IMMEDIATE",
    "SHORT_TERM",
    "LONG_TERM",
    "immediate",
    "short-term",
    "long-term",
];

fn causal_entry() -> impl Strategy<Value = Value> {
    (any::<i64>(), 0usize..3, "[a-z ]{0,12}", any::<i16>()).prop_map(
        |(step_number, kind, event, confidence)| {
            json!({
                "stepNumber": step_number,
                "type": STEP_TYPES[kind],
                "event": event,
                "service": "svc",
                "confidence": confidence
            })
        },
    )
}

fn fix_entry() -> impl Strategy<Value = Value> {
    (0usize..PRIORITIES.len(), "[a-z ]{0,12}").prop_map(|(priority, title)| {
        json!({"priority": PRIORITIES[priority], "category": "code", "title": title})
    })
}

fn reasoning_entry() -> impl Strategy<Value = Value> {
    (any::<i64>(), "[a-z ]{0,12}", vec("[a-z]{0,6}", 0..4)).prop_map(
        |(step_number, title, evidence)| {
            json!({
                "stepNumber": step_number,
                "title": title,
                "conclusion": "c",
                "evidence": evidence
            })
        },
    )
}

/// A payload in either accepted shape, with the lengths of the chain,
/// fixes, reasoning steps and factors it carries.
fn payload() -> impl Strategy<Value = (Value, [usize; 4])> {
    (
        vec(causal_entry(), 0..8),
        vec(fix_entry(), 0..8),
        vec(reasoning_entry(), 0..8),
        vec("[a-z ]{0,10}", 0..8),
        (any::<u32>(), any::<u32>(), any::<u32>()),
        any::<bool>(),
    )
        .prop_map(|(chain, fixes, steps, factors, counts, native)| {
            let lens = [chain.len(), fixes.len(), steps.len(), factors.len()];
            let (steps_count, factors_count, fixes_count) = counts;
            let value = if native {
                json!({
                    "incident_id": "INC-1",
                    "rca": {
                        "causal_chain": chain,
                        "fix_suggestions": fixes,
                        "reasoning_steps": steps,
                        "contributing_factors": factors,
                        "stepsCount": steps_count,
                        "factorsCount": factors_count,
                        "fixesCount": fixes_count
                    }
                })
            } else {
                json!({
                    "incidentId": "incident-1",
                    "causalChain": chain,
                    "fixes": fixes,
                    "reasoningSteps": steps,
                    "contributingFactors": factors,
                    "stepsCount": steps_count,
                    "factorsCount": factors_count,
                    "fixesCount": fixes_count
                })
            };
            (value, lens)
        })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn counts_follow_normalized_lists((payload, lens) in payload()) {
        let result = transform(&payload).expect("generated payload is valid");
        prop_assert_eq!(result.steps_count, result.reasoning_steps.len());
        prop_assert_eq!(result.factors_count, result.contributing_factors.len());
        prop_assert_eq!(result.fixes_count, result.fixes.len());
        prop_assert_eq!(result.causal_chain.len(), lens[0]);
        prop_assert_eq!(result.fixes.len(), lens[1]);
        prop_assert_eq!(result.reasoning_steps.len(), lens[2]);
        prop_assert_eq!(result.contributing_factors.len(), lens[3]);
    }

    #[test]
    fn step_numbers_ignore_backend_numbering((payload, _lens) in payload()) {
        let result = transform(&payload).expect("generated payload is valid");
        for (idx, step) in result.causal_chain.iter().enumerate() {
            prop_assert_eq!(step.step_number as usize, idx + 1);
            prop_assert!(step.confidence <= 100);
            prop_assert_eq!(step.confidence_label, derive_label(step.confidence));
        }
        for (idx, step) in result.reasoning_steps.iter().enumerate() {
            prop_assert_eq!(step.step_number as usize, idx + 1);
        }
    }

    #[test]
    fn derived_label_follows_thresholds(score in 0u8..=100) {
        let expected = if score >= 80 {
            ConfidenceLabel::High
        } else if score >= 50 {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::Low
        };
        prop_assert_eq!(derive_label(score), expected);
        let result = transform(&json!({"confidence": score})).expect("numeric confidence");
        prop_assert_eq!(result.confidence_label, expected);
    }
}
