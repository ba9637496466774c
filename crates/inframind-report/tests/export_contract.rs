use inframind_analysis::{transform, AnalysisResult};
use inframind_core::ExportFormat;
use inframind_report::{
    export_file_name, parse_json_export, render_export, render_markdown, to_json_export,
    AnalysisClient, AnalysisRequest, MockAnalysisClient, MockMode, UploadedFile,
};
use serde_json::json;

fn literal_scenario() -> AnalysisResult {
    transform(&json!({
        "incidentId": "incident-1",
        "executiveSummary": "Summary text",
        "rootCause": "Cause text",
        "rootCauseConfidence": 70,
        "confidenceLabel": "MEDIUM",
        "contributingFactors": ["A"],
        "symptoms": ["B"],
        "causalChain": [
            {"stepNumber": 1, "type": "ROOT_CAUSE", "event": "E", "service": "S", "confidence": 90}
        ],
        "fixes": [{"priority": "IMMEDIATE", "title": "Fix it"}]
    }))
    .unwrap()
}

#[test]
fn markdown_lines_match_literal_scenario() {
    let md = render_markdown(&literal_scenario());
    let lines: Vec<&str> = md.lines().collect();
    assert_eq!(lines[0], "# Incident Report: incident-1");
    assert!(lines.contains(&"1. [ROOT_CAUSE] E (S, 90%)"));
    assert!(lines.contains(&"- [IMMEDIATE] Fix it"));
    assert!(lines.contains(&"Confidence: 70% (MEDIUM)"));
}

#[test]
fn markdown_sections_are_in_order() {
    let md = render_markdown(&literal_scenario());
    let headers = [
        "# Incident Report:",
        "## Executive Summary",
        "## Root Cause",
        "## Contributing Factors",
        "## Symptoms",
        "## Causal Chain",
        "## Recommended Fixes",
    ];
    let positions: Vec<usize> = headers.iter().map(|h| md.find(h).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn empty_result_renders_every_header() {
    let md = render_markdown(&transform(&json!({})).unwrap());
    for header in [
        "## Contributing Factors",
        "## Symptoms",
        "## Causal Chain",
        "## Recommended Fixes",
    ] {
        assert!(md.contains(header), "missing {header}");
    }
    assert!(!md.contains("- "));
}

#[test]
fn json_export_round_trips_transformed_results() {
    let client = MockAnalysisClient::new(MockMode::Valid);
    let request = AnalysisRequest {
        description: "Checkout 503s".to_string(),
        service_name: "checkout".to_string(),
        logs: vec![UploadedFile::new("app.log", "ERROR timeout")],
        ..AnalysisRequest::default()
    };
    let from_backend = transform(&client.analyze(&request).unwrap()).unwrap();

    for result in [literal_scenario(), transform(&json!({})).unwrap(), from_backend] {
        let text = to_json_export(&result).unwrap();
        assert_eq!(parse_json_export(&text).unwrap(), result);
    }
}

#[test]
fn render_export_dispatches_by_format() {
    let result = literal_scenario();
    let json_text = render_export(&result, ExportFormat::Json).unwrap();
    assert!(json_text.starts_with("{\n  \"incidentId\": \"incident-1\""));
    let md = render_export(&result, ExportFormat::Markdown).unwrap();
    assert_eq!(md, render_markdown(&result));
    assert_eq!(
        export_file_name(&result.incident_id, ExportFormat::Markdown),
        "incident-1.md"
    );
}
