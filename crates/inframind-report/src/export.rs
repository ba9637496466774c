use inframind_analysis::AnalysisResult;
use inframind_core::json::to_pretty_json;
use inframind_core::{AppError, AppResult, ExportFormat};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const EXPORT_SCHEMA: &str = include_str!("../schema/analysis_result.schema.json");
const FALLBACK_FILE_STEM: &str = "incident";

/// Pretty-printed JSON export, keys in view-model field order.
pub fn to_json_export(result: &AnalysisResult) -> AppResult<String> {
    to_pretty_json(result)
}

/// Inverse of [`to_json_export`]. The document is checked against the
/// bundled schema before it is decoded.
pub fn parse_json_export(text: &str) -> AppResult<AnalysisResult> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::validation(format!("export json error: {e}")))?;
    validate_export(&value)?;
    serde_json::from_value(value)
        .map_err(|e| AppError::validation(format!("export decode error: {e}")))
}

fn validate_export(value: &Value) -> AppResult<()> {
    let schema: Value = serde_json::from_str(EXPORT_SCHEMA)
        .map_err(|e| AppError::internal(format!("export schema parse error: {e}")))?;
    let compiled = jsonschema::JSONSchema::compile(&schema)
        .map_err(|e| AppError::internal(format!("export schema compile error: {e}")))?;
    let result = compiled.validate(value);
    if let Err(errors) = result {
        let detail = errors
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .next()
            .unwrap_or_default();
        return Err(AppError::validation(format!(
            "export schema validation failed: {detail}"
        )));
    }
    Ok(())
}

/// Fixed report template. Downstream tools diff these files, so headings,
/// order and punctuation are part of the format.
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Incident Report: {}\n\n", result.incident_id));

    section(&mut out, "Executive Summary", &result.executive_summary);
    section(
        &mut out,
        "Root Cause",
        &format!(
            "{}\nConfidence: {}% ({})",
            result.root_cause, result.root_cause_confidence, result.confidence_label
        ),
    );
    section(
        &mut out,
        "Contributing Factors",
        &bullets(result.contributing_factors.iter()),
    );
    section(&mut out, "Symptoms", &bullets(result.symptoms.iter()));

    let chain = result
        .causal_chain
        .iter()
        .map(|step| {
            format!(
                "{}. [{}] {} ({}, {}%)",
                step.step_number, step.step_type, step.event, step.service, step.confidence
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    section(&mut out, "Causal Chain", &chain);

    let fixes = bullets(
        result
            .fixes
            .iter()
            .map(|fix| format!("[{}] {}", fix.priority, fix.title)),
    );
    out.push_str(&format!("## Recommended Fixes\n{fixes}\n"));

    out
}

pub fn render_export(result: &AnalysisResult, format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Json => to_json_export(result),
        ExportFormat::Markdown => Ok(render_markdown(result)),
    }
}

/// `<incidentId>.json` / `<incidentId>.md`, with the identifier reduced to
/// characters that are safe in a file name.
pub fn export_file_name(incident_id: &str, format: ExportFormat) -> String {
    let stem = unsafe_file_chars().replace_all(incident_id.trim(), "_");
    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem.into_owned()
    };
    format!("{stem}.{}", format.extension())
}

fn unsafe_file_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("file name pattern compiles"))
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("## {title}\n{body}\n\n"));
}

fn bullets<I, S>(items: I) -> String
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    items
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
