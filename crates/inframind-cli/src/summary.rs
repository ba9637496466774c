use crate::render::load_export;
use inframind_analysis::AnalysisResult;
use inframind_core::AppResult;
use std::path::Path;

pub fn summary_command(export: &Path) -> AppResult<()> {
    let result = load_export(export)?;
    print!("{}", render_summary(&result));
    Ok(())
}

fn render_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("incident: {}\n", result.incident_id));
    out.push_str(&format!(
        "confidence: {}% {}\n",
        result.confidence, result.confidence_label
    ));
    out.push_str(&format!("reasoning steps: {}\n", result.steps_count));
    out.push_str(&format!("contributing factors: {}\n", result.factors_count));
    out.push_str(&format!("recommended fixes: {}\n", result.fixes_count));

    for (priority, fixes) in result.fixes_by_priority() {
        out.push_str(&format!("\n{} ({})\n", priority.section_title(), fixes.len()));
        for fix in fixes {
            out.push_str(&format!(
                "  {} {} [{}] {}\n",
                fix.category_icon, fix.category, fix.priority, fix.title
            ));
            if !fix.has_details() {
                continue;
            }
            if let Some(steps) = &fix.implementation_steps {
                out.push_str(&format!("    implementation: {steps}\n"));
            }
            if let Some(impact) = &fix.expected_impact {
                out.push_str(&format!("    expected impact: {impact}\n"));
            }
        }
    }
    out
}
