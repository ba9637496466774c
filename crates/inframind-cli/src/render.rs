use crate::output::{check_target, write_file};
use inframind_analysis::AnalysisResult;
use inframind_core::{AppError, AppResult};
use inframind_report::{parse_json_export, render_markdown};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn render_command(export: &Path, out: Option<PathBuf>, overwrite: bool) -> AppResult<()> {
    let result = load_export(export)?;
    let markdown = render_markdown(&result);
    match out {
        Some(path) => {
            check_target(&path, overwrite)?;
            write_file(&path, &markdown)
        }
        None => {
            print!("{markdown}");
            Ok(())
        }
    }
}

pub fn load_export(path: &Path) -> AppResult<AnalysisResult> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::validation(format!("failed to read export {}: {e}", path.display()))
    })?;
    let result = parse_json_export(&text)?;
    if !result.counts_consistent() {
        warn!(
            path = %path.display(),
            steps = result.steps_count,
            factors = result.factors_count,
            fixes = result.fixes_count,
            "export counts disagree with its lists"
        );
    }
    Ok(result)
}
