use inframind_analysis::AnalysisResult;
use inframind_core::{AppError, AppResult, ExportFormat};
use inframind_report::{export_file_name, render_export};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn resolve_formats(
    flag: Option<&str>,
    configured: &[ExportFormat],
) -> AppResult<Vec<ExportFormat>> {
    match flag {
        None => Ok(configured.to_vec()),
        Some("json") => Ok(vec![ExportFormat::Json]),
        Some("markdown") | Some("md") => Ok(vec![ExportFormat::Markdown]),
        Some("both") => Ok(vec![ExportFormat::Json, ExportFormat::Markdown]),
        Some(other) => Err(AppError::usage(format!(
            "invalid --format '{other}'; expected json|markdown|both"
        ))),
    }
}

/// Writes `<incidentId>.<ext>` per format. Every target is checked before
/// the first write, so a refused overwrite leaves the directory untouched.
pub fn write_exports(
    result: &AnalysisResult,
    out_dir: &Path,
    formats: &[ExportFormat],
    overwrite: bool,
) -> AppResult<Vec<PathBuf>> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(AppError::validation(format!(
            "output path {} is not a directory",
            out_dir.display()
        )));
    }

    let mut targets = Vec::new();
    for format in formats {
        let path = out_dir.join(export_file_name(&result.incident_id, *format));
        check_target(&path, overwrite)?;
        targets.push((path, *format));
    }

    fs::create_dir_all(out_dir).map_err(|e| {
        AppError::internal(format!("failed to create {}: {e}", out_dir.display()))
    })?;

    let mut written = Vec::new();
    for (path, format) in targets {
        let contents = render_export(result, format)?;
        write_file(&path, &contents)?;
        written.push(path);
    }
    Ok(written)
}

pub fn check_target(path: &Path, overwrite: bool) -> AppResult<()> {
    if path.is_dir() {
        return Err(AppError::validation(format!(
            "output path {} is a directory",
            path.display()
        )));
    }
    if path.exists() && !overwrite {
        return Err(AppError::usage(format!(
            "{} already exists; use --overwrite to replace",
            path.display()
        )));
    }
    Ok(())
}

pub fn write_file(path: &Path, contents: &str) -> AppResult<()> {
    fs::write(path, contents)
        .map_err(|e| AppError::internal(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote export");
    Ok(())
}
