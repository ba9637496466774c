use crate::output::write_exports;
use inframind_analysis::transform;
use inframind_core::{AppError, AppResult, ExportFormat};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn transform_command(
    payload_path: &Path,
    out_dir: &Path,
    formats: &[ExportFormat],
    overwrite: bool,
) -> AppResult<()> {
    if !payload_path.is_file() {
        return Err(AppError::validation(format!(
            "payload {} is not a file",
            payload_path.display()
        )));
    }
    let text = fs::read_to_string(payload_path)
        .map_err(|e| AppError::validation(format!("failed to read payload: {e}")))?;
    let payload: Value = serde_json::from_str(&text)
        .map_err(|e| AppError::validation(format!("payload parse error: {e}")))?;

    let result = transform(&payload)?;
    for path in write_exports(&result, out_dir, formats, overwrite)? {
        println!("{}", path.display());
    }
    Ok(())
}
