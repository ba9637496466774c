use crate::output::write_exports;
use inframind_analysis::transform;
use inframind_core::config::Config;
use inframind_core::{AppResult, ExportFormat};
use inframind_report::{client_from_config, AnalysisRequest, UploadedFile};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct EvidenceFiles {
    pub logs: Vec<PathBuf>,
    pub metrics: Vec<PathBuf>,
    pub traces: Vec<PathBuf>,
    pub configs: Vec<PathBuf>,
}

pub fn analyze_command(
    description: String,
    service_name: String,
    files: EvidenceFiles,
    out_dir: &Path,
    formats: &[ExportFormat],
    overwrite: bool,
    config: &Config,
) -> AppResult<()> {
    let max_bytes = config.client.max_file_bytes;
    let request = AnalysisRequest {
        description,
        service_name,
        logs: load_all(&files.logs, max_bytes)?,
        metrics: load_all(&files.metrics, max_bytes)?,
        traces: load_all(&files.traces, max_bytes)?,
        configs: load_all(&files.configs, max_bytes)?,
    };
    request.validate()?;

    let client = client_from_config(&config.client)?;
    let payload = client.analyze(&request)?;
    let result = transform(&payload)?;
    info!(
        incident_id = %result.incident_id,
        confidence = result.confidence,
        label = %result.confidence_label,
        "analysis complete"
    );

    for path in write_exports(&result, out_dir, formats, overwrite)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn load_all(paths: &[PathBuf], max_bytes: u64) -> AppResult<Vec<UploadedFile>> {
    paths
        .iter()
        .map(|path| UploadedFile::load(path, max_bytes))
        .collect()
}
