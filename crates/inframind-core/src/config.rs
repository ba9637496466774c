use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub export: ExportConfig,
}

impl Config {
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = if let Some(path) = path {
            let data = std::fs::read_to_string(path).map_err(|e| {
                AppError::usage(format!("failed to read config {}: {e}", path.display()))
            })?;
            serde_yaml::from_str::<Config>(&data).map_err(|e| {
                AppError::usage(format!("failed to parse config {}: {e}", path.display()))
            })?
        } else {
            Config::default()
        };

        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.client.validate()?;
        self.export.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_file_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> AppResult<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(AppError::usage("client.endpoint must not be empty"));
        }
        let known_scheme = ["http://", "https://", "mock://"]
            .iter()
            .any(|scheme| endpoint.starts_with(scheme));
        if !known_scheme {
            return Err(AppError::usage(format!(
                "invalid client.endpoint '{endpoint}'; expected http://, https:// or mock://"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::usage("client.timeout_secs must be > 0"));
        }
        if self.max_file_bytes == 0 {
            return Err(AppError::usage("client.max_file_bytes must be > 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            formats: vec![ExportFormat::Json, ExportFormat::Markdown],
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.formats.is_empty() {
            return Err(AppError::usage("export.formats must list at least one format"));
        }
        Ok(())
    }
}
