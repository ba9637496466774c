use inframind_core::config::ClientConfig;
use inframind_core::json::digest_parts;
use inframind_core::{AppError, AppResult};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const ANALYZE_PATH: &str = "/incidents/analyze";
const INCIDENT_ID_HEX_LEN: usize = 12;
const UNKNOWN_SOURCE: &str = "unknown";
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn load(path: &Path, max_bytes: u64) -> AppResult<Self> {
        let meta = std::fs::metadata(path)
            .map_err(|e| AppError::usage(format!("failed to read {}: {e}", path.display())))?;
        if !meta.is_file() {
            return Err(AppError::usage(format!("{} is not a file", path.display())));
        }
        if meta.len() > max_bytes {
            return Err(AppError::usage(format!(
                "{} is {} bytes; limit is {max_bytes}",
                path.display(),
                meta.len()
            )));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| AppError::usage(format!("failed to read {}: {e}", path.display())))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| AppError::usage(format!("{} is not valid UTF-8", path.display())))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self { name, content })
    }
}

/// What the analysis form submits.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub description: String,
    pub service_name: String,
    pub logs: Vec<UploadedFile>,
    pub metrics: Vec<UploadedFile>,
    pub traces: Vec<UploadedFile>,
    pub configs: Vec<UploadedFile>,
}

impl AnalysisRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::usage("incident description must not be empty"));
        }
        Ok(())
    }

    /// Content-addressed identifier: the same submission always maps to the
    /// same incident.
    pub fn incident_id(&self) -> String {
        let mut parts: Vec<&[u8]> = vec![
            self.service_name.as_bytes(),
            self.description.as_bytes(),
        ];
        for file in self.files() {
            parts.push(file.name.as_bytes());
            parts.push(file.content.as_bytes());
        }
        let digest = digest_parts(parts);
        format!("inc-{}", &digest[..INCIDENT_ID_HEX_LEN])
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    fn files(&self) -> impl Iterator<Item = &UploadedFile> {
        self.logs
            .iter()
            .chain(&self.metrics)
            .chain(&self.traces)
            .chain(&self.configs)
    }

    fn body(&self) -> AnalyzeBody {
        let source = if self.service_name.trim().is_empty() {
            UNKNOWN_SOURCE.to_string()
        } else {
            self.service_name.trim().to_string()
        };
        AnalyzeBody {
            incident_id: self.incident_id(),
            description: self.description.clone(),
            service_name: self.service_name.clone(),
            log_files: self
                .logs
                .iter()
                .map(|f| LogFile {
                    content: f.content.clone(),
                    source: source.clone(),
                })
                .collect(),
            metric_files: self
                .metrics
                .iter()
                .map(|f| MetricFile {
                    content: f.content.clone(),
                })
                .collect(),
            trace_files: self.traces.iter().map(|f| f.content.clone()).collect(),
            config_files: self
                .configs
                .iter()
                .map(|f| ConfigFile {
                    content: f.content.clone(),
                    path: f.name.clone(),
                    format: "auto",
                })
                .collect(),
            include_summary: true,
        }
    }
}

/// The outbound call to the analysis backend. Implementations return the raw
/// response payload; shaping it is the transform's job.
pub trait AnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> AppResult<Value>;
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    endpoint: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    fn endpoint_url(&self) -> String {
        if self.endpoint.ends_with(ANALYZE_PATH) {
            self.endpoint.clone()
        } else {
            format!("{}{ANALYZE_PATH}", self.endpoint.trim_end_matches('/'))
        }
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> AppResult<Value> {
        request.validate()?;
        let url = self.endpoint_url();
        let body = request.body();
        info!(
            url = %url,
            incident_id = %body.incident_id,
            files = request.file_count(),
            "sending analysis request"
        );

        let response = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => {
                    let detail: String = response
                        .into_string()
                        .map(|text| text.chars().take(MAX_ERROR_BODY_CHARS).collect())
                        .unwrap_or_default();
                    AppError::request(format!(
                        "analysis request failed with status {code}: {detail}"
                    ))
                }
                ureq::Error::Transport(transport) => {
                    AppError::request(format!("analysis request failed: {transport}"))
                }
            })?;
        let value: Value = response
            .into_json()
            .map_err(|e| AppError::request(format!("analysis response parse error: {e}")))?;
        debug!(incident_id = %body.incident_id, "analysis response received");
        Ok(value)
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeBody {
    incident_id: String,
    description: String,
    service_name: String,
    log_files: Vec<LogFile>,
    metric_files: Vec<MetricFile>,
    trace_files: Vec<String>,
    config_files: Vec<ConfigFile>,
    include_summary: bool,
}

#[derive(Debug, Serialize)]
struct LogFile {
    content: String,
    source: String,
}

#[derive(Debug, Serialize)]
struct MetricFile {
    content: String,
}

#[derive(Debug, Serialize)]
struct ConfigFile {
    content: String,
    path: String,
    format: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    Valid,
    Empty,
    UnknownType,
}

/// Offline backend for demos and tests, selected with `mock://` endpoints.
#[derive(Debug, Clone)]
pub struct MockAnalysisClient {
    mode: MockMode,
}

impl MockAnalysisClient {
    pub fn new(mode: MockMode) -> Self {
        Self { mode }
    }

    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        let mode = match endpoint.trim_end_matches('/') {
            "mock://valid" => MockMode::Valid,
            "mock://empty" => MockMode::Empty,
            "mock://unknown_type" => MockMode::UnknownType,
            _ => return None,
        };
        Some(Self { mode })
    }
}

impl AnalysisClient for MockAnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> AppResult<Value> {
        request.validate()?;
        let incident_id = request.incident_id();
        let response = match self.mode {
            MockMode::Empty => json!({ "incident_id": incident_id, "status": "completed" }),
            MockMode::Valid => build_valid(request, &incident_id),
            MockMode::UnknownType => {
                let mut value = build_valid(request, &incident_id);
                value["rca"]["causal_chain"][0]["type"] = json!("UNKNOWN");
                value
            }
        };
        Ok(response)
    }
}

fn build_valid(request: &AnalysisRequest, incident_id: &str) -> Value {
    let service = if request.service_name.trim().is_empty() {
        UNKNOWN_SOURCE
    } else {
        request.service_name.trim()
    };
    let summary = format!(
        "{service} degraded: {}",
        request.description.lines().next().unwrap_or_default().trim()
    );
    json!({
        "incident_id": incident_id,
        "status": "completed",
        "summary": summary,
        "rca": {
            "incident_id": incident_id,
            "summary": summary,
            "root_cause": format!("Connection pool exhaustion in {service}"),
            "contributing_factors": [
                "Pool size lowered in last config change",
                "Retry storm from upstream callers"
            ],
            "symptoms": ["Elevated p95 latency", "HTTP 503 responses"],
            "causal_chain": [
                {"event": "Pool size reduced", "service": service, "is_root_cause": true, "confidence": "HIGH"},
                {"event": "Requests queue on pool", "service": service, "confidence": "MEDIUM"},
                {"event": "Clients see 503s", "service": "gateway", "is_symptom": true, "confidence": "HIGH"}
            ],
            "fix_suggestions": [
                {
                    "priority": "immediate",
                    "category": "configuration",
                    "description": "Restore the previous pool size",
                    "implementation": "Roll back the config change and restart pods",
                    "impact": "Latency back to baseline within minutes"
                },
                {"priority": "short-term", "category": "observability", "description": "Alert on pool saturation"},
                {"priority": "long-term", "category": "process", "description": "Canary every pool size change"}
            ],
            "reasoning_steps": [
                {
                    "step_number": 1,
                    "description": "Correlate error onset with changes",
                    "evidence": [{"source": "config", "description": "pool size 50 -> 5"}],
                    "conclusion": "Config change precedes first error"
                },
                {
                    "step_number": 2,
                    "description": "Check saturation",
                    "evidence": [{"source": "metric", "description": "pool usage at 100%"}],
                    "conclusion": "Pool is the bottleneck"
                }
            ],
            "overall_confidence": "HIGH"
        }
    })
}

pub fn client_from_config(config: &ClientConfig) -> AppResult<Box<dyn AnalysisClient>> {
    config.validate()?;
    let endpoint = config.endpoint.trim();
    if endpoint.starts_with("mock://") {
        let client = MockAnalysisClient::from_endpoint(endpoint).ok_or_else(|| {
            AppError::usage(format!(
                "unknown mock endpoint '{endpoint}'; expected mock://valid|empty|unknown_type"
            ))
        })?;
        return Ok(Box::new(client));
    }
    Ok(Box::new(HttpAnalysisClient::new(
        endpoint.to_string(),
        Duration::from_secs(config.timeout_secs),
    )))
}
