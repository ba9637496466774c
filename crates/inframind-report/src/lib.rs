pub mod client;
pub mod export;

pub use client::{
    client_from_config, AnalysisClient, AnalysisRequest, HttpAnalysisClient, MockAnalysisClient,
    MockMode, UploadedFile,
};
pub use export::{
    export_file_name, parse_json_export, render_export, render_markdown, to_json_export,
};
