pub mod config;
pub mod error;
pub mod json;

pub use config::{ClientConfig, Config, ExportConfig, ExportFormat};
pub use error::{AppError, AppResult, ErrorKind};
