// Error types module

use std::fmt;

/// Centralized error type for the watermarking pipeline
///
/// Categorizes errors into the stages a run can fail at, so the CLI
/// can report which part of the pipeline gave up.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Configuration errors (invalid YAML, out-of-range values, store I/O)
    Config(String),

    /// Font discovery/loading failures
    Font(String),

    /// Image decode, stamp, or encode failures
    Image(String),

    /// PDF rasterization or assembly failures
    Pdf(String),

    /// Output serialization failures (data URI decode, file writes)
    Export(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Font(msg) => write!(f, "Font error: {}", msg),
            AppError::Image(msg) => write!(f, "Image error: {}", msg),
            AppError::Pdf(msg) => write!(f, "PDF error: {}", msg),
            AppError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<crate::watermark::RenderError> for AppError {
    fn from(err: crate::watermark::RenderError) -> Self {
        match err {
            crate::watermark::RenderError::FontError(msg) => AppError::Font(msg),
            other => AppError::Image(other.to_string()),
        }
    }
}

impl From<crate::pdf::PdfError> for AppError {
    fn from(err: crate::pdf::PdfError) -> Self {
        AppError::Pdf(err.to_string())
    }
}

impl From<crate::export::ExportError> for AppError {
    fn from(err: crate::export::ExportError) -> Self {
        AppError::Export(err.to_string())
    }
}

impl From<crate::config::StoreError> for AppError {
    fn from(err: crate::config::StoreError) -> Self {
        AppError::Config(err.to_string())
    }
}
