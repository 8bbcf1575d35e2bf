//! PDF processing error types.

use std::fmt;

/// Errors from PDF rasterization and assembly.
#[derive(Debug, Clone)]
pub enum PdfError {
    // === Rasterization errors ===
    /// The pdfium library could not be located or loaded
    LibraryUnavailable { message: String },
    /// The input document failed to open or parse
    OpenFailed { path: String, message: String },
    /// A page failed to render to a bitmap
    RenderFailed { page: u16, message: String },
    /// A rendered page failed to watermark or encode
    StampFailed { page: u16, message: String },

    // === Assembly errors ===
    /// A frame could not be decoded or embedded into the document
    EmbedFailed { frame: usize, message: String },
    /// The assembled document failed to serialize
    SaveFailed { message: String },
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::LibraryUnavailable { message } => {
                write!(f, "PDF rendering library unavailable: {}", message)
            }
            PdfError::OpenFailed { path, message } => {
                write!(f, "Failed to open PDF {}: {}", path, message)
            }
            PdfError::RenderFailed { page, message } => {
                write!(f, "Failed to render page {}: {}", page, message)
            }
            PdfError::StampFailed { page, message } => {
                write!(f, "Failed to watermark page {}: {}", page, message)
            }
            PdfError::EmbedFailed { frame, message } => {
                write!(f, "Failed to embed frame {}: {}", frame, message)
            }
            PdfError::SaveFailed { message } => {
                write!(f, "Failed to save PDF: {}", message)
            }
        }
    }
}

impl std::error::Error for PdfError {}

impl PdfError {
    /// Helper constructors for common error patterns
    pub fn library_unavailable(message: impl Into<String>) -> Self {
        PdfError::LibraryUnavailable {
            message: message.into(),
        }
    }

    pub fn open_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        PdfError::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn render_failed(page: u16, message: impl Into<String>) -> Self {
        PdfError::RenderFailed {
            page,
            message: message.into(),
        }
    }

    pub fn stamp_failed(page: u16, message: impl Into<String>) -> Self {
        PdfError::StampFailed {
            page,
            message: message.into(),
        }
    }

    pub fn embed_failed(frame: usize, message: impl Into<String>) -> Self {
        PdfError::EmbedFailed {
            frame,
            message: message.into(),
        }
    }

    pub fn save_failed(message: impl Into<String>) -> Self {
        PdfError::SaveFailed {
            message: message.into(),
        }
    }
}
