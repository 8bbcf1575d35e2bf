//! Watermark error types.
//!
//! Defines errors that can occur while stamping a watermark grid.

use std::fmt;

/// Errors that can occur during watermark rendering.
#[derive(Debug)]
pub enum RenderError {
    /// No usable font could be found or loaded
    FontError(String),

    /// Failed to decode the source image
    DecodeError(String),

    /// Failed to encode the stamped image
    EncodeError(String),

    /// Failed to resize the source to the target dimensions
    ResizeError(String),

    /// Invalid rendering configuration
    ConfigError(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontError(msg) => write!(f, "Font error: {}", msg),
            Self::DecodeError(msg) => write!(f, "Failed to decode source image: {}", msg),
            Self::EncodeError(msg) => write!(f, "Failed to encode image: {}", msg),
            Self::ResizeError(msg) => write!(f, "Failed to resize image: {}", msg),
            Self::ConfigError(msg) => write!(f, "Watermark configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}
