//! Export helpers.
//!
//! Raster frames travel through the pipeline as base64 data URIs; this
//! module turns them back into bytes and files. The PNG re-encode path
//! covers downloads that ask for a `.png` even though frames are encoded
//! as JPEG internally.

use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Errors from data URI decoding and file output.
#[derive(Debug, Clone)]
pub enum ExportError {
    /// The string is not a `data:<type>;base64,<payload>` URI
    InvalidDataUri(String),

    /// The base64 payload or the encoded image failed to decode
    DecodeFailed(String),

    /// Writing the output file failed
    Io(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidDataUri(msg) => write!(f, "Invalid data URI: {}", msg),
            ExportError::DecodeFailed(msg) => write!(f, "Decode failed: {}", msg),
            ExportError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

/// Decode a `data:` URI into its declared content type and raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), ExportError> {
    let rest = uri.strip_prefix("data:").ok_or_else(|| {
        ExportError::InvalidDataUri("missing 'data:' prefix".to_string())
    })?;

    let (content_type, payload) = rest.split_once(";base64,").ok_or_else(|| {
        ExportError::InvalidDataUri("missing ';base64,' separator".to_string())
    })?;

    if content_type.is_empty() {
        return Err(ExportError::InvalidDataUri(
            "empty content type".to_string(),
        ));
    }

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ExportError::DecodeFailed(format!("base64: {}", e)))?;

    Ok((content_type.to_string(), bytes))
}

/// Decode a data URI and write its bytes to `path`.
pub fn save_data_uri(uri: &str, path: &Path) -> Result<(), ExportError> {
    let (content_type, bytes) = decode_data_uri(uri)?;
    write_bytes(path, &bytes)?;

    info!(
        path = %path.display(),
        content_type = %content_type,
        size = bytes.len(),
        "Saved output file"
    );
    Ok(())
}

/// Decode a data URI, redraw the raster at `width`×`height`, and write it
/// as a PNG. Used when the requested output has a `.png` extension and the
/// frame is internally JPEG-encoded.
pub fn save_png_reencoded(
    uri: &str,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), ExportError> {
    let (_, bytes) = decode_data_uri(uri)?;

    let decoded = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExportError::DecodeFailed(e.to_string()))?
        .decode()
        .map_err(|e| ExportError::DecodeFailed(e.to_string()))?;

    let resized = if decoded.width() != width || decoded.height() != height {
        decoded.resize_exact(width, height, image::imageops::FilterType::Lanczos3)
    } else {
        decoded
    };

    let mut output = Cursor::new(Vec::new());
    resized
        .write_to(&mut output, image::ImageFormat::Png)
        .map_err(|e| ExportError::DecodeFailed(format!("png re-encode: {}", e)))?;

    write_bytes(path, &output.into_inner())?;

    info!(
        path = %path.display(),
        width,
        height,
        "Saved re-encoded PNG"
    );
    Ok(())
}

/// Write raw bytes to a file, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ExportError::Io(format!("{}: {}", parent.display(), e)))?;
        }
    }

    std::fs::write(path, bytes).map_err(|e| ExportError::Io(format!("{}: {}", path.display(), e)))
}
