//! Raster frame encoding.
//!
//! Stamped bitmaps leave the renderer as base64 data URIs. Which codec
//! and quality a frame gets depends on where it is headed: plain images
//! keep the configured compression, PDF pages pick between download,
//! preview and reassembly encodings.

use base64::{engine::general_purpose, Engine as _};
use image::RgbaImage;
use std::io::Cursor;

use super::RenderError;

/// Output codec for a stamped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Jpeg,
    Png,
}

impl FrameFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            FrameFormat::Jpeg => "image/jpeg",
            FrameFormat::Png => "image/png",
        }
    }
}

/// Codec and quality selected for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEncoding {
    pub format: FrameFormat,
    /// Quality in [0.0, 1.0]; ignored by PNG.
    pub quality: f32,
}

/// Select codec and quality for a frame.
///
/// The branches are distinct on purpose: plain images always re-encode
/// as JPEG at the configured compression; PDF pages bound for download
/// use maximum-quality JPEG, previews a fixed 0.8 JPEG, and pages headed
/// for reassembly lossless PNG.
pub fn select_encoding(
    is_pdf: bool,
    is_preview: bool,
    for_download: bool,
    compression: f32,
) -> FrameEncoding {
    if !is_pdf {
        return FrameEncoding {
            format: FrameFormat::Jpeg,
            quality: compression,
        };
    }

    if for_download {
        FrameEncoding {
            format: FrameFormat::Jpeg,
            quality: 1.0,
        }
    } else if is_preview {
        FrameEncoding {
            format: FrameFormat::Jpeg,
            quality: 0.8,
        }
    } else {
        FrameEncoding {
            format: FrameFormat::Png,
            quality: 1.0,
        }
    }
}

/// Map a [0.0, 1.0] quality factor to the 1-100 scale JPEG encoders use.
pub fn jpeg_quality(quality: f32) -> u8 {
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    scaled.max(1)
}

/// Encode a stamped bitmap with the selected codec.
pub fn encode_frame(image: &RgbaImage, encoding: FrameEncoding) -> Result<Vec<u8>, RenderError> {
    match encoding.format {
        FrameFormat::Jpeg => encode_jpeg(image, jpeg_quality(encoding.quality)),
        FrameFormat::Png => encode_png(image),
    }
}

/// Encode a stamped bitmap and wrap it as a base64 data URI.
pub fn encode_frame_uri(
    image: &RgbaImage,
    encoding: FrameEncoding,
) -> Result<String, RenderError> {
    let bytes = encode_frame(image, encoding)?;
    Ok(to_data_uri(&bytes, encoding.format))
}

/// Wrap encoded image bytes as a `data:` URI.
pub fn to_data_uri(bytes: &[u8], format: FrameFormat) -> String {
    format!(
        "data:{};base64,{}",
        format.mime_type(),
        general_purpose::STANDARD.encode(bytes)
    )
}

fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, RenderError> {
    use image::codecs::jpeg::JpegEncoder;
    use image::ImageEncoder as _;

    // JPEG has no alpha channel
    let rgb_data = rgba_to_rgb(image.as_raw());

    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, quality);

    encoder
        .write_image(
            &rgb_data,
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| RenderError::EncodeError(format!("jpeg: {}", e)))?;

    Ok(output.into_inner())
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder as _;

    let mut output = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut output);

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::EncodeError(format!("png: {}", e)))?;

    Ok(output.into_inner())
}

fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for pixel in rgba.chunks_exact(4) {
        rgb.push(pixel[0]);
        rgb.push(pixel[1]);
        rgb.push(pixel[2]);
    }
    rgb
}
