//! Watermark stamping pipeline.
//!
//! Takes a decoded source bitmap through resize → tint → tile stamp →
//! encode, producing the raster frame the assembler and export helpers
//! consume. Each distinct text line is rasterized and rotated once, then
//! composited at every grid anchor.

use ab_glyph::FontVec;
use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::{Rgba, RgbaImage};
use std::io::Cursor;
use std::num::NonZeroU32;
use tracing::debug;

use super::encode;
use super::text::{self, Color};
use super::tiling;
use super::{RasterFrame, RenderError};
use crate::config::WatermarkConfig;

/// Flat tint drawn under the tiles so watermark contrast does not depend
/// on the source image brightness.
const CANVAS_TINT: Color = Color::new(255, 255, 255, 0.2);

/// Where a stamped frame is headed. Drives the resolution multiplier and
/// the codec selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderIntent {
    pub is_pdf: bool,
    pub is_preview: bool,
    pub for_download: bool,
}

impl RenderIntent {
    /// Plain image watermarking.
    pub fn image() -> Self {
        Self::default()
    }

    /// PDF page shown as an interactive preview.
    pub fn pdf_preview() -> Self {
        Self {
            is_pdf: true,
            is_preview: true,
            for_download: false,
        }
    }

    /// PDF page headed for a downloaded document.
    pub fn pdf_download() -> Self {
        Self {
            is_pdf: true,
            is_preview: false,
            for_download: true,
        }
    }

    /// PDF page kept for later reassembly.
    pub fn pdf_reassembly() -> Self {
        Self {
            is_pdf: true,
            is_preview: false,
            for_download: false,
        }
    }
}

/// Resolution multiplier for a render.
///
/// Plain images render 1:1. PDF previews stay at 1x for speed; final
/// exports use at least 2x, or the display pixel ratio when that is
/// higher.
pub fn resolution_scale(intent: RenderIntent, pixel_ratio: f32) -> f32 {
    if !intent.is_pdf {
        return 1.0;
    }

    if intent.is_preview {
        1.0
    } else {
        pixel_ratio.max(2.0)
    }
}

/// Decode image bytes into an RGBA bitmap, sniffing the format.
pub fn decode_image(data: &[u8]) -> Result<RgbaImage, RenderError> {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| RenderError::DecodeError(e.to_string()))?
        .decode()
        .map_err(|e| RenderError::DecodeError(e.to_string()))?;

    Ok(img.to_rgba8())
}

/// Watermark a source bitmap and encode it as a raster frame.
///
/// `scale` is the resolution multiplier already baked into `source` for
/// PDF pages (1.0 for plain images); the tile geometry follows it so
/// higher-resolution renders keep the preview's proportions.
pub fn generate_frame(
    source: &RgbaImage,
    config: &WatermarkConfig,
    font: &FontVec,
    intent: RenderIntent,
    scale: f32,
) -> Result<RasterFrame, RenderError> {
    // PDF page bitmaps arrive at their final resolution; plain images
    // resize to the configured canvas when one is set.
    let prepared = if intent.is_pdf {
        source.clone()
    } else {
        let (target_w, target_h) = target_dimensions(config, source.width(), source.height());
        if (target_w, target_h) != source.dimensions() {
            resize_image(source, target_w, target_h, intent.is_preview)?
        } else {
            source.clone()
        }
    };

    let stamped = stamp(prepared, config, font, scale)?;

    let encoding = encode::select_encoding(
        intent.is_pdf,
        intent.is_preview,
        intent.for_download,
        config.compression,
    );
    let src = encode::encode_frame_uri(&stamped, encoding)?;

    debug!(
        width = stamped.width(),
        height = stamped.height(),
        format = encoding.format.mime_type(),
        "Generated raster frame"
    );

    Ok(RasterFrame {
        src,
        width: stamped.width(),
        height: stamped.height(),
    })
}

/// Target canvas size for a plain image: the configured dimensions where
/// set, otherwise the source dimensions.
pub fn target_dimensions(config: &WatermarkConfig, src_w: u32, src_h: u32) -> (u32, u32) {
    let width = if config.width > 0 { config.width } else { src_w };
    let height = if config.height > 0 {
        config.height
    } else {
        src_h
    };
    (width.max(1), height.max(1))
}

struct RotatedLine {
    bitmap: RgbaImage,
    offset: (f32, f32),
    ascent: f32,
}

/// Stamp the watermark grid onto a bitmap.
///
/// When the text is blank or the grid is empty the source is returned
/// untouched, tint included. The rotation angle is truncated to whole
/// degrees and applied to the grid as a rigid body: anchors are mapped
/// through the rotation rather than each tile spinning in place.
pub fn stamp(
    source: RgbaImage,
    config: &WatermarkConfig,
    font: &FontVec,
    scale: f32,
) -> Result<RgbaImage, RenderError> {
    let anchors = tiling::tile_anchors(config);
    if !config.has_words() || anchors.is_empty() {
        return Ok(source);
    }

    let mut canvas = source;
    apply_tint(&mut canvas, CANVAS_TINT);

    let color = text::parse_color(&config.color)?;
    let font_size = config.font_size * scale;
    let angle = config.rotate.trunc();

    // One rasterized, rotated bitmap per distinct line, reused across
    // the whole grid. Empty lines draw nothing.
    let (lines, _) = tiling::line_metrics(&config.words);
    let mut tiles: Vec<Option<RotatedLine>> = Vec::with_capacity(lines.len());
    for line in &lines {
        if line.is_empty() {
            tiles.push(None);
            continue;
        }
        let raster = text::render_line(font, line, font_size, color)?;
        let (bitmap, offset) = text::rotate_with_origin(&raster.image, angle);
        tiles.push(Some(RotatedLine {
            bitmap,
            offset,
            ascent: raster.ascent,
        }));
    }

    let radians = angle.to_radians();
    let (sin, cos) = radians.sin_cos();

    for anchor in anchors {
        let Some(tile) = tiles.get(anchor.line).and_then(Option::as_ref) else {
            continue;
        };

        // The anchor is a baseline point; the unrotated bitmap top-left
        // sits one ascent above it. Map it through the grid rotation,
        // then the bitmap's own bounding-box offset.
        let x = anchor.x * scale;
        let y = anchor.y * scale - tile.ascent;

        let left = x * cos - y * sin + tile.offset.0;
        let top = x * sin + y * cos + tile.offset.1;

        composite(&mut canvas, &tile.bitmap, left.round() as i64, top.round() as i64);
    }

    Ok(canvas)
}

fn apply_tint(canvas: &mut RgbaImage, tint: Color) {
    let alpha = (tint.a.clamp(0.0, 1.0) * 255.0) as u8;
    let tint_pixel = Rgba([tint.r, tint.g, tint.b, alpha]);

    for pixel in canvas.pixels_mut() {
        *pixel = text::blend_pixels(*pixel, tint_pixel);
    }
}

fn composite(canvas: &mut RgbaImage, tile: &RgbaImage, left: i64, top: i64) {
    let canvas_w = canvas.width() as i64;
    let canvas_h = canvas.height() as i64;

    for (tx, ty, pixel) in tile.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }

        let cx = left + tx as i64;
        let cy = top + ty as i64;
        if cx < 0 || cy < 0 || cx >= canvas_w || cy >= canvas_h {
            continue;
        }

        let existing = canvas.get_pixel(cx as u32, cy as u32);
        let blended = text::blend_pixels(*existing, *pixel);
        canvas.put_pixel(cx as u32, cy as u32, blended);
    }
}

/// Resample a bitmap to new dimensions. Previews use a faster filter,
/// final output the sharper one.
fn resize_image(
    img: &RgbaImage,
    target_w: u32,
    target_h: u32,
    is_preview: bool,
) -> Result<RgbaImage, RenderError> {
    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| RenderError::ResizeError("Source width is 0".to_string()))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| RenderError::ResizeError("Source height is 0".to_string()))?;
    let dst_width = NonZeroU32::new(target_w)
        .ok_or_else(|| RenderError::ResizeError("Target width is 0".to_string()))?;
    let dst_height = NonZeroU32::new(target_h)
        .ok_or_else(|| RenderError::ResizeError("Target height is 0".to_string()))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| RenderError::ResizeError(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let filter = if is_preview {
        FilterType::Bilinear
    } else {
        FilterType::Lanczos3
    };
    let mut resizer = Resizer::new(ResizeAlg::Convolution(filter));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| RenderError::ResizeError(format!("Resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| RenderError::ResizeError("Failed to create output image buffer".to_string()))
}
