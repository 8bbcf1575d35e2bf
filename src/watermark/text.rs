//! Text rasterization for watermark tiles.
//!
//! Renders one line of text to a transparent RGBA bitmap (baseline at the
//! font ascent) and rotates tile bitmaps with canvas rotation semantics:
//! the angle is applied about the drawing origin, y-down, positive =
//! clockwise, and the rotated origin offset is reported so anchors mapped
//! through the same rotation land exactly where a 2D canvas would put them.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use regex::Regex;
use std::sync::OnceLock;

use super::RenderError;

static RGBA_PATTERN: OnceLock<Regex> = OnceLock::new();

fn rgba_pattern() -> &'static Regex {
    RGBA_PATTERN.get_or_init(|| {
        Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$")
            .expect("rgba pattern is valid")
    })
}

/// RGBA color for watermark text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in [0.0, 1.0].
    pub a: f32,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub const fn white() -> Self {
        Self::new(255, 255, 255, 1.0)
    }

    /// Opaque black.
    pub const fn black() -> Self {
        Self::new(0, 0, 0, 1.0)
    }
}

/// Parse a color string into RGBA components.
///
/// Supports the CSS forms the configuration uses: `rgba(r, g, b, a)`,
/// `rgb(r, g, b)`, and `#RGB` / `#RRGGBB` hex (alpha 1.0).
pub fn parse_color(value: &str) -> Result<Color, RenderError> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let captures = rgba_pattern().captures(value).ok_or_else(|| {
        RenderError::ConfigError(format!(
            "Color must be rgba(r, g, b, a), rgb(r, g, b) or #hex, got '{}'",
            value
        ))
    })?;

    let channel = |idx: usize| -> Result<u8, RenderError> {
        captures[idx].parse::<u8>().map_err(|_| {
            RenderError::ConfigError(format!(
                "Color channel out of range in '{}': {}",
                value, &captures[idx]
            ))
        })
    };

    let r = channel(1)?;
    let g = channel(2)?;
    let b = channel(3)?;

    let a = match captures.get(4) {
        Some(m) => {
            let a: f32 = m.as_str().parse().map_err(|_| {
                RenderError::ConfigError(format!("Invalid alpha in '{}'", value))
            })?;
            if !a.is_finite() || !(0.0..=1.0).contains(&a) {
                return Err(RenderError::ConfigError(format!(
                    "Alpha must be between 0.0 and 1.0, got {}",
                    a
                )));
            }
            a
        }
        None => 1.0,
    };

    Ok(Color::new(r, g, b, a))
}

fn parse_hex(hex: &str) -> Result<Color, RenderError> {
    let digit = |s: &str| -> Result<u8, RenderError> {
        u8::from_str_radix(s, 16)
            .map_err(|_| RenderError::ConfigError(format!("Invalid hex digit '{}'", s)))
    };

    match hex.len() {
        3 => {
            // #RGB - each digit doubled: 0xF -> 0xFF
            let r = digit(&hex[0..1])?;
            let g = digit(&hex[1..2])?;
            let b = digit(&hex[2..3])?;
            Ok(Color::new(r * 17, g * 17, b * 17, 1.0))
        }
        6 => {
            let r = digit(&hex[0..2])?;
            let g = digit(&hex[2..4])?;
            let b = digit(&hex[4..6])?;
            Ok(Color::new(r, g, b, 1.0))
        }
        _ => Err(RenderError::ConfigError(format!(
            "Hex color must be #RGB or #RRGGBB, got {} digits",
            hex.len()
        ))),
    }
}

/// Measure one line of text: kerned advance width and line height in
/// pixels, with a small padding so anti-aliased edges fit.
pub fn measure_line(font: &FontVec, text: &str, font_size: f32) -> (u32, u32) {
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled_font.height();

    let padding = 2;
    (
        width.ceil() as u32 + padding,
        height.ceil() as u32 + padding,
    )
}

/// One rasterized text line.
///
/// The baseline sits `ascent` pixels below the bitmap top, so drawing the
/// line at baseline point `(x, y)` means placing the bitmap top-left at
/// `(x, y - ascent)`.
pub struct LineRaster {
    pub image: RgbaImage,
    pub ascent: f32,
}

/// Rasterize one line of text to a transparent RGBA bitmap.
pub fn render_line(
    font: &FontVec,
    text: &str,
    font_size: f32,
    color: Color,
) -> Result<LineRaster, RenderError> {
    if text.is_empty() {
        return Err(RenderError::ConfigError(
            "Cannot render empty text".to_string(),
        ));
    }

    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_line(font, text, font_size);
    let mut image = RgbaImage::new(width.max(1), height.max(1));

    let alpha = (color.a.clamp(0.0, 1.0) * 255.0) as u8;
    let ascent = scaled_font.ascent();

    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, ascent));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
                    let pixel_alpha = (coverage * alpha as f32) as u8;
                    let pixel = Rgba([color.r, color.g, color.b, pixel_alpha]);

                    // Blend with existing pixel (for anti-aliasing)
                    let existing = image.get_pixel(x as u32, y as u32);
                    let blended = blend_pixels(*existing, pixel);
                    image.put_pixel(x as u32, y as u32, blended);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Ok(LineRaster { image, ascent })
}

/// Blend two RGBA pixels using source-over alpha compositing.
pub(crate) fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0) as u8,
    ])
}

/// Rotate a tile bitmap about its top-left corner with canvas semantics
/// (y-down, positive degrees clockwise).
///
/// Returns the rotated bitmap and the `(min_x, min_y)` offset of its
/// bounding box in rotated space: a source point `p` lands at
/// `R·p − (min_x, min_y)` inside the returned bitmap, so the caller can
/// composite it at `R·anchor + (min_x, min_y)` on the target canvas.
pub fn rotate_with_origin(image: &RgbaImage, degrees: f32) -> (RgbaImage, (f32, f32)) {
    if degrees % 360.0 == 0.0 {
        return (image.clone(), (0.0, 0.0));
    }

    let radians = degrees.to_radians();
    let cos = radians.cos();
    let sin = radians.sin();

    let src_w = image.width() as f32;
    let src_h = image.height() as f32;

    // Forward map: (x, y) -> (x cos - y sin, x sin + y cos)
    let corners = [
        (0.0, 0.0),
        (src_w, 0.0),
        (0.0, src_h),
        (src_w, src_h),
    ];

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for (x, y) in corners {
        let rx = x * cos - y * sin;
        let ry = x * sin + y * cos;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }

    let dst_w = ((max_x - min_x).ceil() as u32).max(1);
    let dst_h = ((max_y - min_y).ceil() as u32).max(1);

    let mut rotated = RgbaImage::new(dst_w, dst_h);

    let last_x = image.width() - 1;
    let last_y = image.height() - 1;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            // Destination pixel center in rotated space
            let rx = dx as f32 + 0.5 + min_x;
            let ry = dy as f32 + 0.5 + min_y;

            // Inverse rotation back to source space
            let sx = rx * cos + ry * sin;
            let sy = -rx * sin + ry * cos;

            if sx < 0.0 || sx > src_w || sy < 0.0 || sy > src_h {
                continue;
            }

            // Bilinear interpolation between pixel centers, edges clamped
            let u = sx - 0.5;
            let v = sy - 0.5;
            let x0 = u.floor();
            let y0 = v.floor();
            let fx = u - x0;
            let fy = v - y0;

            let xi = |p: f32| -> u32 { (p.max(0.0) as u32).min(last_x) };
            let yi = |p: f32| -> u32 { (p.max(0.0) as u32).min(last_y) };

            let p00 = image.get_pixel(xi(x0), yi(y0));
            let p10 = image.get_pixel(xi(x0 + 1.0), yi(y0));
            let p01 = image.get_pixel(xi(x0), yi(y0 + 1.0));
            let p11 = image.get_pixel(xi(x0 + 1.0), yi(y0 + 1.0));

            let interpolate = |c: usize| -> u8 {
                let v00 = p00[c] as f32;
                let v10 = p10[c] as f32;
                let v01 = p01[c] as f32;
                let v11 = p11[c] as f32;

                let value = v00 * (1.0 - fx) * (1.0 - fy)
                    + v10 * fx * (1.0 - fy)
                    + v01 * (1.0 - fx) * fy
                    + v11 * fx * fy;

                value.clamp(0.0, 255.0) as u8
            };

            rotated.put_pixel(
                dx,
                dy,
                Rgba([
                    interpolate(0),
                    interpolate(1),
                    interpolate(2),
                    interpolate(3),
                ]),
            );
        }
    }

    (rotated, (min_x, min_y))
}
