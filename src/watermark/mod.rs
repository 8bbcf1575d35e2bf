//! Watermark rendering.
//!
//! Stamps a tiled, rotated text grid onto images and rasterized PDF
//! pages, entirely on the local machine. The grid geometry, text and
//! colors come from one [`crate::config::WatermarkConfig`] value.
//!
//! # Features
//!
//! - **Tiled text watermarks** with multi-line tiles and per-line centering
//! - **Rigid grid rotation**: the whole grid rotates as one body, not
//!   tile by tile
//! - **Resolution multipliers** for PDF pages (1x preview, >=2x export)
//! - **Four-way output encoding** keyed on the frame's destination
//!
//! # Configuration Example
//!
//! ```yaml
//! words: 仅用于工作认证
//! font_family: Arial
//! font_size: 16
//! color: rgba(0, 0, 0, 0.2)
//! rotate: -15
//! row: 7
//! col: 7
//! ```

pub mod encode;
pub mod error;
pub mod font;
pub mod renderer;
pub mod text;
pub mod tiling;

// Re-export main types for convenience
pub use encode::{encode_frame, select_encoding, to_data_uri, FrameEncoding, FrameFormat};
pub use error::RenderError;
pub use font::{find_any_font, load_font, FONT_OPTIONS};
pub use renderer::{
    decode_image, generate_frame, resolution_scale, stamp, RenderIntent,
};
pub use text::{parse_color, Color};
pub use tiling::{line_metrics, tile_anchors, TileAnchor};

/// One rendered page or image: the encoded bitmap as a base64 data URI
/// plus its pixel dimensions. Frames are produced once per page, carried
/// to the assembler or export helper, and dropped after use.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterFrame {
    pub src: String,
    pub width: u32,
    pub height: u32,
}
