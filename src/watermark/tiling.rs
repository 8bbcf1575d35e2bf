//! Tile anchor calculation for the watermark grid.
//!
//! Anchors are computed in pre-rotation canvas space: the whole grid is
//! rotated rigidly afterwards, so these formulas never see the angle. The
//! anchor of a tile line is its text baseline left point, the same
//! convention a 2D canvas uses for text drawing.
//!
//! Placement rules:
//!
//! - Single-line text: tile `(j, i)` (row-major) anchors at
//!   `x = start_x + i × (len × font_size + offset_x)`,
//!   `y = start_y + j × (offset_y + font_size)`,
//!   where `len` is the character count of the text.
//! - Multi-line text: the longest line's character count sets the tile
//!   width so all lines stay aligned; line `k` of tile `(j, i)` anchors at
//!   `x = start_x + i × (max_len × font_size + offset_x)
//!        + (max_len − len_k) / 2 × font_size`,
//!   `y = start_y + j × offset_y + font_size × 1.3 × (k + n × j)`,
//!   where `n` is the line count. The `font_size × 1.3` line advance
//!   compounds across both the line index and the row index; this exact
//!   compounding defines the visual layout and must not be re-derived.

use crate::config::WatermarkConfig;

/// Baseline-left anchor of one text line of one tile, pre-rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAnchor {
    pub x: f32,
    pub y: f32,
    /// Index into the tile's text lines (0 for single-line text).
    pub line: usize,
}

impl TileAnchor {
    pub fn new(x: f32, y: f32, line: usize) -> Self {
        Self { x, y, line }
    }
}

/// Split the watermark text into lines and report the longest line's
/// character count.
pub fn line_metrics(words: &str) -> (Vec<&str>, usize) {
    let lines: Vec<&str> = words.split('\n').collect();
    let max_len = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (lines, max_len)
}

// Grid cells times lines per cell. row * col alone can exceed u32 for
// degenerate configs, so widen before multiplying.
fn anchor_capacity(row: u32, col: u32, lines: usize) -> usize {
    (row as usize)
        .saturating_mul(col as usize)
        .saturating_mul(lines)
}

/// Compute every tile line anchor for the configured grid, row-major
/// (rows outer, columns inner), lines in order within each tile.
///
/// `row == 0` or `col == 0` yields no anchors.
pub fn tile_anchors(config: &WatermarkConfig) -> Vec<TileAnchor> {
    if config.row == 0 || config.col == 0 {
        return Vec::new();
    }

    let font_size = config.font_size;
    let (lines, max_len) = line_metrics(&config.words);

    let mut anchors = Vec::with_capacity(anchor_capacity(config.row, config.col, lines.len()));

    if lines.len() > 1 {
        let n = lines.len();
        let stride_x = max_len as f32 * font_size + config.offset_x;

        for j in 0..config.row {
            for i in 0..config.col {
                for (k, line) in lines.iter().enumerate() {
                    let len_k = line.chars().count();
                    let centering = (max_len as f32 - len_k as f32) / 2.0 * font_size;
                    let x = config.start_x + i as f32 * stride_x + centering;
                    let y = config.start_y
                        + j as f32 * config.offset_y
                        + font_size * 1.3 * (k as f32 + n as f32 * j as f32);
                    anchors.push(TileAnchor::new(x, y, k));
                }
            }
        }
    } else {
        let len = config.words.chars().count();
        let stride_x = len as f32 * font_size + config.offset_x;
        let stride_y = config.offset_y + font_size;

        for j in 0..config.row {
            for i in 0..config.col {
                let x = config.start_x + i as f32 * stride_x;
                let y = config.start_y + j as f32 * stride_y;
                anchors.push(TileAnchor::new(x, y, 0));
            }
        }
    }

    anchors
}
