//! Watermark configuration.
//!
//! One value object drives a render: the text and font, the tile grid
//! geometry, the target canvas size, and the export quality. Defaults
//! reproduce the stock configuration; a YAML file and CLI flags layer on
//! top, and the whole object can be persisted for the next run (`store`).

use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod store;

pub use store::StoreError;

// Default values (the stock configuration)
fn default_words() -> String {
    "仅用于工作认证".to_string()
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> f32 {
    16.0
}

fn default_color() -> String {
    "rgba(0, 0, 0, 0.2)".to_string()
}

fn default_rotate() -> f32 {
    -15.0
}

fn default_row() -> u32 {
    7
}

fn default_col() -> u32 {
    7
}

fn default_start_x() -> f32 {
    -100.0
}

fn default_offset_x() -> f32 {
    48.0
}

fn default_offset_y() -> f32 {
    48.0
}

fn default_compression() -> f32 {
    1.0
}

/// Watermark configuration, immutable per render.
///
/// `width`/`height` of 0 mean "use the source image dimensions"; both are
/// ignored for PDF pages, whose size derives from the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Watermark text; may contain `\n` for multi-line tiles
    #[serde(default = "default_words")]
    pub words: String,

    /// Font family name, resolved against installed fonts
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Target canvas width in pixels (0 = source width)
    #[serde(default)]
    pub width: u32,

    /// Target canvas height in pixels (0 = source height)
    #[serde(default)]
    pub height: u32,

    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Text color, `rgba(r, g, b, a)` or `#RGB`/`#RRGGBB`
    #[serde(default = "default_color")]
    pub color: String,

    /// Grid rotation in degrees (positive = clockwise)
    #[serde(default = "default_rotate")]
    pub rotate: f32,

    /// Tile grid rows
    #[serde(default = "default_row")]
    pub row: u32,

    /// Tile grid columns
    #[serde(default = "default_col")]
    pub col: u32,

    /// X position of the first tile; may be negative (off-canvas start)
    #[serde(default = "default_start_x")]
    pub start_x: f32,

    /// Y position of the first tile
    #[serde(default)]
    pub start_y: f32,

    /// Horizontal spacing between tiles
    #[serde(default = "default_offset_x")]
    pub offset_x: f32,

    /// Vertical spacing between tiles
    #[serde(default = "default_offset_y")]
    pub offset_y: f32,

    /// JPEG quality in [0, 1] for raster image export
    #[serde(default = "default_compression")]
    pub compression: f32,

    /// Persist this configuration after a successful run
    #[serde(default)]
    pub save_config: bool,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            words: default_words(),
            font_family: default_font_family(),
            width: 0,
            height: 0,
            font_size: default_font_size(),
            color: default_color(),
            rotate: default_rotate(),
            row: default_row(),
            col: default_col(),
            start_x: default_start_x(),
            start_y: 0.0,
            offset_x: default_offset_x(),
            offset_y: default_offset_y(),
            compression: default_compression(),
            save_config: false,
        }
    }
}

/// One partial configuration layer, as read from a YAML file.
///
/// Only the fields the file actually sets are present; everything else
/// falls through to the base layer (the persisted blob, or the defaults).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    pub words: Option<String>,
    pub font_family: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub font_size: Option<f32>,
    pub color: Option<String>,
    pub rotate: Option<f32>,
    pub row: Option<u32>,
    pub col: Option<u32>,
    pub start_x: Option<f32>,
    pub start_y: Option<f32>,
    pub offset_x: Option<f32>,
    pub offset_y: Option<f32>,
    pub compression: Option<f32>,
    pub save_config: Option<bool>,
}

impl ConfigLayer {
    /// Read a partial layer from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml(&yaml)
    }

    /// Parse a partial layer from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    /// Apply this layer on top of `base`: set fields win, unset fields
    /// keep the base value.
    pub fn apply(self, base: WatermarkConfig) -> WatermarkConfig {
        WatermarkConfig {
            words: self.words.unwrap_or(base.words),
            font_family: self.font_family.unwrap_or(base.font_family),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            font_size: self.font_size.unwrap_or(base.font_size),
            color: self.color.unwrap_or(base.color),
            rotate: self.rotate.unwrap_or(base.rotate),
            row: self.row.unwrap_or(base.row),
            col: self.col.unwrap_or(base.col),
            start_x: self.start_x.unwrap_or(base.start_x),
            start_y: self.start_y.unwrap_or(base.start_y),
            offset_x: self.offset_x.unwrap_or(base.offset_x),
            offset_y: self.offset_y.unwrap_or(base.offset_y),
            compression: self.compression.unwrap_or(base.compression),
            save_config: self.save_config.unwrap_or(base.save_config),
        }
    }
}

impl WatermarkConfig {
    /// Load a configuration from a YAML file. Missing fields take their
    /// defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        Ok(ConfigLayer::from_file(path)?.apply(Self::default()))
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        // Check for NaN/Infinity and valid range
        if !self.compression.is_finite() || !(0.0..=1.0).contains(&self.compression) {
            return Err(format!(
                "compression must be a finite value between 0.0 and 1.0, got {}",
                self.compression
            ));
        }

        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(format!(
                "font_size must be a finite positive value, got {}",
                self.font_size
            ));
        }

        if !self.rotate.is_finite() {
            return Err(format!("rotate must be a finite value, got {}", self.rotate));
        }

        for (name, value) in [
            ("start_x", self.start_x),
            ("start_y", self.start_y),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite value, got {}", name, value));
            }
        }

        crate::watermark::text::parse_color(&self.color)
            .map_err(|e| format!("color is not a valid rgba()/hex value: {}", e))?;

        Ok(())
    }

    /// Whether there is any text to stamp (blank words disable stamping).
    pub fn has_words(&self) -> bool {
        !self.words.trim().is_empty()
    }
}
