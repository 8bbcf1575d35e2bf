// Sukashi watermarking library
// Tiled rotated text watermarks for images and PDF documents

pub mod config;
pub mod error;
pub mod export;
pub mod locale;
pub mod logging;
pub mod pdf;
pub mod pipeline;
pub mod watermark;
