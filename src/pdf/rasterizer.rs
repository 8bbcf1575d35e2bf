//! PDF page rasterization.
//!
//! Renders every page of an input document to a bitmap via pdfium, stamps
//! the watermark on each, and returns the frames in page order. Page
//! rasterization is strictly sequential (pdfium is not thread-safe);
//! stamping and encoding of already-rendered pages fans out on the rayon
//! pool, so the per-page callback fires in completion order while the
//! returned collection stays page-ordered.

use ab_glyph::FontVec;
use image::RgbaImage;
use pdfium_render::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use super::PdfError;
use crate::config::WatermarkConfig;
use crate::watermark::{renderer, RasterFrame, RenderIntent};

/// Pdfium search locations, most specific first.
fn pdfium_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("libs"));
            paths.push(exe_dir.to_path_buf());
        }
    }

    paths.push(PathBuf::from("libs"));
    paths.push(PathBuf::from("./"));

    paths
}

/// Bind the pdfium library, walking the search paths before falling back
/// to the system library.
fn bind_pdfium() -> Result<Pdfium, PdfError> {
    let search_paths = pdfium_search_paths();

    for path in &search_paths {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(path);
        debug!(path = %lib_path.display(), "Trying pdfium library");

        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            info!(path = %path.display(), "Loaded pdfium library");
            return Ok(Pdfium::new(bindings));
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| {
            PdfError::library_unavailable(format!(
                "{} (searched {} locations and the system library)",
                e,
                search_paths.len()
            ))
        })
}

/// Completion report for one page, delivered as soon as that page's
/// stamped frame is ready. With parallel stamping the reports arrive in
/// completion order, not page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRendered {
    /// Zero-based page index.
    pub page: u16,
    pub total: u16,
    /// Pixel dimensions of this page's frame.
    pub width: u32,
    pub height: u32,
}

/// Rasterize and watermark every page of a PDF.
///
/// `intent` selects the preview or final path: previews render at 1x and
/// encode as JPEG 0.8; final renders use `max(2.0, pixel_ratio)` and the
/// download/reassembly encodings. `on_page` fires once per completed page;
/// the returned frames are in page order regardless of completion order.
/// The first page that fails to render or stamp fails the whole call.
pub fn rasterize_pdf<F>(
    path: &Path,
    config: &WatermarkConfig,
    font: &FontVec,
    intent: RenderIntent,
    pixel_ratio: f32,
    mut on_page: F,
) -> Result<Vec<RasterFrame>, PdfError>
where
    F: FnMut(PageRendered) + Send,
{
    let scale = renderer::resolution_scale(intent, pixel_ratio);
    let pages = render_pages(path, scale)?;
    let total = pages.len() as u16;

    info!(
        path = %path.display(),
        pages = total,
        scale,
        preview = intent.is_preview,
        "Rasterized PDF document"
    );

    let callback = Mutex::new(&mut on_page);

    pages
        .into_par_iter()
        .enumerate()
        .map(|(index, bitmap)| {
            let frame = renderer::generate_frame(&bitmap, config, font, intent, scale)
                .map_err(|e| PdfError::stamp_failed(index as u16, e.to_string()))?;

            if let Ok(mut report) = callback.lock() {
                report(PageRendered {
                    page: index as u16,
                    total,
                    width: frame.width,
                    height: frame.height,
                });
            }

            Ok(frame)
        })
        .collect()
}

/// Render every page of the document to a bitmap at `page_points × scale`.
///
/// The whole file is loaded up front (watermarking touches every page
/// anyway) and pages render sequentially on the calling thread.
fn render_pages(path: &Path, scale: f32) -> Result<Vec<RgbaImage>, PdfError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| PdfError::open_failed(path.display().to_string(), e.to_string()))?;

    let page_count = document.pages().len();
    let mut bitmaps = Vec::with_capacity(page_count as usize);

    for index in 0..page_count {
        let page = document
            .pages()
            .get(index)
            .map_err(|e| PdfError::render_failed(index, e.to_string()))?;

        // PDF points assume 72 DPI; the scale multiplies straight into
        // the pixel dimensions.
        let target_width = (page.width().value * scale) as i32;
        let target_height = (page.height().value * scale) as i32;

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_target_height(target_height);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| PdfError::render_failed(index, e.to_string()))?;

        let rgba = bitmap
            .as_image()
            .as_rgba8()
            .ok_or_else(|| {
                PdfError::render_failed(index, "bitmap is not RGBA".to_string())
            })?
            .clone();

        debug!(
            page = index,
            width = rgba.width(),
            height = rgba.height(),
            "Rendered page bitmap"
        );

        bitmaps.push(rgba);
    }

    Ok(bitmaps)
}
