// PDF rasterization: render, stamp and collect every page.
//
// A source document is built with the assembler, then fed back through
// the rasterizer. Skips when no font is installed or the pdfium shared
// library cannot be bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use sukashi::config::WatermarkConfig;
use sukashi::pdf::{assemble, rasterize_pdf, PdfError};
use sukashi::watermark::{
    encode_frame, font, to_data_uri, FrameEncoding, FrameFormat, RasterFrame, RenderIntent,
};
use tempfile::TempDir;

fn page_frame(width: u32, height: u32) -> RasterFrame {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([220, 220, 220, 255]));
    let bytes = encode_frame(
        &img,
        FrameEncoding {
            format: FrameFormat::Png,
            quality: 1.0,
        },
    )
    .unwrap();
    RasterFrame {
        src: to_data_uri(&bytes, FrameFormat::Png),
        width,
        height,
    }
}

/// Three-page source document with distinct page sizes so page order is
/// observable in the output.
fn write_source_pdf(dir: &TempDir) -> std::path::PathBuf {
    let frames = vec![
        page_frame(100, 80),
        page_frame(50, 120),
        page_frame(200, 40),
    ];
    let bytes = assemble(&frames).unwrap();

    let path = dir.path().join("source.pdf");
    std::fs::write(&path, bytes).unwrap();
    path
}

fn test_config() -> WatermarkConfig {
    WatermarkConfig {
        words: "draft".to_string(),
        font_size: 10.0,
        row: 2,
        col: 2,
        start_x: 0.0,
        start_y: 0.0,
        offset_x: 20.0,
        offset_y: 20.0,
        ..WatermarkConfig::default()
    }
}

#[test]
fn test_rasterize_produces_one_frame_per_page_in_page_order() {
    let Some(font) = font::find_any_font() else {
        return;
    };

    let dir = TempDir::new().unwrap();
    let source = write_source_pdf(&dir);

    let completions = AtomicUsize::new(0);
    let result = rasterize_pdf(
        &source,
        &test_config(),
        &font,
        RenderIntent::pdf_preview(),
        1.0,
        |page| {
            completions.fetch_add(1, Ordering::SeqCst);
            assert_eq!(page.total, 3);
        },
    );

    let frames = match result {
        Ok(frames) => frames,
        // No pdfium on this machine
        Err(PdfError::LibraryUnavailable { .. }) => return,
        Err(e) => panic!("rasterization failed: {}", e),
    };

    // One frame per page, exactly one completion signal each
    assert_eq!(frames.len(), 3);
    assert_eq!(completions.load(Ordering::SeqCst), 3);

    // Page order survives regardless of completion order; preview renders
    // at 1x, so pixel dims match the page points
    assert_eq!((frames[0].width, frames[0].height), (100, 80));
    assert_eq!((frames[1].width, frames[1].height), (50, 120));
    assert_eq!((frames[2].width, frames[2].height), (200, 40));

    // Preview frames use the fixed-quality JPEG branch
    for frame in &frames {
        assert!(frame.src.starts_with("data:image/jpeg;base64,"));
    }
}

#[test]
fn test_rasterize_final_doubles_resolution() {
    let Some(font) = font::find_any_font() else {
        return;
    };

    let dir = TempDir::new().unwrap();
    let source = write_source_pdf(&dir);

    let result = rasterize_pdf(
        &source,
        &test_config(),
        &font,
        RenderIntent::pdf_download(),
        1.0,
        |_| {},
    );

    let frames = match result {
        Ok(frames) => frames,
        Err(PdfError::LibraryUnavailable { .. }) => return,
        Err(e) => panic!("rasterization failed: {}", e),
    };

    // Final export renders at max(2.0, pixel_ratio) = 2x
    assert_eq!((frames[0].width, frames[0].height), (200, 160));
}

#[test]
fn test_rasterize_reports_open_failure() {
    let Some(font) = font::find_any_font() else {
        return;
    };

    let dir = TempDir::new().unwrap();
    let not_a_pdf = dir.path().join("garbage.pdf");
    std::fs::write(&not_a_pdf, b"not a pdf at all").unwrap();

    let result = rasterize_pdf(
        &not_a_pdf,
        &test_config(),
        &font,
        RenderIntent::pdf_preview(),
        1.0,
        |_| {},
    );

    assert!(matches!(
        result,
        Err(PdfError::LibraryUnavailable { .. }) | Err(PdfError::OpenFailed { .. })
    ));
}
