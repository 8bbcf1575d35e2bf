//! Run orchestration.
//!
//! Dispatches inputs to the image or PDF path, carries the injected
//! locale bundle for progress reporting, and writes the outputs. A batch
//! attempts every input and fails afterwards if any of them failed.

use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::WatermarkConfig;
use crate::error::AppError;
use crate::export;
use crate::locale::Translations;
use crate::pdf;
use crate::watermark::{renderer, RenderIntent};

/// One watermarking run: the merged configuration, the resolved font, the
/// injected locale bundle, and the fidelity options.
pub struct Pipeline<'a> {
    config: &'a WatermarkConfig,
    font: &'a FontVec,
    translations: &'static Translations,
    preview: bool,
    pixel_ratio: f32,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a WatermarkConfig,
        font: &'a FontVec,
        translations: &'static Translations,
        preview: bool,
        pixel_ratio: f32,
    ) -> Self {
        Self {
            config,
            font,
            translations,
            preview,
            pixel_ratio,
        }
    }

    /// Watermark a single image file and write the result to `output`.
    ///
    /// Frames are JPEG internally; a `.png` output goes through the PNG
    /// re-encode path at the frame's dimensions.
    pub fn process_image(&self, input: &Path, output: &Path) -> Result<(), AppError> {
        let bytes = std::fs::read(input)
            .map_err(|e| AppError::Image(format!("{}: {}", input.display(), e)))?;
        let source = renderer::decode_image(&bytes)?;

        let frame = renderer::generate_frame(
            &source,
            self.config,
            self.font,
            RenderIntent::image(),
            1.0,
        )?;

        if has_extension(output, "png") {
            export::save_png_reencoded(&frame.src, frame.width, frame.height, output)?;
        } else {
            export::save_data_uri(&frame.src, output)?;
        }

        info!(
            input = %input.display(),
            output = %output.display(),
            width = frame.width,
            height = frame.height,
            "Watermarked image"
        );
        Ok(())
    }

    /// Watermark every page of a PDF and write the assembled document.
    ///
    /// The single-input path streams the document into the output file
    /// (pages sized to the recorded frame dimensions); batch members go
    /// through [`process_pdf_batch`](Self::process_pdf_batch) instead.
    pub fn process_pdf(&self, input: &Path, output: &Path) -> Result<(), AppError> {
        let frames = self.rasterize(input)?;

        let mut file = std::fs::File::create(output)
            .map_err(|e| AppError::Pdf(format!("{}: {}", output.display(), e)))?;
        pdf::assemble_into(&frames, &mut file)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            pages = frames.len(),
            "Watermarked PDF document"
        );
        Ok(())
    }

    /// Batch-member PDF path: assemble through the batch variant (pages
    /// sized to the embedded image dimensions) and write the bytes.
    pub fn process_pdf_batch(&self, input: &Path, output: &Path) -> Result<(), AppError> {
        let frames = self.rasterize(input)?;

        let bytes = pdf::assemble(&frames)?;
        export::write_bytes(output, &bytes)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            pages = frames.len(),
            "Watermarked PDF document"
        );
        Ok(())
    }

    fn rasterize(&self, input: &Path) -> Result<Vec<crate::watermark::RasterFrame>, AppError> {
        let intent = if self.preview {
            RenderIntent::pdf_preview()
        } else {
            RenderIntent::pdf_download()
        };

        let processing = self.translations.processing;
        let pages_label = self.translations.pages;

        let frames = pdf::rasterize_pdf(
            input,
            self.config,
            self.font,
            intent,
            self.pixel_ratio,
            |page| {
                // Completion order, not page order
                info!(
                    page = page.page + 1,
                    total = page.total,
                    width = page.width,
                    height = page.height,
                    "{} {}/{} {}",
                    processing,
                    page.page + 1,
                    page.total,
                    pages_label
                );
            },
        )?;

        Ok(frames)
    }

    /// Process a mixed batch of image and PDF inputs.
    ///
    /// Every input is attempted; failures are logged as they happen and
    /// the first error is returned once the batch is done.
    pub fn process_batch(
        &self,
        inputs: &[PathBuf],
        output_dir: Option<&Path>,
    ) -> Result<(), AppError> {
        let mut first_error: Option<AppError> = None;

        for input in inputs {
            let output = batch_output_path(input, output_dir);

            let result = if has_extension(input, "pdf") {
                self.process_pdf_batch(input, &output)
            } else {
                self.process_image(input, &output)
            };

            if let Err(e) = result {
                error!(input = %input.display(), error = %e, "Batch input failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Derived output name for a batch member: `<stem>-watermarked.<ext>`,
/// beside the input or under the output directory.
pub fn batch_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");

    let file_name = format!("{}-watermarked.{}", stem, ext);

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
