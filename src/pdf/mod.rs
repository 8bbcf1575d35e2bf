//! PDF rasterization and assembly.
//!
//! A document goes through two halves: the rasterizer renders every page
//! to a bitmap via the pdfium library and stamps the watermark on each;
//! the assembler merges the stamped frames back into a single output PDF.
//! Frames travel between the two as an explicit page-ordered collection
//! owned by the batch, never shared state.

pub mod assembler;
pub mod error;
pub mod rasterizer;

pub use assembler::{assemble, assemble_into};
pub use error::PdfError;
pub use rasterizer::{rasterize_pdf, PageRendered};
