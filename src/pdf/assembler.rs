//! PDF assembly from watermarked raster frames.
//!
//! Builds the output document by hand: one full-page image XObject per
//! frame, a `q cm Do Q` content stream, a Pages tree and a Catalog, saved
//! with a classic cross-reference table (no object streams, for broad
//! reader compatibility) and no default blank page.
//!
//! Two variants:
//!
//! - [`assemble_into`] (streaming): pages sized to each frame's *recorded*
//!   dimensions, the document written into the caller's sink.
//! - [`assemble`] (batch, preferred): pages sized to the *embedded image's
//!   decoded* dimensions, the serialized document returned as bytes.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Document, Object, Stream};
use std::io::{Cursor, Write};
use tracing::{debug, error, info};

use super::PdfError;
use crate::export;
use crate::watermark::RasterFrame;

/// Merge frames into a PDF document and return the serialized bytes.
///
/// Each page is sized exactly to its embedded image's decoded pixel
/// dimensions. An empty frame list yields a valid zero-page document.
pub fn assemble(frames: &[RasterFrame]) -> Result<Vec<u8>, PdfError> {
    let mut doc = build_document(frames, PageSizing::DecodedImage)?;

    let mut buffer = Cursor::new(Vec::new());
    doc.save_to(&mut buffer).map_err(|e| {
        error!(error = %e, "PDF serialization failed");
        PdfError::save_failed(e.to_string())
    })?;

    let bytes = buffer.into_inner();
    info!(pages = frames.len(), size = bytes.len(), "Assembled PDF document");
    Ok(bytes)
}

/// Merge frames into a PDF document written into `writer`.
///
/// Each page is sized exactly to its frame's recorded `width`/`height`.
pub fn assemble_into<W: Write>(frames: &[RasterFrame], writer: &mut W) -> Result<(), PdfError> {
    let mut doc = build_document(frames, PageSizing::RecordedFrame)?;

    doc.save_to(writer).map_err(|e| {
        error!(error = %e, "PDF serialization failed");
        PdfError::save_failed(e.to_string())
    })?;

    info!(pages = frames.len(), "Assembled PDF document into sink");
    Ok(())
}

/// Which dimensions size a page.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PageSizing {
    /// The frame's recorded `width`/`height` (streaming variant).
    RecordedFrame,
    /// The embedded image's decoded dimensions (batch variant).
    DecodedImage,
}

fn build_document(frames: &[RasterFrame], sizing: PageSizing) -> Result<Document, PdfError> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let mut page_ids: Vec<Object> = Vec::new();

    for (index, frame) in frames.iter().enumerate() {
        let embedded = embed_frame(frame, index)?;
        let (page_w, page_h) = match sizing {
            PageSizing::RecordedFrame => (frame.width, frame.height),
            PageSizing::DecodedImage => (embedded.width, embedded.height),
        };

        let img_id = doc.add_object(embedded.stream);

        let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ\n", page_w, page_h);
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let page = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), (page_w as i64).into(), (page_h as i64).into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(img_id),
                },
            },
        };
        let page_id = doc.add_object(page);
        page_ids.push(Object::Reference(page_id));

        debug!(frame = index, width = page_w, height = page_h, "Added page");
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids,
        "Count" => frames.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    };
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}

struct EmbeddedImage {
    stream: Stream,
    width: u32,
    height: u32,
}

/// Decode a frame's data URI and build its image XObject stream.
///
/// JPEG payloads pass through as `DCTDecode` streams without re-encoding;
/// anything else decodes to raw 8-bit RGB behind `FlateDecode`.
fn embed_frame(frame: &RasterFrame, index: usize) -> Result<EmbeddedImage, PdfError> {
    let (content_type, bytes) = export::decode_data_uri(&frame.src)
        .map_err(|e| PdfError::embed_failed(index, e.to_string()))?;

    if content_type == "image/jpeg" {
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| PdfError::embed_failed(index, e.to_string()))?
            .into_dimensions()
            .map_err(|e| PdfError::embed_failed(index, e.to_string()))?;

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        };

        return Ok(EmbeddedImage {
            stream: Stream::new(dict, bytes),
            width,
            height,
        });
    }

    let decoded = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| PdfError::embed_failed(index, e.to_string()))?
        .decode()
        .map_err(|e| PdfError::embed_failed(index, e.to_string()))?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&rgb.into_raw())
        .map_err(|e| PdfError::embed_failed(index, e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| PdfError::embed_failed(index, e.to_string()))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8_i64,
        "Filter" => "FlateDecode",
    };

    Ok(EmbeddedImage {
        stream: Stream::new(dict, compressed),
        width,
        height,
    })
}
