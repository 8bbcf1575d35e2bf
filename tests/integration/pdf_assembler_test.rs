// PDF assembly: frames in, parseable document out.

use lopdf::{Document, Object};
use sukashi::pdf::{assemble, assemble_into, PdfError};
use sukashi::watermark::{encode_frame, to_data_uri, FrameEncoding, FrameFormat, RasterFrame};

fn synthetic_frame(width: u32, height: u32, format: FrameFormat) -> RasterFrame {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90, 255])
    });
    let bytes = encode_frame(
        &img,
        FrameEncoding {
            format,
            quality: 1.0,
        },
    )
    .unwrap();
    RasterFrame {
        src: to_data_uri(&bytes, format),
        width,
        height,
    }
}

fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> (i64, i64) {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    (
        media_box[2].as_i64().unwrap(),
        media_box[3].as_i64().unwrap(),
    )
}

#[test]
fn test_empty_frame_list_yields_zero_page_document() {
    let bytes = assemble(&[]).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 0);
}

#[test]
fn test_assembled_document_parses_with_page_count_and_sizes() {
    let frames = vec![
        synthetic_frame(100, 80, FrameFormat::Jpeg),
        synthetic_frame(50, 120, FrameFormat::Png),
    ];

    let bytes = assemble(&frames).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let pages: Vec<_> = doc.get_pages().into_iter().collect();
    assert_eq!(pages.len(), 2);
    assert_eq!(media_box(&doc, pages[0].1), (100, 80));
    assert_eq!(media_box(&doc, pages[1].1), (50, 120));
}

#[test]
fn test_streaming_variant_sizes_pages_from_recorded_dims() {
    // Recorded dims disagree with the payload to tell the variants apart
    let mut frame = synthetic_frame(30, 30, FrameFormat::Png);
    frame.width = 300;
    frame.height = 200;

    let mut sink = std::io::Cursor::new(Vec::new());
    assemble_into(std::slice::from_ref(&frame), &mut sink).unwrap();

    let doc = Document::load_mem(&sink.into_inner()).unwrap();
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    assert_eq!(media_box(&doc, page_id), (300, 200));

    // The batch variant sizes from the decoded image instead
    let bytes = assemble(&[frame]).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    assert_eq!(media_box(&doc, page_id), (30, 30));
}

#[test]
fn test_jpeg_frames_embed_as_dct_streams() {
    let frame = synthetic_frame(24, 24, FrameFormat::Jpeg);
    let (_, payload) = sukashi::export::decode_data_uri(&frame.src).unwrap();

    let bytes = assemble(&[frame]).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let stream = image_stream(&doc);
    assert_eq!(
        stream.dict.get(b"Filter").unwrap().as_name_str().unwrap(),
        "DCTDecode"
    );
    assert_eq!(stream.content, payload);
}

#[test]
fn test_png_frames_embed_as_flate_device_rgb_streams() {
    let frame = synthetic_frame(24, 24, FrameFormat::Png);

    let bytes = assemble(&[frame]).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let stream = image_stream(&doc);
    assert_eq!(
        stream.dict.get(b"Filter").unwrap().as_name_str().unwrap(),
        "FlateDecode"
    );
    assert_eq!(
        stream
            .dict
            .get(b"ColorSpace")
            .unwrap()
            .as_name_str()
            .unwrap(),
        "DeviceRGB"
    );
    assert_eq!(stream.dict.get(b"BitsPerComponent").unwrap().as_i64().unwrap(), 8);
}

#[test]
fn test_corrupt_frame_is_propagated_not_swallowed() {
    let bad = RasterFrame {
        src: "data:image/jpeg;base64,AAAA".to_string(),
        width: 10,
        height: 10,
    };

    let result = assemble(&[synthetic_frame(8, 8, FrameFormat::Jpeg), bad]);
    assert!(matches!(result, Err(PdfError::EmbedFailed { frame: 1, .. })));
}

fn image_stream(doc: &Document) -> &lopdf::Stream {
    for (_, object) in doc.objects.iter() {
        if let Object::Stream(stream) = object {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(|s| s.as_name_str().ok())
                == Some("Image");
            if is_image {
                return stream;
            }
        }
    }
    panic!("no image XObject in document");
}
