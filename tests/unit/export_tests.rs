// Export helper tests through the public crate API

use sukashi::export::{decode_data_uri, save_data_uri, save_png_reencoded, ExportError};
use sukashi::watermark::{to_data_uri, FrameFormat};
use tempfile::TempDir;

fn encoded_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 120, 255]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

#[test]
fn test_data_uri_codec_inverts_for_both_content_types() {
    let payload = encoded_png(6, 4);

    let png_uri = to_data_uri(&payload, FrameFormat::Png);
    let (content_type, bytes) = decode_data_uri(&png_uri).unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(bytes, payload);

    let jpeg_uri = to_data_uri(&payload, FrameFormat::Jpeg);
    let (content_type, bytes) = decode_data_uri(&jpeg_uri).unwrap();
    assert_eq!(content_type, "image/jpeg");
    assert_eq!(bytes, payload);
}

#[test]
fn test_malformed_uris_report_typed_errors() {
    assert!(matches!(
        decode_data_uri("nonsense"),
        Err(ExportError::InvalidDataUri(_))
    ));
    assert!(matches!(
        decode_data_uri("data:;base64,AAAA"),
        Err(ExportError::InvalidDataUri(_))
    ));
    assert!(matches!(
        decode_data_uri("data:image/png;base64,!!!"),
        Err(ExportError::DecodeFailed(_))
    ));
}

#[test]
fn test_save_data_uri_round_trips_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.png");

    let payload = encoded_png(5, 5);
    let uri = to_data_uri(&payload, FrameFormat::Png);
    save_data_uri(&uri, &path).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), payload);
}

#[test]
fn test_png_reencode_honors_requested_dimensions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resized.png");

    let uri = to_data_uri(&encoded_png(10, 10), FrameFormat::Png);
    save_png_reencoded(&uri, 20, 30, &path).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (20, 30));

    // PNG magic bytes regardless of the input encoding
    let written = std::fs::read(&path).unwrap();
    assert_eq!(&written[0..4], &[0x89, 0x50, 0x4E, 0x47]);
}
