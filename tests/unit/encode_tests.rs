// Four-way format/quality selection tests through the public crate API

use rstest::rstest;
use sukashi::watermark::{select_encoding, FrameFormat};

// is_pdf=false => always JPEG at the configured quality
// is_pdf, for_download => JPEG at 1.0
// is_pdf, is_preview   => JPEG at 0.8
// is_pdf otherwise     => PNG
#[rstest]
#[case(false, false, false, 0.45, FrameFormat::Jpeg, 0.45)]
#[case(false, true, false, 0.45, FrameFormat::Jpeg, 0.45)]
#[case(false, false, true, 0.45, FrameFormat::Jpeg, 0.45)]
#[case(true, false, true, 0.45, FrameFormat::Jpeg, 1.0)]
#[case(true, true, true, 0.45, FrameFormat::Jpeg, 1.0)]
#[case(true, true, false, 0.45, FrameFormat::Jpeg, 0.8)]
#[case(true, false, false, 0.45, FrameFormat::Png, 1.0)]
fn test_encoding_selection(
    #[case] is_pdf: bool,
    #[case] is_preview: bool,
    #[case] for_download: bool,
    #[case] compression: f32,
    #[case] expected_format: FrameFormat,
    #[case] expected_quality: f32,
) {
    let encoding = select_encoding(is_pdf, is_preview, for_download, compression);
    assert_eq!(encoding.format, expected_format);
    assert!(
        (encoding.quality - expected_quality).abs() < f32::EPSILON,
        "expected quality {}, got {}",
        expected_quality,
        encoding.quality
    );
}

#[test]
fn test_image_mode_tracks_configured_compression() {
    for compression in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let encoding = select_encoding(false, false, false, compression);
        assert_eq!(encoding.format, FrameFormat::Jpeg);
        assert!((encoding.quality - compression).abs() < f32::EPSILON);
    }
}

#[test]
fn test_mime_types() {
    assert_eq!(FrameFormat::Jpeg.mime_type(), "image/jpeg");
    assert_eq!(FrameFormat::Png.mime_type(), "image/png");
}
