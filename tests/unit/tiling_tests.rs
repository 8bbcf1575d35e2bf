// Tile placement tests through the public crate API
//
// These pin the exact formulas the visual layout depends on: the
// single-line arithmetic progression and the multi-line line-advance
// compounding with longest-line centering.

use sukashi::config::WatermarkConfig;
use sukashi::watermark::tile_anchors;

fn base_config(words: &str) -> WatermarkConfig {
    WatermarkConfig {
        words: words.to_string(),
        font_size: 20.0,
        row: 2,
        col: 3,
        start_x: 5.0,
        start_y: 7.0,
        offset_x: 30.0,
        offset_y: 40.0,
        ..WatermarkConfig::default()
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}

// x_i = start_x + i * (len(words) * font_size + offset_x)
// y_j = start_y + j * (offset_y + font_size)
#[test]
fn test_single_line_arithmetic_progression() {
    let cfg = base_config("abc"); // len 3
    let anchors = tile_anchors(&cfg);
    assert_eq!(anchors.len(), 6);

    let stride_x = 3.0 * 20.0 + 30.0; // 90
    let stride_y = 40.0 + 20.0; // 60

    for j in 0..2u32 {
        for i in 0..3u32 {
            let anchor = anchors[(j * 3 + i) as usize];
            assert_close(anchor.x, 5.0 + i as f32 * stride_x);
            assert_close(anchor.y, 7.0 + j as f32 * stride_y);
            assert_eq!(anchor.line, 0);
        }
    }
}

// y = start_y + j * offset_y + font_size * 1.3 * (k + n * j)
#[test]
fn test_multi_line_compounding_rule() {
    let mut cfg = base_config("aa\nbbbb\nc"); // n = 3, max_len = 4
    cfg.col = 1;

    let anchors = tile_anchors(&cfg);
    assert_eq!(anchors.len(), 6);

    let advance = 20.0 * 1.3;
    for j in 0..2u32 {
        for k in 0..3usize {
            let anchor = anchors[j as usize * 3 + k];
            let expected_y = 7.0 + j as f32 * 40.0 + advance * (k as f32 + 3.0 * j as f32);
            assert_close(anchor.y, expected_y);
            assert_eq!(anchor.line, k);
        }
    }
}

// x shift = (max_len - len_k) / 2 * font_size
#[test]
fn test_multi_line_centering_shift() {
    let mut cfg = base_config("aa\nbbbb\nc");
    cfg.row = 1;
    cfg.col = 1;

    let anchors = tile_anchors(&cfg);
    assert_close(anchors[0].x, 5.0 + (4.0 - 2.0) / 2.0 * 20.0); // "aa"
    assert_close(anchors[1].x, 5.0); // "bbbb", the longest line
    assert_close(anchors[2].x, 5.0 + (4.0 - 1.0) / 2.0 * 20.0); // "c"
}

#[test]
fn test_multi_line_stride_uses_longest_line() {
    let mut cfg = base_config("aa\nbbbb");
    cfg.row = 1;
    cfg.col = 2;

    let anchors = tile_anchors(&cfg);
    let stride_x = 4.0 * 20.0 + 30.0;
    assert_close(anchors[2].x - anchors[0].x, stride_x);
    assert_close(anchors[3].x - anchors[1].x, stride_x);
}

#[test]
fn test_empty_grid_produces_no_anchors() {
    let mut cfg = base_config("words");
    cfg.row = 0;
    assert!(tile_anchors(&cfg).is_empty());

    let mut cfg = base_config("words");
    cfg.col = 0;
    assert!(tile_anchors(&cfg).is_empty());
}

#[test]
fn test_cjk_text_counts_characters() {
    let mut cfg = base_config("仅用于工作认证"); // 7 chars
    cfg.row = 1;
    cfg.col = 2;

    let anchors = tile_anchors(&cfg);
    assert_close(anchors[1].x - anchors[0].x, 7.0 * 20.0 + 30.0);
}
