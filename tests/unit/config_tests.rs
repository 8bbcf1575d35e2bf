// Configuration tests through the public crate API

use sukashi::config::{store, ConfigLayer, WatermarkConfig};
use tempfile::TempDir;

#[test]
fn test_defaults_match_stock_configuration() {
    let config = WatermarkConfig::default();
    assert_eq!(config.words, "仅用于工作认证");
    assert_eq!(config.font_family, "Arial");
    assert_eq!(config.font_size, 16.0);
    assert_eq!(config.color, "rgba(0, 0, 0, 0.2)");
    assert_eq!(config.rotate, -15.0);
    assert_eq!((config.row, config.col), (7, 7));
    assert_eq!((config.start_x, config.start_y), (-100.0, 0.0));
    assert_eq!((config.offset_x, config.offset_y), (48.0, 48.0));
    assert_eq!((config.width, config.height), (0, 0));
    assert_eq!(config.compression, 1.0);
    assert!(!config.save_config);
}

#[test]
fn test_config_loads_from_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("watermark.yaml");
    std::fs::write(
        &path,
        r#"
words: "DRAFT"
rotate: -30
row: 4
col: 5
compression: 0.6
"#,
    )
    .unwrap();

    let config = WatermarkConfig::from_file(&path).unwrap();
    assert_eq!(config.words, "DRAFT");
    assert_eq!(config.rotate, -30.0);
    assert_eq!((config.row, config.col), (4, 5));
    assert_eq!(config.compression, 0.6);
    // Unset fields keep their defaults
    assert_eq!(config.font_size, 16.0);
}

#[test]
fn test_config_missing_file_is_error() {
    assert!(WatermarkConfig::from_file("/nonexistent/watermark.yaml").is_err());
}

#[test]
fn test_validation_bounds() {
    let mut config = WatermarkConfig::default();
    assert!(config.validate().is_ok());

    config.compression = 1.01;
    assert!(config.validate().is_err());

    config.compression = 1.0;
    config.font_size = -2.0;
    assert!(config.validate().is_err());

    config.font_size = 16.0;
    config.color = "chartreuse".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_multi_line_words_round_trip_through_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("watermark-config.json");

    let mut config = WatermarkConfig::default();
    config.words = "top secret\ndo not share".to_string();
    config.save_config = true;

    store::save(&config, &path).unwrap();
    let loaded = store::load(&path).unwrap().expect("blob should exist");
    assert_eq!(loaded, config);
    assert_eq!(loaded.words.lines().count(), 2);
}

// Three-layer merge: defaults -> persisted blob -> YAML file. A field the
// file leaves unset must come from the blob, not the factory default.
#[test]
fn test_yaml_layer_applies_on_top_of_persisted_blob() {
    let dir = TempDir::new().unwrap();
    let blob_path = dir.path().join("watermark-config.json");
    let yaml_path = dir.path().join("override.yaml");

    let mut persisted = WatermarkConfig::default();
    persisted.words = "X".to_string();
    persisted.rotate = -30.0;
    store::save(&persisted, &blob_path).unwrap();

    std::fs::write(&yaml_path, "words: \"Y\"\n").unwrap();

    let base = store::load(&blob_path).unwrap().expect("blob should exist");
    let merged = ConfigLayer::from_file(&yaml_path).unwrap().apply(base);

    assert_eq!(merged.words, "Y");
    assert_eq!(merged.rotate, -30.0, "persisted rotate must survive the file layer");
    // Fields neither layer touched still carry the defaults
    assert_eq!(merged.row, 7);
}

#[test]
fn test_storage_key_names_the_blob() {
    assert_eq!(store::STORAGE_KEY, "watermark-config");
    assert!(store::default_path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("watermark-config"));
}
