//! Persisted preference blob.
//!
//! When `save_config` is set, the merged configuration is written as JSON
//! under the well-known `watermark-config` key so the next run starts from
//! it. The blob lives in the user config directory (`$XDG_CONFIG_HOME`,
//! falling back to `~/.config`, then the working directory).

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::WatermarkConfig;

/// Well-known name of the persisted configuration blob.
pub const STORAGE_KEY: &str = "watermark-config";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Resolve the default path of the persisted blob.
pub fn default_path() -> PathBuf {
    let file_name = format!("{}.json", STORAGE_KEY);

    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join(file_name);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return PathBuf::from(home).join(".config").join(file_name);
        }
    }

    PathBuf::from(file_name)
}

/// Load the persisted configuration, if one exists.
///
/// A missing file is `Ok(None)`; an unreadable or corrupt file is an error
/// the caller may choose to log and ignore.
pub fn load(path: &Path) -> Result<Option<WatermarkConfig>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&json)?;
    Ok(Some(config))
}

/// Persist the configuration to `path`, creating parent directories as
/// needed.
pub fn save(config: &WatermarkConfig, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}
