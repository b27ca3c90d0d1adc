//! Storage configuration module.
//!
//! Handles loading, validating, and merging a `config.toml` file. Stock
//! defaults are the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_path = "www/data"          # Derivative tree root
//! orig_path = "www/data"          # Original tree root (may equal data_path)
//! data_dir = "data"               # Public base directory used in links
//! default_transform = "fit"       # Resize flag used when a request names none
//! noimage_identifier = "noimage/03/no-image.png"
//! friendly_url = false
//! modern_format = "webp"          # Target of JPEG/PNG format conversion
//!
//! [quality]
//! jpeg = 85                       # 0-100
//! png = 6                         # 0-9 compression level
//! webp = 80                       # 0-100
//! avif = 30                       # 0-100
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! orig_path = "storage/originals"
//!
//! [quality]
//! jpeg = 70
//! ```
//!
//! Unknown keys are rejected to catch typos early. Configuration is loaded
//! once and handed to [`ImageStorage::new`](crate::ImageStorage::new).

use crate::identifier::{ImageName, ResizeFlags};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Storage configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Root of the derivative tree.
    pub data_path: PathBuf,
    /// Root of the original tree. Equal to `data_path` in the common setup.
    pub orig_path: PathBuf,
    /// Public directory token prefixed to links.
    pub data_dir: String,
    /// Resize flag used when a request names none.
    pub default_transform: String,
    /// Identifier of the placeholder image.
    pub noimage_identifier: String,
    /// Keep the original file name in links and pass the transform as a
    /// query parameter.
    pub friendly_url: bool,
    /// Extension JPEG and PNG sources are converted to when a request
    /// prefers a modern format.
    pub modern_format: String,
    /// Default quality per output format.
    pub quality: QualityConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("www/data"),
            orig_path: PathBuf::from("www/data"),
            data_dir: "data".to_string(),
            default_transform: "fit".to_string(),
            noimage_identifier: "noimage/03/no-image.png".to_string(),
            friendly_url: false,
            modern_format: "webp".to_string(),
            quality: QualityConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percent = [
            ("jpeg", self.quality.jpeg),
            ("webp", self.quality.webp),
            ("avif", self.quality.avif),
        ];
        for (format, value) in percent {
            if value.is_some_and(|q| q > 100) {
                return Err(ConfigError::Validation(format!(
                    "quality.{format} must be 0-100"
                )));
            }
        }
        if self.quality.png.is_some_and(|q| q > 9) {
            return Err(ConfigError::Validation("quality.png must be 0-9".into()));
        }
        if let Err(e) = ResizeFlags::parse(&self.default_transform) {
            return Err(ConfigError::Validation(format!("default_transform: {e}")));
        }
        if let Err(e) = ImageName::decode(&self.noimage_identifier) {
            return Err(ConfigError::Validation(format!("noimage_identifier: {e}")));
        }
        if self.modern_format.is_empty() || self.modern_format.contains(['.', '/']) {
            return Err(ConfigError::Validation(
                "modern_format must be a bare extension such as \"webp\"".into(),
            ));
        }
        Ok(())
    }

    /// Whether originals and derivatives share one tree.
    pub fn shared_tree(&self) -> bool {
        self.data_path == self.orig_path
    }
}

/// Default quality per output format. `None` leaves the encoder default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    pub jpeg: Option<u8>,
    /// zlib compression level, not a percentage.
    pub png: Option<u8>,
    pub webp: Option<u8>,
    pub avif: Option<u8>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            jpeg: Some(85),
            png: Some(6),
            webp: Some(80),
            avif: Some(30),
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StorageConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<StorageConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StorageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// absent.
pub fn load_config(path: &Path) -> Result<StorageConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Storage Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.

# Root of the derivative tree. Resized and converted images are cached here.
data_path = "www/data"

# Root of the original tree. Uploads are stored here as
# <namespace>/<2-char checksum prefix>/<name>.<ext>.
# May be the same directory as data_path.
orig_path = "www/data"

# Public directory token prefixed to every link.
data_dir = "data"

# Resize flag used when a request names none.
# Tokens: fit, fill, exact, stretch, shrink_only (combine with "+").
default_transform = "fit"

# Placeholder served for missing images. Generated on first use.
noimage_identifier = "noimage/03/no-image.png"

# Keep the original file name in links and move the transform into the
# _image_storage query parameter.
friendly_url = false

# JPEG and PNG sources are converted to this format unless a request
# asks to keep its format.
modern_format = "webp"

# ---------------------------------------------------------------------------
# Default quality per output format
# ---------------------------------------------------------------------------
[quality]
# 0-100
jpeg = 85
# 0-9 zlib compression level
png = 6
# 0-100
webp = 80
# 0-100
avif = 30
# GIF has no quality setting.
"##
}
