//! Format-specific default encoding quality.
//!
//! The policy is built once from [`QualityConfig`](crate::config::QualityConfig)
//! and injected into [`ImageStorage`](crate::ImageStorage); it never changes
//! afterwards.
//!
//! | Format | Meaning | Default |
//! |---|---|---|
//! | jpeg (`jpg` aliases it) | 0-100 | 85 |
//! | png | 0-9 compression level | 6 |
//! | webp | 0-100 | 80 |
//! | avif | 0-100 | 30 |
//! | gif | not applicable | none |
//!
//! Formats missing from the table fall back to the jpeg quality, and to 85
//! when jpeg itself is unset.

use crate::config::QualityConfig;
use std::collections::BTreeMap;

/// Used when neither the format nor jpeg has a configured quality.
pub const FALLBACK_QUALITY: u8 = 85;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityPolicy {
    by_format: BTreeMap<String, Option<u8>>,
}

impl QualityPolicy {
    /// Build from explicit `(format, quality)` pairs. Keys are lower-cased.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<u8>)>,
        K: AsRef<str>,
    {
        Self {
            by_format: pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v))
                .collect(),
        }
    }

    pub fn from_config(config: &QualityConfig) -> Self {
        Self::from_pairs([
            ("jpeg", config.jpeg),
            ("png", config.png),
            ("webp", config.webp),
            ("avif", config.avif),
            ("gif", None),
        ])
    }

    /// Default quality for an output extension.
    ///
    /// A format present with `None` (gif) yields `None`; an absent format
    /// borrows the jpeg quality.
    pub fn for_format(&self, extension: &str) -> Option<u8> {
        let mut key = extension.to_ascii_lowercase();
        if key == "jpg" {
            key = "jpeg".to_string();
        }
        match self.by_format.get(&key) {
            Some(quality) => *quality,
            None => Some(
                self.by_format
                    .get("jpeg")
                    .copied()
                    .flatten()
                    .unwrap_or(FALLBACK_QUALITY),
            ),
        }
    }
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self::from_config(&QualityConfig::default())
    }
}
