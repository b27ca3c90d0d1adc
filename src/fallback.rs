//! Placeholder served when a source image is missing.
//!
//! The placeholder is an ordinary original at the configured
//! `noimage_identifier`. It is written from an embedded PNG the first time it
//! is needed and then goes through the derivative cache like any other
//! image, so it is resized consistently with real images.

use crate::error::{Result, StorageError};
use crate::handle::ImageHandle;
use crate::identifier::ImageName;
use crate::imaging::{ImageCodec, ImageSource, RenderParams};
use crate::storage::ImageStorage;
use std::fs;
use std::path::PathBuf;

/// Embedded 200x150 grey placeholder.
pub const PLACEHOLDER_PNG: &[u8] = include_bytes!("../assets/no-image.png");

/// Result of [`ImageStorage::get_fallback`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// Ready to hand out as-is.
    Handle(ImageHandle),
    /// Placeholder original for the caller to transform.
    Source { name: ImageName, path: PathBuf },
}

impl<C: ImageCodec> ImageStorage<C> {
    /// Placeholder as a ready handle (`materialize`) or as a source the
    /// derivative cache can resize.
    pub fn get_fallback(&self, materialize: bool) -> Result<Fallback> {
        if materialize {
            self.fallback_handle().map(Fallback::Handle)
        } else {
            let (name, path) = self.fallback_source()?;
            Ok(Fallback::Source { name, path })
        }
    }

    pub fn fallback_handle(&self) -> Result<ImageHandle> {
        let path = self.ensure_placeholder()?;
        self.materialize_original(&self.noimage.original_identifier(), &path)
    }

    pub(crate) fn fallback_source(&self) -> Result<(ImageName, PathBuf)> {
        let path = self.ensure_placeholder()?;
        Ok((self.noimage.clone(), path))
    }

    /// Write the placeholder into the original tree unless it exists.
    fn ensure_placeholder(&self) -> Result<PathBuf> {
        let path = self.orig_path.join(self.noimage.original_identifier());
        if path.exists() {
            return Ok(path);
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                StorageError::Placeholder(format!(
                    "{} does not exist or is not writable: {e}",
                    dir.display()
                ))
            })?;
        }

        let quality = self
            .noimage_quality
            .or_else(|| self.quality.for_format(&self.noimage.extension));
        self.codec.render(&RenderParams {
            source: ImageSource::Bytes(PLACEHOLDER_PNG.to_vec()),
            output: path.clone(),
            crop: None,
            resize: None,
            sharpen: false,
            quality,
        })?;
        tracing::info!(path = %path.display(), "generated placeholder image");
        Ok(path)
    }
}
