//! Derivative cache.
//!
//! [`ImageStorage::resolve`] turns a request into a handle. The derivative
//! path is a pure function of the source identifier and the transform, so:
//!
//! - a path that already exists is a cache hit and costs one `stat`;
//! - two processes missing the same path at once both render it and the
//!   last rename wins, with identical bytes either way.
//!
//! ```text
//! request ──► size? ──no──► copy original into derivative tree (no codec work)
//!               │
//!              yes
//!               ▼
//!        source exists? ──no──► placeholder source (crop and format change skipped)
//!               ▼
//!        encode identifier ──► exists? ──yes──► handle (cache hit)
//!               │
//!              no
//!               ▼
//!        decode → crop → resize → sharpen → encode at quality
//! ```
//!
//! Missing and undecodable sources, and formats without an encoder, come back
//! as terminal handles instead of errors. Malformed sizes, flags and
//! identifiers are errors.

use crate::error::Result;
use crate::handle::ImageHandle;
use crate::identifier::{ImageName, ResizeFlags, parse_size_spec};
use crate::imaging::{CodecError, ImageCodec, ImageSource, RenderParams, ResizeParams};
use crate::storage::ImageStorage;
use std::io;
use std::path::PathBuf;

/// Extensions rewritten to the modern format when a request prefers it.
const CONVERTIBLE: &[&str] = &["jpg", "jpeg", "png"];

/// One image lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Identifier of the original. Empty means "no image".
    pub identifier: String,
    /// `WIDTHxHEIGHT[cropLxTxRxB]`; `None` or empty requests the original.
    pub size: Option<String>,
    /// Resize flag tokens; `None` uses the configured default.
    pub flag: Option<String>,
    /// Overrides the format default quality.
    pub quality: Option<u8>,
    /// Convert JPEG and PNG sources to the configured modern format.
    pub prefer_modern_format: bool,
}

impl Default for ImageRequest {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            size: None,
            flag: None,
            quality: None,
            prefer_modern_format: true,
        }
    }
}

impl ImageRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn keep_format(mut self) -> Self {
        self.prefer_modern_format = false;
        self
    }

    /// Same request at another size.
    pub(crate) fn with_size(&self, size: impl Into<String>) -> Self {
        Self {
            size: Some(size.into()),
            ..self.clone()
        }
    }
}

impl<C: ImageCodec> ImageStorage<C> {
    /// Resolve a request to a handle, generating the derivative on a miss.
    pub fn resolve(&self, request: &ImageRequest) -> Result<ImageHandle> {
        let identifier = request.identifier.as_str();
        let Some(size) = request.size.as_deref().filter(|s| !s.is_empty()) else {
            return self.resolve_original(identifier);
        };

        let spec = parse_size_spec(size)?;
        let flags = match request.flag.as_deref() {
            Some(flag) => ResizeFlags::parse(flag)?,
            None => self.default_transform,
        };

        let (mut name, source, is_fallback) = match self.requested_source(identifier)? {
            Some((name, source)) => (name, source, false),
            None => {
                let (name, source) = self.fallback_source()?;
                tracing::warn!(identifier, "source image missing, using placeholder");
                (name, source, true)
            }
        };

        name.set_size(Some(spec.size));
        name.set_crop(if is_fallback { None } else { spec.crop })?;
        name.set_flags(flags)?;
        if request.prefer_modern_format
            && !is_fallback
            && CONVERTIBLE.contains(&name.format_key().as_str())
        {
            name.set_extension(self.modern_format.clone());
        }
        let quality = request
            .quality
            .or(if is_fallback { self.noimage_quality } else { None })
            .or_else(|| self.quality.for_format(&name.extension));
        name.set_quality(quality)?;

        let derived = name.encode();
        let target = self.data_path.join(&derived);
        if target.exists() {
            tracing::debug!(identifier = %derived, "derivative cache hit");
            return Ok(self.handle(derived));
        }

        if !source.is_file() {
            tracing::warn!(source = %source.display(), "source vanished before rendering");
            return Ok(ImageHandle::not_found());
        }

        let params = RenderParams {
            source: ImageSource::File(source.clone()),
            output: target,
            crop: if is_fallback { None } else { spec.crop },
            resize: Some(ResizeParams {
                width: spec.size.width,
                height: spec.size.height,
                flags,
            }),
            sharpen: true,
            quality,
        };
        match self.codec.render(&params) {
            Ok(()) => {
                tracing::info!(identifier = %derived, "generated derivative");
                Ok(self.handle(derived))
            }
            Err(CodecError::Decode(reason)) => {
                tracing::warn!(source = %source.display(), %reason, "cannot decode source image");
                Ok(ImageHandle::unknown_format())
            }
            Err(CodecError::UnsupportedFormat(format)) => {
                tracing::warn!(source = %source.display(), %format, "no encoder for output format");
                Ok(ImageHandle::unknown_format())
            }
            Err(CodecError::Io(e)) if e.kind() == io::ErrorKind::NotFound && !source.exists() => {
                tracing::warn!(source = %source.display(), "source vanished while rendering");
                Ok(ImageHandle::not_found())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Untransformed original, copied into the derivative tree on first use.
    /// Missing originals resolve to the placeholder.
    pub fn resolve_original(&self, identifier: &str) -> Result<ImageHandle> {
        match self.requested_source(identifier)? {
            Some((_, source)) => self.materialize_original(identifier, &source),
            None => {
                if !identifier.is_empty() {
                    tracing::warn!(identifier, "original missing, using placeholder");
                }
                self.fallback_handle()
            }
        }
    }

    /// Decoded identifier and original path, or `None` when there is no
    /// usable original.
    fn requested_source(&self, identifier: &str) -> Result<Option<(ImageName, PathBuf)>> {
        if identifier.is_empty() {
            return Ok(None);
        }
        let name = ImageName::decode(identifier)?;
        let path = self.orig_path.join(identifier);
        Ok(path.is_file().then_some((name, path)))
    }
}
