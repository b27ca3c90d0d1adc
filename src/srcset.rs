//! Multi-size planning for `srcset` attributes.
//!
//! Sizes are `WIDTHxHEIGHT` or width-only. A width-only entry takes its
//! height from the original's aspect ratio:
//!
//! ```text
//! original 1200x600, sizes ["400", "800x400", "1200"]
//!   → 400x200, 800x400, 1200x600
//! ```
//!
//! The ratio falls back to 1:1 when the original is missing or cannot be
//! read. Output order is input order.

use crate::error::Result;
use crate::identifier::{FormatError, ImageName, parse_size_spec};
use crate::imaging::ImageCodec;
use crate::resolve::ImageRequest;
use crate::storage::ImageStorage;

/// One planned entry: the descriptor width and the full size spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSize {
    pub width: u32,
    pub size: String,
}

impl<C: ImageCodec> ImageStorage<C> {
    /// Normalize one size spec to `WIDTHxHEIGHT[crop…]`.
    pub fn normalize_size(
        &self,
        identifier: &str,
        size: &str,
    ) -> std::result::Result<String, FormatError> {
        if size.contains('x') {
            return Ok(size.to_string());
        }
        let width = size
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|w| *w > 0)
            .ok_or_else(|| FormatError::new(size))?;
        let ratio = self.aspect_ratio(identifier);
        let height = ((width as f64 / ratio).round() as u32).max(1);
        Ok(format!("{width}x{height}"))
    }

    /// Width over height of the original, 1.0 when unknown.
    fn aspect_ratio(&self, identifier: &str) -> f64 {
        if ImageName::decode(identifier).is_err() {
            return 1.0;
        }
        let path = self.orig_path.join(identifier);
        if !path.is_file() {
            return 1.0;
        }
        match self.codec.identify(&path) {
            Ok(dims) => dims.aspect_ratio().unwrap_or(1.0),
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "cannot read dimensions, assuming 1:1"
                );
                1.0
            }
        }
    }

    /// Normalize every entry, keeping input order.
    pub fn plan_srcset<S: AsRef<str>>(
        &self,
        identifier: &str,
        sizes: &[S],
    ) -> Result<Vec<PlannedSize>> {
        sizes
            .iter()
            .map(|size| -> Result<PlannedSize> {
                let size = self.normalize_size(identifier, size.as_ref())?;
                let width = parse_size_spec(&size)?.size.width;
                Ok(PlannedSize { width, size })
            })
            .collect()
    }

    /// `"<prefix>/<link> <width>w, …"` for every size, resolving each one
    /// through the derivative cache with the request's flag, quality and
    /// format preference. The request's own size is ignored.
    pub fn create_srcset<S: AsRef<str>>(
        &self,
        request: &ImageRequest,
        sizes: &[S],
        path_prefix: &str,
    ) -> Result<String> {
        let mut parts = Vec::with_capacity(sizes.len());
        for planned in self.plan_srcset(&request.identifier, sizes)? {
            let handle = self.resolve(&request.with_size(planned.size))?;
            parts.push(format!(
                "{path_prefix}/{} {}w",
                handle.create_link(),
                planned.width
            ));
        }
        Ok(parts.join(", "))
    }

    /// HTML attributes for an `<img>` tag.
    ///
    /// With srcset sizes, `src` uses the request size or else the last
    /// srcset entry, and a `srcset` attribute follows. Without them `src`
    /// alone is produced for the request size or the original. An empty
    /// identifier gives ` src=""`.
    pub fn image_attributes<S: AsRef<str>>(
        &self,
        request: &ImageRequest,
        srcset: &[S],
        path_prefix: &str,
    ) -> Result<String> {
        if request.identifier.is_empty() {
            return Ok(r#" src="""#.to_string());
        }

        let Some(last) = srcset.last() else {
            let handle = self.resolve(request)?;
            return Ok(format!(r#" src="{path_prefix}/{}""#, handle.create_link()));
        };

        let main = match request.size.as_deref().filter(|s| !s.is_empty()) {
            Some(size) => size,
            None => last.as_ref(),
        };
        let main = self.normalize_size(&request.identifier, main)?;
        let handle = self.resolve(&request.with_size(main))?;
        let mut out = format!(r#" src="{path_prefix}/{}""#, handle.create_link());

        let srcset = self.create_srcset(request, srcset, path_prefix)?;
        if !srcset.is_empty() {
            out.push_str(&format!(r#" srcset="{srcset}""#));
        }
        Ok(out)
    }
}
