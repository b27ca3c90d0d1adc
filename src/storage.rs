//! The [`ImageStorage`] service and the pieces its operations share.
//!
//! Operations are spread over the modules that own them:
//! [`store`](crate::store) (save and delete originals),
//! [`resolve`](crate::resolve) (derivative cache),
//! [`fallback`](crate::fallback) (placeholder) and
//! [`srcset`](crate::srcset) (multi-size planning).

use crate::checksum::{Checksum, Sha256Checksum};
use crate::config::StorageConfig;
use crate::error::Result;
use crate::handle::ImageHandle;
use crate::identifier::{ImageName, ResizeFlags};
use crate::imaging::{ImageCodec, RustCodec};
use crate::quality::QualityPolicy;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Image storage over an original tree and a derivative tree.
///
/// All configuration is fixed at construction except the friendly-URL
/// switch. Every operation is synchronous; concurrent processes may share the
/// same trees.
pub struct ImageStorage<C: ImageCodec = RustCodec> {
    pub(crate) data_path: PathBuf,
    pub(crate) orig_path: PathBuf,
    pub(crate) data_dir: String,
    pub(crate) checksum: Box<dyn Checksum>,
    pub(crate) codec: C,
    pub(crate) quality: QualityPolicy,
    pub(crate) default_transform: ResizeFlags,
    pub(crate) noimage: ImageName,
    /// Quality written into `noimage_identifier`, if any.
    pub(crate) noimage_quality: Option<u8>,
    pub(crate) friendly_url: bool,
    pub(crate) modern_format: String,
}

impl ImageStorage<RustCodec> {
    /// Storage using the pure Rust codec.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Self::new(config, RustCodec::new())
    }
}

impl<C: ImageCodec> ImageStorage<C> {
    pub fn new(config: &StorageConfig, codec: C) -> Result<Self> {
        let mut noimage = ImageName::decode(&config.noimage_identifier)?;
        let noimage_quality = noimage.transform.as_ref().and_then(|t| t.quality);
        noimage.set_size(None);
        Ok(Self {
            data_path: config.data_path.clone(),
            orig_path: config.orig_path.clone(),
            data_dir: config.data_dir.clone(),
            checksum: Box::new(Sha256Checksum),
            codec,
            quality: QualityPolicy::from_config(&config.quality),
            default_transform: ResizeFlags::parse(&config.default_transform)?,
            noimage,
            noimage_quality,
            friendly_url: config.friendly_url,
            modern_format: config.modern_format.clone(),
        })
    }

    /// Replace the checksum used when saves are not given one.
    pub fn with_checksum(mut self, checksum: impl Checksum + 'static) -> Self {
        self.checksum = Box::new(checksum);
        self
    }

    /// Switch friendly links on or off for handles created from now on.
    pub fn set_friendly_url(&mut self, friendly_url: bool) {
        self.friendly_url = friendly_url;
    }

    pub fn friendly_url(&self) -> bool {
        self.friendly_url
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn orig_path(&self) -> &Path {
        &self.orig_path
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn quality_policy(&self) -> &QualityPolicy {
        &self.quality
    }

    /// Whether originals and derivatives share one tree.
    pub fn shared_tree(&self) -> bool {
        self.data_path == self.orig_path
    }

    pub(crate) fn handle(&self, identifier: impl Into<String>) -> ImageHandle {
        ImageHandle::ready(identifier, &self.data_path, &self.data_dir, self.friendly_url)
    }

    /// Make sure the original at `orig_file` is reachable from the derivative
    /// tree under the same identifier, then hand it out.
    pub(crate) fn materialize_original(
        &self,
        identifier: &str,
        orig_file: &Path,
    ) -> Result<ImageHandle> {
        let data_file = self.data_path.join(identifier);
        if !data_file.exists() {
            copy_atomic(orig_file, &data_file)?;
            tracing::debug!(identifier, "copied original into derivative tree");
        }
        Ok(self.handle(identifier))
    }
}

/// Copy `from` to `to` through a temporary file in the destination
/// directory, creating the directory first.
pub(crate) fn copy_atomic(from: &Path, to: &Path) -> io::Result<()> {
    let dir = parent_dir(to);
    fs::create_dir_all(dir)?;
    let mut source = fs::File::open(from)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    io::copy(&mut source, &mut tmp)?;
    tmp.persist(to).map_err(|e| e.error)?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::MockCodec;
    use tempfile::TempDir;

    /// Storage over two subdirectories of a temp dir, backed by a mock codec.
    pub(crate) fn mock_storage(
        tmp: &TempDir,
        shared: bool,
        dims: Vec<Dimensions>,
    ) -> ImageStorage<MockCodec> {
        let config = StorageConfig {
            data_path: tmp.path().join("data"),
            orig_path: if shared {
                tmp.path().join("data")
            } else {
                tmp.path().join("orig")
            },
            ..StorageConfig::default()
        };
        ImageStorage::new(&config, MockCodec::with_dimensions(dims)).unwrap()
    }

    #[test]
    fn new_rejects_bad_default_transform() {
        let config = StorageConfig {
            default_transform: "squash".into(),
            ..StorageConfig::default()
        };
        assert!(ImageStorage::new(&config, MockCodec::new()).is_err());
    }

    #[test]
    fn handles_follow_friendly_switch() {
        let tmp = TempDir::new().unwrap();
        let mut storage = mock_storage(&tmp, true, vec![]);
        assert_eq!(
            storage.handle("ns/ab/p.10x10.fit.png").create_link(),
            "data/ns/ab/p.10x10.fit.png"
        );
        storage.set_friendly_url(true);
        assert!(storage.friendly_url());
        assert_eq!(
            storage.handle("ns/ab/p.10x10.fit.png").create_link(),
            "data/ns/ab/p.png?_image_storage=10x10.fit"
        );
    }

    #[test]
    fn copy_atomic_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("a.bin");
        fs::write(&from, b"payload").unwrap();
        let to = tmp.path().join("x/y/z/a.bin");

        copy_atomic(&from, &to).unwrap();
        assert_eq!(fs::read(&to).unwrap(), b"payload");
    }
}
