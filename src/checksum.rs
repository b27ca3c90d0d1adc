//! Pluggable checksums for the content-addressed store.
//!
//! The first two characters of a checksum become the shard directory of a
//! saved original. The store does not care which algorithm produces the
//! digest; it only needs a file variant (uploads) and a bytes variant
//! (in-memory content). [`Sha256Checksum`] is the default.

use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;

pub trait Checksum: Send + Sync {
    /// Digest of a file's contents.
    fn hash_file(&self, path: &Path) -> io::Result<String>;

    /// Digest of in-memory content.
    fn hash_bytes(&self, bytes: &[u8]) -> String;
}

/// SHA-256, rendered as lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Checksum;

impl Checksum for Sha256Checksum {
    fn hash_file(&self, path: &Path) -> io::Result<String> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn hash_bytes(&self, bytes: &[u8]) -> String {
        format!("{:x}", Sha256::digest(bytes))
    }
}

/// Adapter turning a pair of closures into a [`Checksum`].
///
/// ```
/// use image_storage::checksum::{Checksum, FnChecksum};
///
/// let fixed = FnChecksum::new(
///     |_path: &std::path::Path| Ok("ab".to_string()),
///     |_bytes: &[u8]| "cd".to_string(),
/// );
/// assert_eq!(fixed.hash_bytes(b"anything"), "cd");
/// ```
pub struct FnChecksum<F, B> {
    file: F,
    bytes: B,
}

impl<F, B> FnChecksum<F, B>
where
    F: Fn(&Path) -> io::Result<String> + Send + Sync,
    B: Fn(&[u8]) -> String + Send + Sync,
{
    pub fn new(file: F, bytes: B) -> Self {
        Self { file, bytes }
    }
}

impl<F, B> Checksum for FnChecksum<F, B>
where
    F: Fn(&Path) -> io::Result<String> + Send + Sync,
    B: Fn(&[u8]) -> String + Send + Sync,
{
    fn hash_file(&self, path: &Path) -> io::Result<String> {
        (self.file)(path)
    }

    fn hash_bytes(&self, bytes: &[u8]) -> String {
        (self.bytes)(bytes)
    }
}
