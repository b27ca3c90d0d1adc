//! Content-addressed store for originals.
//!
//! Originals live at `orig_path/<namespace>/<prefix>/<name>.<ext>`, where
//! `prefix` is the first two characters of the content checksum and `name`
//! is the sanitized upload name. Within one shard directory a taken name gets
//! a numeric suffix:
//!
//! ```text
//! photo.jpg → photo.2.jpg → photo.3.jpg → … → photo.9.jpg → photo.10.jpg
//! ```
//!
//! Each step strips the previous counter (one dot plus its digits) before
//! appending the next, so names never stack suffixes.
//!
//! Writes go to a temporary file in the shard directory and are renamed into
//! place without replacing an existing file. A process that loses a race for
//! a name moves on to the next candidate.

use crate::error::{Result, StorageError};
use crate::handle::ImageHandle;
use crate::identifier::{ImageName, check_segments, family_pattern};
use crate::imaging::ImageCodec;
use crate::storage::ImageStorage;
use regex::Regex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9._]+").expect("slug pattern is valid"));

static SIZE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\d+x\d+)").expect("size-like pattern is valid"));

/// An uploaded file: where the front end put it and what the client called it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub temp_path: PathBuf,
    pub untrusted_name: String,
}

impl Upload {
    pub fn new(temp_path: impl Into<PathBuf>, untrusted_name: impl Into<String>) -> Self {
        Self {
            temp_path: temp_path.into(),
            untrusted_name: untrusted_name.into(),
        }
    }
}

/// Web-safe slug of a file name: ASCII, lower case, runs of anything other
/// than letters, digits, `.` and `_` collapsed to `-`.
///
/// A `.<W>x<H>` run in the stem becomes `-<W>x<H>`, so a stored original
/// never decodes as a derivative of some shorter name.
///
/// ```
/// use image_storage::store::sanitize_name;
///
/// assert_eq!(sanitize_name("Žluťoučký Kůň.JPG"), "zlutoucky-kun.jpg");
/// assert_eq!(sanitize_name("holiday at the lake.png"), "holiday-at-the-lake.png");
/// assert_eq!(sanitize_name("shot.10x10.fit.jpg"), "shot-10x10.fit.jpg");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    let slug = DISALLOWED.replace_all(&ascii, "-");
    let slug = slug.trim_matches('-');
    match slug.rsplit_once('.') {
        Some((stem, ext)) => format!("{}.{ext}", SIZE_LIKE.replace_all(stem, "-${1}")),
        None => slug.to_string(),
    }
}

/// Split at the last dot into `(stem, extension)`.
pub fn split_extension(name: &str) -> Result<(&str, &str)> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => Ok((stem, ext)),
        _ => Err(StorageError::Extension {
            name: name.to_string(),
        }),
    }
}

/// Shard directory name: the first two characters of the checksum.
pub fn shard_prefix(checksum: &str) -> Result<&str> {
    let prefix = checksum
        .get(..2)
        .filter(|p| p.bytes().all(|b| b.is_ascii_alphanumeric()))
        .ok_or_else(|| StorageError::InvalidChecksum(checksum.to_string()))?;
    Ok(prefix)
}

/// Next candidate stem after `previous` collisions-worth of suffixing.
///
/// `previous` is the counter currently on the stem, `1` meaning none.
pub fn next_collision_stem(stem: &str, previous: u32) -> String {
    if previous < 2 {
        return format!("{stem}.2");
    }
    let strip = 1 + previous.to_string().len();
    let base = stem.get(..stem.len().saturating_sub(strip)).unwrap_or("");
    format!("{base}.{}", previous + 1)
}

/// Rename `tmp` to the first free `dir/<stem>[.N].<ext>` and return the
/// chosen file name.
fn persist_unique(mut tmp: NamedTempFile, dir: &Path, stem: &str, ext: &str) -> Result<String> {
    let mut stem = stem.to_string();
    let mut counter = 1;
    loop {
        let file_name = format!("{stem}.{ext}");
        match tmp.persist_noclobber(dir.join(&file_name)) {
            Ok(_) => return Ok(file_name),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
            Err(e) => return Err(e.error.into()),
        }
        tracing::debug!(%file_name, "name taken, trying next suffix");
        stem = next_collision_stem(&stem, counter);
        counter += 1;
    }
}

impl<C: ImageCodec> ImageStorage<C> {
    /// Move an uploaded file into the original tree.
    ///
    /// The checksum is computed from the file when not supplied.
    pub fn save_upload(
        &self,
        upload: &Upload,
        namespace: &str,
        checksum: Option<&str>,
    ) -> Result<ImageHandle> {
        let checksum = match checksum.filter(|c| !c.is_empty()) {
            Some(c) => c.to_string(),
            None => self.checksum.hash_file(&upload.temp_path)?,
        };
        let handle = self.save_with(&upload.untrusted_name, namespace, &checksum, |tmp| {
            io::copy(&mut fs::File::open(&upload.temp_path)?, tmp)?;
            Ok(())
        })?;
        fs::remove_file(&upload.temp_path)?;
        Ok(handle)
    }

    /// Write raw bytes into the original tree under `name`.
    ///
    /// The checksum is computed from the bytes when not supplied.
    pub fn save_content(
        &self,
        content: &[u8],
        name: &str,
        namespace: &str,
        checksum: Option<&str>,
    ) -> Result<ImageHandle> {
        let checksum = match checksum.filter(|c| !c.is_empty()) {
            Some(c) => c.to_string(),
            None => self.checksum.hash_bytes(content),
        };
        self.save_with(name, namespace, &checksum, |tmp| tmp.write_all(content))
    }

    fn save_with(
        &self,
        untrusted_name: &str,
        namespace: &str,
        checksum: &str,
        fill: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
    ) -> Result<ImageHandle> {
        let name = sanitize_name(untrusted_name);
        let (stem, ext) = split_extension(&name)?;
        check_segments(namespace)?;
        let prefix = shard_prefix(checksum)?;

        let dir = self.orig_path.join(namespace).join(prefix);
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        fill(&mut tmp)?;
        tmp.as_file().sync_all()?;
        let file_name = persist_unique(tmp, &dir, stem, ext)?;

        let identifier = format!("{namespace}/{prefix}/{file_name}");
        tracing::info!(%identifier, "saved original");
        Ok(self.handle(identifier).with_origin(checksum, name.as_str()))
    }

    /// Delete an original's derivatives, and with distinct trees the
    /// original itself.
    ///
    /// With a shared tree every file of the name's family in its shard
    /// directory is removed; `only_changed` spares the untransformed
    /// original. With distinct trees the original is removed (unless
    /// `only_changed`) and the whole derivative shard directory goes.
    pub fn delete(&self, identifier: &str, only_changed: bool) -> Result<()> {
        let name = ImageName::decode(identifier)?;
        let dir = self.data_path.join(name.shard());
        let original = name.original_file_name();

        if self.shared_tree() {
            if !dir.exists() {
                return Ok(());
            }
            let family = family_pattern(&name.name, &name.extension)?;
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let Some(file_name) = file_name.to_str() else {
                    continue;
                };
                if !family.is_match(file_name) || (only_changed && file_name == original) {
                    continue;
                }
                if entry.file_type()?.is_file() {
                    fs::remove_file(entry.path())?;
                    tracing::debug!(file_name, "deleted");
                }
            }
        } else {
            if !only_changed {
                let orig_file = self.orig_path.join(name.original_identifier());
                ignore_missing(fs::remove_file(&orig_file))?;
            }
            ignore_missing(fs::remove_dir_all(&dir))?;
            tracing::debug!(shard = %dir.display(), "deleted derivative shard");
        }
        Ok(())
    }

    /// [`delete`](Self::delete) by handle. Terminal handles are a no-op.
    pub fn delete_handle(&self, handle: &ImageHandle, only_changed: bool) -> Result<()> {
        if !handle.is_ready() {
            return Ok(());
        }
        self.delete(handle.identifier(), only_changed)
    }
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
