//! # Image Storage
//!
//! Content-addressed storage for uploaded images with on-demand, cached
//! derivatives. Originals are filed under their namespace and a two-character
//! checksum prefix; resized, cropped and format-converted variants are
//! generated the first time they are asked for and served from disk after
//! that.
//!
//! # Identifiers
//!
//! Everything is addressed by a relative path string that encodes the whole
//! transformation:
//!
//! ```text
//! articles/a4/photo.jpg                          original
//! articles/a4/photo.800x600.fit.q80.webp         derivative
//! articles/a4/photo.800x600crop0x0x400x300.fill.q85.jpg
//! ```
//!
//! Decoding an identifier yields an [`identifier::ImageName`]; encoding it
//! again gives back the same string. A derivative's file lives at
//! `data_path/<identifier>`, so a cache lookup is a single `exists` check.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`identifier`] | Identifier grammar, resize flags, size specs |
//! | [`store`] | Saving originals (sanitized names, collision suffixes) and deleting families |
//! | [`resolve`] | The derivative cache: request in, [`ImageHandle`] out |
//! | [`fallback`] | Placeholder image used when a source is missing |
//! | [`srcset`] | Width-only size planning, `srcset` strings, `<img>` attributes |
//! | [`handle`] | Produced handles and link construction |
//! | [`imaging`] | Codec seam: [`imaging::ImageCodec`] and the statically linked [`imaging::RustCodec`] |
//! | [`quality`] | Per-format default quality |
//! | [`checksum`] | Pluggable content checksum, SHA-256 by default |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`error`] | Crate error type |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Index
//!
//! There is no database and no manifest. Whether a derivative exists is
//! answered by the file tree, and every write goes through a temporary file
//! in the destination directory followed by a rename. Several processes can
//! share one tree: two writers racing on the same derivative produce identical
//! bytes, and two uploads racing on the same name are separated by
//! no-clobber persistence plus collision suffixes (`photo.jpg`, `photo.2.jpg`,
//! ...).
//!
//! ## Missing Sources Degrade, Bad Requests Fail
//!
//! A request for an image whose original is gone resolves to the placeholder
//! at the requested size, and an original that cannot be decoded resolves to
//! a terminal handle whose link is `#`. Malformed identifiers, unknown resize
//! flags and unparsable sizes are caller errors and come back as
//! [`StorageError`].
//!
//! ## Self-Contained Imaging
//!
//! The [`imaging`] module uses the `image` crate for Lanczos3 resampling and
//! most codecs, `rav1d` for AVIF input and a bundled libwebp for lossy WebP
//! output. Everything is statically linked, so the binary carries no system
//! library dependencies. The [`imaging::ImageCodec`] trait is the seam that
//! tests replace with a recording mock.
//!
//! ## Explicit Configuration
//!
//! [`StorageConfig`] is loaded once and handed to [`ImageStorage::new`].
//! Quality defaults, the default resize flag and the placeholder identifier
//! are plain values on the storage; nothing is process-global.

pub mod checksum;
pub mod config;
pub mod error;
pub mod fallback;
pub mod handle;
pub mod identifier;
pub mod imaging;
pub mod quality;
pub mod resolve;
pub mod srcset;
pub mod storage;
pub mod store;

pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use fallback::Fallback;
pub use handle::{HandleStatus, ImageHandle};
pub use resolve::ImageRequest;
pub use srcset::PlannedSize;
pub use storage::ImageStorage;
pub use store::Upload;
