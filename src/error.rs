//! Errors surfaced by store and resolve operations.
//!
//! Structural problems (bad size syntax, bad extension, bad identifier) and
//! infrastructure failures (disk I/O, encoding) are returned as
//! [`StorageError`]. Missing or undecodable sources are not errors: they
//! become terminal [`ImageHandle`](crate::ImageHandle) states.

use crate::identifier::{FormatError, IdentifierError};
use crate::imaging::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Error defining image extension ({name})")]
    Extension { name: String },
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error("Checksum '{0}' cannot be used as a shard prefix")]
    InvalidChecksum(String),
    #[error("Could not create placeholder image: {0}")]
    Placeholder(String),
    #[error("Image processing failed: {0}")]
    Codec(#[from] CodecError),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
