//! Parameter types for codec operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the derivative cache (which decides what file to
//! produce) and the [`backend`](super::backend) (which does the pixel work).
//!
//! - [`ImageSource`]: a file on disk or embedded bytes (the placeholder).
//! - [`ResizeParams`]: target box plus the resize flag bitmask.
//! - [`RenderParams`]: everything needed to produce one output file.

use crate::identifier::{Crop, ResizeFlags};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Target box and mode for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub flags: ResizeFlags,
}

/// Decode `source`, crop, resize, sharpen, and write `output`.
///
/// The output format follows the extension of `output`. `quality` is
/// format-specific and `None` means the encoder default.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: ImageSource,
    pub output: PathBuf,
    pub crop: Option<Crop>,
    pub resize: Option<ResizeParams>,
    pub sharpen: bool,
    pub quality: Option<u8>,
}
