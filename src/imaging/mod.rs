//! Image codec seam. Every codec is statically linked; no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions`, AVIF container metadata |
//! | **Decode** | `image` decoders; AVIF through `avif-parse` + `rav1d` |
//! | **Crop** | `crop_imm` with bounds clamped to the image |
//! | **Resize** | Lanczos3, geometry by resize flag bitmask |
//! | **Sharpen** | 3x3 convolution |
//! | **Encode** | JPEG, PNG, WebP (libwebp, lossy), AVIF (rav1e), GIF, TIFF |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing codec operations
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]

mod avif;
pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, Dimensions, ImageCodec};
pub use calculations::{Rect, calculate_exact_crop, calculate_resize_dimensions, clamp_crop};
pub use params::{ImageSource, RenderParams, ResizeParams};
pub use rust_backend::RustCodec;
