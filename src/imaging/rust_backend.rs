//! Codec built on the `image` crate, with `rav1d` for AVIF input and libwebp for WebP output.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only, format sniffed from content) |
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Decode (AVIF) | [`avif`](super::avif): `avif-parse` + `rav1d` + YUV→RGB |
//! | Crop | `DynamicImage::crop_imm` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Sharpen | `DynamicImage::filter3x3` |
//! | Encode → WebP | `webp` (libwebp, lossy at the requested quality) |
//! | Encode → JPEG / PNG / AVIF / GIF / TIFF | `image::codecs::*` |
//!
//! Output is encoded in memory and written through a temporary file in the
//! destination directory, then renamed into place, so a derivative path
//! never holds a partial file. The destination directory is only created once
//! encoding has succeeded.

use super::avif::{decode_avif, identify_avif, is_avif};
use super::backend::{CodecError, Dimensions, ImageCodec};
use super::calculations::{calculate_exact_crop, calculate_resize_dimensions, clamp_crop};
use super::params::{ImageSource, RenderParams};
use crate::identifier::ResizeFlags;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 3x3 sharpening kernel. The codec normalises by the kernel sum (16).
const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 24.0, -1.0, -1.0, -1.0, -1.0];

/// AVIF encoder speed (1 = slowest, 10 = fastest).
const AVIF_SPEED: u8 = 6;

/// Bytes needed to recognise an AVIF container.
const SNIFF_LEN: u64 = 12;

/// Pure Rust codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn map_image_error(err: ImageError) -> CodecError {
    match err {
        ImageError::IoError(e) => CodecError::Io(e),
        other => CodecError::Decode(other.to_string()),
    }
}

fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, CodecError> {
    if is_avif(bytes) {
        return decode_avif(bytes);
    }
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(map_image_error)
}

/// Load and decode a source, sniffing the format from its content.
fn load_image(source: &ImageSource) -> Result<DynamicImage, CodecError> {
    match source {
        ImageSource::File(path) => decode_bytes(&fs::read(path)?),
        ImageSource::Bytes(bytes) => decode_bytes(bytes),
    }
}

/// Whether the file at `path` is an AVIF container.
fn sniff_avif(path: &Path) -> Result<bool, CodecError> {
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    fs::File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;
    Ok(is_avif(&header))
}

fn apply_transform(mut img: DynamicImage, params: &RenderParams) -> DynamicImage {
    if let Some(crop) = params.crop
        && let Some((x, y, w, h)) = clamp_crop(crop, (img.width(), img.height()))
    {
        img = img.crop_imm(x, y, w, h);
    }

    if let Some(resize) = params.resize {
        let target = (resize.width, resize.height);
        let (w, h) = calculate_resize_dimensions((img.width(), img.height()), target, resize.flags);
        if (w, h) != (img.width(), img.height()) {
            img = img.resize_exact(w, h, FilterType::Lanczos3);
        }
        if resize.flags.contains(ResizeFlags::EXACT) {
            let (x, y, cw, ch) = calculate_exact_crop((w, h), target);
            img = img.crop_imm(x, y, cw, ch);
        }
    }

    if params.sharpen {
        img = img.filter3x3(&SHARPEN_KERNEL);
    }
    img
}

/// Encode `img` in the format named by the output extension.
fn encode(img: &DynamicImage, ext: &str, quality: Option<u8>) -> Result<Vec<u8>, CodecError> {
    let mut buf = Cursor::new(Vec::new());
    let failed = |e: ImageError| CodecError::Encode(format!("{ext}: {e}"));

    match ext {
        "jpg" | "jpeg" => {
            let q = quality.unwrap_or(85).clamp(1, 100);
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, q))
                .map_err(failed)?;
        }
        "png" => {
            let compression = match quality {
                Some(0..=2) => CompressionType::Fast,
                Some(7..) => CompressionType::Best,
                _ => CompressionType::Default,
            };
            img.write_with_encoder(PngEncoder::new_with_quality(
                &mut buf,
                compression,
                PngFilter::Adaptive,
            ))
            .map_err(failed)?;
        }
        "webp" => {
            let q = quality.unwrap_or(80).min(100);
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            let encoder = webp::Encoder::from_image(&rgba)
                .map_err(|e| CodecError::Encode(format!("webp: {e}")))?;
            buf.write_all(&encoder.encode(f32::from(q)))?;
        }
        "avif" => {
            let q = quality.unwrap_or(80).clamp(1, 100);
            img.write_with_encoder(AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, q))
                .map_err(failed)?;
        }
        "gif" => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut buf, ImageFormat::Gif).map_err(failed)?;
        }
        "tif" | "tiff" => {
            img.write_to(&mut buf, ImageFormat::Tiff).map_err(failed)?;
        }
        other => return Err(CodecError::UnsupportedFormat(other.to_string())),
    }
    Ok(buf.into_inner())
}

/// Write bytes next to `path` and rename them into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| CodecError::Io(e.error))?;
    Ok(())
}

impl ImageCodec for RustCodec {
    fn identify(&self, path: &Path) -> Result<Dimensions, CodecError> {
        if sniff_avif(path)? {
            return identify_avif(&fs::read(path)?);
        }
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(map_image_error)?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<(), CodecError> {
        let ext = params
            .output
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let img = load_image(&params.source)?;
        let img = apply_transform(img, params);
        let bytes = encode(&img, &ext, params.quality)?;
        write_atomic(&params.output, &bytes)
    }
}
