//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Resize modes, by flag bit:
//!
//! | Flags | Result |
//! |---|---|
//! | `fit` (0) | largest proportional size inside the box |
//! | `shrink_only` (1) | as requested, but never enlarged |
//! | `stretch` (2) | exactly the box, aspect ratio ignored |
//! | `fill` (4) | smallest proportional size covering the box |
//! | `exact` (8) | `fill`, then center-cropped to the box |

use crate::identifier::{Crop, ResizeFlags};

/// Pixel rectangle `(x, y, width, height)`.
pub type Rect = (u32, u32, u32, u32);

/// Calculate the resized dimensions for a source and target box.
///
/// For [`ResizeFlags::EXACT`] this is the fill size before the center crop;
/// see [`calculate_exact_crop`].
///
/// # Examples
/// ```
/// # use image_storage::identifier::ResizeFlags;
/// # use image_storage::imaging::calculate_resize_dimensions;
/// // 1200x600 into a 400x400 box
/// assert_eq!(calculate_resize_dimensions((1200, 600), (400, 400), ResizeFlags::FIT), (400, 200));
/// assert_eq!(calculate_resize_dimensions((1200, 600), (400, 400), ResizeFlags::FILL), (800, 400));
/// ```
pub fn calculate_resize_dimensions(
    source: (u32, u32),
    target: (u32, u32),
    flags: ResizeFlags,
) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let (tgt_w, tgt_h) = (target.0 as f64, target.1 as f64);

    let (w, h) = if flags.contains(ResizeFlags::EXACT) {
        let scale = (tgt_w / src_w).max(tgt_h / src_h);
        (src_w * scale, src_h * scale)
    } else if flags.contains(ResizeFlags::STRETCH) {
        if flags.contains(ResizeFlags::SHRINK_ONLY) {
            (
                src_w * (tgt_w / src_w).min(1.0),
                src_h * (tgt_h / src_h).min(1.0),
            )
        } else {
            (tgt_w, tgt_h)
        }
    } else {
        let (scale_w, scale_h) = (tgt_w / src_w, tgt_h / src_h);
        let mut scale = if flags.contains(ResizeFlags::FILL) {
            scale_w.max(scale_h)
        } else {
            scale_w.min(scale_h)
        };
        if flags.contains(ResizeFlags::SHRINK_ONLY) {
            scale = scale.min(1.0);
        }
        (src_w * scale, src_h * scale)
    };

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Center crop of a fill-resized image down to the target box.
pub fn calculate_exact_crop(resized: (u32, u32), target: (u32, u32)) -> Rect {
    let w = target.0.min(resized.0);
    let h = target.1.min(resized.1);
    let x = ((resized.0 - w) as f64 / 2.0).round() as u32;
    let y = ((resized.1 - h) as f64 / 2.0).round() as u32;
    (x, y, w, h)
}

/// Clamp a crop to the image bounds.
///
/// Returns `None` when nothing of the crop overlaps the image, in which
/// case the image is used uncropped.
pub fn clamp_crop(crop: Crop, dims: (u32, u32)) -> Option<Rect> {
    let left = crop.left.min(dims.0);
    let top = crop.top.min(dims.1);
    let right = crop.right.min(dims.0);
    let bottom = crop.bottom.min(dims.1);
    (right > left && bottom > top).then(|| (left, top, right - left, bottom - top))
}
