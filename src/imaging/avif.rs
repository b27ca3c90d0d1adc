//! AVIF decoding.
//!
//! The `image` crate's `avif` feature only provides the encoder. Sources are
//! decoded here instead: `avif-parse` extracts the AV1 payload from the
//! container, `rav1d` (a pure Rust port of dav1d) decodes it, and the YUV
//! planes are converted to RGB8 with BT.601 coefficients.

use super::backend::{CodecError, Dimensions};
use image::{DynamicImage, Rgb, RgbImage};
use rav1d::include::dav1d::data::Dav1dData;
use rav1d::include::dav1d::dav1d::Dav1dSettings;
use rav1d::include::dav1d::headers::{
    DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
    DAV1D_PIXEL_LAYOUT_I444,
};
use rav1d::include::dav1d::picture::Dav1dPicture;
use rav1d::src::lib as dav1d;
use std::io::Cursor;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

/// Whether `header` starts with an ISO-BMFF `ftyp` box carrying an AVIF brand.
pub(crate) fn is_avif(header: &[u8]) -> bool {
    header.len() >= 12 && &header[4..8] == b"ftyp" && matches!(&header[8..12], b"avif" | b"avis")
}

fn parse(bytes: &[u8]) -> Result<avif_parse::AvifData, CodecError> {
    avif_parse::read_avif(&mut Cursor::new(bytes))
        .map_err(|e| CodecError::Decode(format!("invalid AVIF container: {e:?}")))
}

/// Dimensions from the container metadata, without decoding pixels.
pub(crate) fn identify_avif(bytes: &[u8]) -> Result<Dimensions, CodecError> {
    let meta = parse(bytes)?
        .primary_item_metadata()
        .map_err(|e| CodecError::Decode(format!("unreadable AVIF metadata: {e:?}")))?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

fn av1_failure(stage: &str, code: i32) -> CodecError {
    CodecError::Decode(format!("AV1 {stage} failed ({code})"))
}

/// Decode the primary image of an AVIF file.
pub(crate) fn decode_avif(bytes: &[u8]) -> Result<DynamicImage, CodecError> {
    let avif = parse(bytes)?;
    let payload: &[u8] = &avif.primary_item;

    let mut settings = MaybeUninit::<Dav1dSettings>::uninit();
    unsafe { dav1d::dav1d_default_settings(NonNull::from(&mut settings).cast()) };
    let mut settings = unsafe { settings.assume_init() };
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    let rc = unsafe { dav1d::dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(av1_failure("open", rc.0));
    }

    // every exit below goes through the single close after the block
    let decoded = 'decode: {
        let mut data = Dav1dData::default();
        let buf = unsafe { dav1d::dav1d_data_create(NonNull::new(&mut data), payload.len()) };
        if buf.is_null() {
            break 'decode Err(CodecError::Decode("AV1 buffer allocation failed".into()));
        }
        unsafe { std::ptr::copy_nonoverlapping(payload.as_ptr(), buf, payload.len()) };

        let rc = unsafe { dav1d::dav1d_send_data(ctx, NonNull::new(&mut data)) };
        if rc.0 != 0 {
            unsafe { dav1d::dav1d_data_unref(NonNull::new(&mut data)) };
            break 'decode Err(av1_failure("send_data", rc.0));
        }

        let mut pic: Dav1dPicture = unsafe { std::mem::zeroed() };
        let rc = unsafe { dav1d::dav1d_get_picture(ctx, NonNull::new(&mut pic)) };
        if rc.0 != 0 {
            break 'decode Err(av1_failure("get_picture", rc.0));
        }
        let rgb = picture_to_rgb(&pic);
        unsafe { dav1d::dav1d_picture_unref(NonNull::new(&mut pic)) };
        rgb
    };
    unsafe { dav1d::dav1d_close(NonNull::new(&mut ctx)) };

    decoded.map(DynamicImage::ImageRgb8)
}

fn picture_to_rgb(pic: &Dav1dPicture) -> Result<RgbImage, CodecError> {
    let plane = |index: usize| {
        pic.data[index]
            .map(|p| p.as_ptr() as *const u8)
            .ok_or_else(|| CodecError::Decode("AV1 picture without pixel data".into()))
    };

    let layout = pic.p.layout;
    let (chroma, ss_x, ss_y) = match layout {
        DAV1D_PIXEL_LAYOUT_I400 => (None, false, false),
        DAV1D_PIXEL_LAYOUT_I420 => (Some((plane(1)?, plane(2)?)), true, true),
        DAV1D_PIXEL_LAYOUT_I422 => (Some((plane(1)?, plane(2)?)), true, false),
        DAV1D_PIXEL_LAYOUT_I444 => (Some((plane(1)?, plane(2)?)), false, false),
        other => {
            return Err(CodecError::Decode(format!(
                "unsupported AVIF pixel layout {other}"
            )));
        }
    };

    let planes = YuvPlanes {
        luma: plane(0)?,
        chroma,
        luma_stride: pic.stride[0],
        chroma_stride: pic.stride[1],
        bpc: pic.p.bpc as u32,
        ss_x,
        ss_y,
    };
    Ok(planes.to_rgb(pic.p.w as u32, pic.p.h as u32))
}

/// Borrowed view of decoded YUV planes. Valid until the picture is unref'd.
struct YuvPlanes {
    luma: *const u8,
    /// Cb and Cr planes; `None` for monochrome.
    chroma: Option<(*const u8, *const u8)>,
    luma_stride: isize,
    chroma_stride: isize,
    bpc: u32,
    ss_x: bool,
    ss_y: bool,
}

impl YuvPlanes {
    /// Sample at (x, y). 10 and 12 bit planes are stored as u16.
    fn sample(&self, plane: *const u8, stride: isize, x: u32, y: u32) -> f32 {
        let row = y as isize * stride;
        if self.bpc <= 8 {
            (unsafe { *plane.offset(row + x as isize) }) as f32
        } else {
            (unsafe { *(plane.offset(row + x as isize * 2) as *const u16) }) as f32
        }
    }

    fn to_rgb(&self, width: u32, height: u32) -> RgbImage {
        let max = ((1u32 << self.bpc) - 1) as f32;
        let center = (1u32 << (self.bpc - 1)) as f32;
        let scale = 255.0 / max;
        let to_u8 = |v: f32| (v * scale).clamp(0.0, 255.0) as u8;

        RgbImage::from_fn(width, height, |x, y| {
            let luma = self.sample(self.luma, self.luma_stride, x, y);
            let Some((cb_plane, cr_plane)) = self.chroma else {
                let grey = to_u8(luma);
                return Rgb([grey, grey, grey]);
            };
            let cx = if self.ss_x { x / 2 } else { x };
            let cy = if self.ss_y { y / 2 } else { y };
            let cb = self.sample(cb_plane, self.chroma_stride, cx, cy) - center;
            let cr = self.sample(cr_plane, self.chroma_stride, cx, cy) - center;
            Rgb([
                to_u8(luma + 1.402 * cr),
                to_u8(luma - 0.344136 * cb - 0.714136 * cr),
                to_u8(luma + 1.772 * cb),
            ])
        })
    }
}
