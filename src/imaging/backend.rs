//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait is the only place pixel work happens. It has two
//! operations: identify (read dimensions without a full decode) and render
//! (decode, optional crop, optional resize, optional sharpen, encode).
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec). Tests use `MockCodec`,
//! which records operations and writes marker files instead of pixels.

use super::params::RenderParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Source bytes are not a supported image.
    #[error("Unknown type of file: {0}")]
    Decode(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Width over height, or `None` for degenerate images.
    pub fn aspect_ratio(self) -> Option<f64> {
        (self.width > 0 && self.height > 0).then(|| self.width as f64 / self.height as f64)
    }
}

/// Trait for image codecs.
///
/// Every operation is synchronous and bounded; callers that need timeouts
/// impose them from outside.
pub trait ImageCodec: Send + Sync {
    /// Read image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, CodecError>;

    /// Decode the source, apply the requested operations and write the
    /// output file at the requested quality. The output directory is created
    /// only once there is something to write.
    fn render(&self, params: &RenderParams) -> Result<(), CodecError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::identifier::{Crop, ResizeFlags};
    use crate::imaging::params::{ImageSource, ResizeParams};
    use std::sync::Mutex;

    /// Source content that the mock refuses to decode.
    pub const CORRUPT: &[u8] = b"not an image";

    /// Mock codec that records operations without doing pixel work.
    ///
    /// `render` writes a small marker file at the output path so that the
    /// filesystem-level cache behaves as it would with a real codec. Sources
    /// whose content equals [`CORRUPT`] fail to decode.
    #[derive(Default)]
    pub struct MockCodec {
        pub dimensions: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Render {
            source: String,
            output: String,
            crop: Option<Crop>,
            resize: Option<(u32, u32, ResizeFlags)>,
            sharpen: bool,
            quality: Option<u8>,
        },
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                dimensions: Mutex::new(dims),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn render_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Render { .. }))
                .count()
        }
    }

    impl ImageCodec for MockCodec {
        fn identify(&self, path: &Path) -> Result<Dimensions, CodecError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.dimensions
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| CodecError::Decode("No mock dimensions".to_string()))
        }

        fn render(&self, params: &RenderParams) -> Result<(), CodecError> {
            let (source, bytes) = match &params.source {
                ImageSource::File(path) => (path.to_string_lossy().to_string(), std::fs::read(path)?),
                ImageSource::Bytes(bytes) => ("<embedded>".to_string(), bytes.clone()),
            };
            self.operations.lock().unwrap().push(RecordedOp::Render {
                source,
                output: params.output.to_string_lossy().to_string(),
                crop: params.crop,
                resize: params
                    .resize
                    .map(|ResizeParams { width, height, flags }| (width, height, flags)),
                sharpen: params.sharpen,
                quality: params.quality,
            });
            if bytes == CORRUPT {
                return Err(CodecError::Decode("mock decode failure".to_string()));
            }
            if let Some(dir) = params.output.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&params.output, b"rendered")?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let codec = MockCodec::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = codec.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = codec.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_render_writes_marker_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.webp");
        let codec = MockCodec::new();

        codec
            .render(&RenderParams {
                source: ImageSource::Bytes(b"png".to_vec()),
                output: output.clone(),
                crop: None,
                resize: Some(ResizeParams {
                    width: 10,
                    height: 20,
                    flags: ResizeFlags::FILL,
                }),
                sharpen: true,
                quality: Some(80),
            })
            .unwrap();

        assert!(output.exists());
        assert_eq!(codec.render_count(), 1);
        assert!(matches!(
            &codec.get_operations()[0],
            RecordedOp::Render {
                resize: Some((10, 20, ResizeFlags::FILL)),
                sharpen: true,
                quality: Some(80),
                ..
            }
        ));
    }

    #[test]
    fn mock_render_fails_on_corrupt_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        let codec = MockCodec::new();

        let result = codec.render(&RenderParams {
            source: ImageSource::Bytes(CORRUPT.to_vec()),
            output: output.clone(),
            crop: None,
            resize: None,
            sharpen: false,
            quality: None,
        });

        assert!(matches!(result, Err(CodecError::Decode(_))));
        assert!(!output.exists());
    }

    #[test]
    fn aspect_ratio_of_degenerate_dimensions() {
        let flat = Dimensions {
            width: 10,
            height: 0,
        };
        assert_eq!(flat.aspect_ratio(), None);
        let wide = Dimensions {
            width: 1200,
            height: 600,
        };
        assert_eq!(wide.aspect_ratio(), Some(2.0));
    }
}
