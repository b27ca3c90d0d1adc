//! End-to-end tests against the real codec.
//!
//! Every test works in its own temp directory with synthetic sources
//! generated by the `image` crate, so no fixtures are needed.

use image::{ImageFormat, RgbImage};
use image_storage::config::StorageConfig;
use image_storage::imaging::{ImageCodec, RustCodec};
use image_storage::{HandleStatus, ImageRequest, ImageStorage, Upload};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn storage(tmp: &TempDir, shared: bool) -> ImageStorage {
    let config = StorageConfig {
        data_path: tmp.path().join("data"),
        orig_path: if shared {
            tmp.path().join("data")
        } else {
            tmp.path().join("orig")
        },
        ..StorageConfig::default()
    };
    ImageStorage::from_config(&config).unwrap()
}

fn dims(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

#[test]
fn save_then_resolve_produces_real_derivative() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, false);

    let saved = storage
        .save_content(&encoded(400, 200, ImageFormat::Jpeg), "Beach Day.JPG", "gallery", None)
        .unwrap();
    assert!(saved.identifier().starts_with("gallery/"));
    assert!(saved.identifier().ends_with("/beach-day.jpg"));
    assert_eq!(saved.original_name(), Some("beach-day.jpg"));

    let handle = storage
        .resolve(&ImageRequest::new(saved.identifier()).size("100x100").keep_format())
        .unwrap();
    assert!(handle.identifier().ends_with("/beach-day.100x100.fit.q85.jpg"));
    assert_eq!(dims(handle.path().unwrap()), (100, 50));
}

#[test]
fn png_converts_to_webp() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);

    let saved = storage
        .save_content(&encoded(120, 80, ImageFormat::Png), "chart.png", "docs", None)
        .unwrap();
    let handle = storage
        .resolve(&ImageRequest::new(saved.identifier()).size("60x60").flag("exact"))
        .unwrap();

    assert!(handle.identifier().ends_with("/chart.60x60.exact.q80.webp"));
    assert_eq!(dims(handle.path().unwrap()), (60, 60));
}

#[test]
fn resolving_twice_leaves_the_derivative_untouched() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);
    let saved = storage
        .save_content(&encoded(64, 64, ImageFormat::Jpeg), "a.jpg", "ns", None)
        .unwrap();
    let request = ImageRequest::new(saved.identifier()).size("32x32");

    let first = storage.resolve(&request).unwrap();
    let bytes = fs::read(first.path().unwrap()).unwrap();
    let modified = fs::metadata(first.path().unwrap()).unwrap().modified().unwrap();

    let second = storage.resolve(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(second.path().unwrap()).unwrap(), bytes);
    assert_eq!(
        fs::metadata(second.path().unwrap()).unwrap().modified().unwrap(),
        modified
    );
}

#[test]
fn srcset_follows_original_aspect_ratio() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);
    let saved = storage
        .save_content(&encoded(300, 150, ImageFormat::Jpeg), "wide.jpg", "ns", None)
        .unwrap();
    let request = ImageRequest::new(saved.identifier()).keep_format();

    let srcset = storage.create_srcset(&request, &["100", "200"], "").unwrap();
    let entries: Vec<&str> = srcset.split(", ").collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].ends_with("/wide.100x50.fit.q85.jpg 100w"));
    assert!(entries[1].ends_with("/wide.200x100.fit.q85.jpg 200w"));

    // links are "/<data_dir>/<identifier>" and data_dir matches the tree name
    let link = entries[1].trim_start_matches('/').trim_end_matches(" 200w");
    let derivative = tmp.path().join(link);
    assert_eq!(dims(&derivative), (200, 100));
}

#[test]
fn missing_source_serves_placeholder_at_requested_size() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, false);

    let handle = storage
        .resolve(&ImageRequest::new("gallery/ab/gone.jpg").size("100x100").flag("exact"))
        .unwrap();

    assert!(handle.is_ready());
    assert_eq!(handle.identifier(), "noimage/03/no-image.100x100.exact.q6.png");
    assert_eq!(dims(handle.path().unwrap()), (100, 100));
    assert!(tmp.path().join("orig/noimage/03/no-image.png").is_file());
}

#[test]
fn corrupt_original_is_unknown_format() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);
    let saved = storage
        .save_content(b"this is not a jpeg", "broken.jpg", "ns", None)
        .unwrap();

    let handle = storage
        .resolve(&ImageRequest::new(saved.identifier()).size("10x10"))
        .unwrap();
    assert_eq!(handle.status(), HandleStatus::UnknownFormat);
    assert_eq!(handle.create_link(), "#");
}

#[test]
fn avif_original_renders_and_plans_srcset() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);
    let saved = storage
        .save_content(&encoded(40, 20, ImageFormat::Avif), "clip.avif", "ns", None)
        .unwrap();

    let handle = storage
        .resolve(&ImageRequest::new(saved.identifier()).size("20x20").flag("exact"))
        .unwrap();
    assert!(handle.is_ready());
    assert!(handle.identifier().contains("/clip.20x20.exact."));
    assert!(handle.identifier().ends_with(".avif"));
    let rendered = RustCodec::new().identify(handle.path().unwrap()).unwrap();
    assert_eq!((rendered.width, rendered.height), (20, 20));

    let planned = storage.plan_srcset(saved.identifier(), &["10"]).unwrap();
    assert_eq!(planned[0].size, "10x5");
}

#[test]
fn format_without_encoder_is_unknown_format() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, false);
    let saved = storage
        .save_content(&encoded(32, 32, ImageFormat::Jpeg), "photo.jfif", "ns", Some("ab"))
        .unwrap();

    let handle = storage
        .resolve(&ImageRequest::new(saved.identifier()).size("10x10"))
        .unwrap();
    assert_eq!(handle.status(), HandleStatus::UnknownFormat);
    assert!(!tmp.path().join("data/ns").exists());
}

#[test]
fn upload_is_moved_and_collides_by_name() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);
    let bytes = encoded(16, 16, ImageFormat::Png);

    let mut identifiers = Vec::new();
    for i in 0..3 {
        let temp = tmp.path().join(format!("upload-{i}"));
        fs::write(&temp, &bytes).unwrap();
        let handle = storage
            .save_upload(&Upload::new(&temp, "icon.png"), "icons", Some("ff00"))
            .unwrap();
        assert!(!temp.exists());
        identifiers.push(handle.identifier().to_string());
    }

    assert_eq!(
        identifiers,
        ["icons/ff/icon.png", "icons/ff/icon.2.png", "icons/ff/icon.3.png"]
    );
}

#[test]
fn delete_removes_original_and_derivatives() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(&tmp, true);
    let saved = storage
        .save_content(&encoded(50, 50, ImageFormat::Jpeg), "pic.jpg", "ns", Some("abcd"))
        .unwrap();
    let derivative = storage
        .resolve(&ImageRequest::new(saved.identifier()).size("20x20"))
        .unwrap();
    let dir = tmp.path().join("data/ns/ab");

    storage.delete(saved.identifier(), true).unwrap();
    assert!(dir.join("pic.jpg").exists());
    assert!(!derivative.path().unwrap().exists());

    storage.delete_handle(&saved, false).unwrap();
    assert!(!dir.join("pic.jpg").exists());
}
