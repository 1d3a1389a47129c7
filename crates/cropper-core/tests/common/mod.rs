#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use cropper_core::source::SourceImage;

/// Image where every pixel encodes its own coordinates: r = x, g = y.
///
/// Width and height must be <= 256.
pub fn coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 128, 255]))
}

/// Smooth diagonal gradient, friendly to lossy encoding.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 255 / (width + height).max(1)) as u8;
        Rgba([r, g, b, 255])
    })
}

/// Concentric rings, symmetric under 90 degree rotations when square.
pub fn ring_image(size: u32) -> RgbaImage {
    let c = (size as f64 - 1.0) / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f64 - c;
        let dy = y as f64 - c;
        let ring = ((dx * dx + dy * dy).sqrt() / 4.0) as u32;
        let v = if ring % 2 == 0 { 230 } else { 25 };
        Rgba([v, v, v, 255])
    })
}

pub fn source_from(image: RgbaImage, name: &str) -> SourceImage {
    SourceImage::from_image(DynamicImage::ImageRgba8(image), name).expect("valid test image")
}

/// Encode an image as PNG bytes, as if read from a user-selected file.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}

/// Mean absolute per-channel difference over the RGB channels.
pub fn mean_abs_diff(a: &RgbaImage, b: &RgbaImage) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());
    let mut total = 0u64;
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        for i in 0..3 {
            total += (pa[i] as i64 - pb[i] as i64).unsigned_abs();
        }
    }
    total as f64 / (a.width() as f64 * a.height() as f64 * 3.0)
}
