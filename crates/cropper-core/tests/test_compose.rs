mod common;

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use cropper_core::compose::{compose, encode_jpeg, spawn_encode, CancelToken};
use cropper_core::config::{OutputSizing, OutputSpec};
use cropper_core::geometry::{CropRect, Size};
use cropper_core::transform::{RotationDirection, TransformState, ZoomDirection};

use common::{coordinate_image, gradient_image, mean_abs_diff, ring_image, source_from};

fn wide_open_spec() -> OutputSpec {
    OutputSpec {
        max_width: 10_000.0,
        max_height: 10_000.0,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Null results
// ---------------------------------------------------------------------------

#[test]
fn test_compose_without_completed_crop_is_none() {
    let source = source_from(gradient_image(32, 32), "a.png");
    let out = compose(&source, None, &TransformState::default(), &wide_open_spec());
    assert!(out.is_none());
}

#[test]
fn test_compose_with_sub_pixel_output_is_none() {
    let source = source_from(gradient_image(32, 32), "a.png");
    let crop = CropRect::new(4.0, 4.0, 0.5, 10.0);
    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec());
    assert!(out.is_none());
}

#[test]
fn test_compose_with_degenerate_crop_is_none() {
    let source = source_from(gradient_image(32, 32), "a.png");
    let transform = TransformState::default();
    let spec = wide_open_spec();
    for crop in [
        CropRect::new(4.0, 4.0, 0.0, 10.0),
        CropRect::new(4.0, 4.0, 10.0, -3.0),
        CropRect::new(4.0, 4.0, f64::NAN, 10.0),
    ] {
        assert!(compose(&source, Some(&crop), &transform, &spec).is_none());
    }
}

// ---------------------------------------------------------------------------
// Geometry of the output raster
// ---------------------------------------------------------------------------

#[test]
fn test_full_crop_reproduces_source_pixels() {
    let img = coordinate_image(40, 30);
    let source = source_from(img.clone(), "a.png");
    let crop = CropRect::new(0.0, 0.0, 40.0, 30.0);

    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec()).unwrap();
    assert_eq!(out, img);
}

#[test]
fn test_sub_region_is_extracted() {
    let img = coordinate_image(64, 48);
    let source = source_from(img.clone(), "a.png");
    let crop = CropRect::new(10.0, 5.0, 20.0, 12.0);

    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec()).unwrap();
    assert_eq!(out.dimensions(), (20, 12));
    for (x, y, px) in out.enumerate_pixels() {
        assert_eq!(px, img.get_pixel(x + 10, y + 5), "at {x},{y}");
    }
}

#[test]
fn test_display_crop_is_mapped_to_natural_pixels() {
    let img = coordinate_image(200, 100);
    let source = source_from(img.clone(), "a.png")
        .with_display_size(Size::new(100.0, 50.0))
        .unwrap();
    let crop = CropRect::new(10.0, 10.0, 50.0, 25.0);

    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec()).unwrap();
    assert_eq!(out.dimensions(), (100, 50));
    for (x, y, px) in out.enumerate_pixels() {
        assert_eq!(px, img.get_pixel(x + 20, y + 20), "at {x},{y}");
    }
}

#[test]
fn test_fractional_output_size_is_truncated() {
    let source = source_from(gradient_image(100, 100), "a.png");
    let crop = CropRect::new(0.0, 0.0, 81.9, 46.8);
    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec()).unwrap();
    assert_eq!(out.dimensions(), (81, 46));
}

#[test]
fn test_independent_clamp_may_distort() {
    let source = source_from(gradient_image(200, 100), "a.png");
    let crop = CropRect::new(0.0, 0.0, 200.0, 100.0);
    let spec = OutputSpec {
        max_width: 80.0,
        max_height: 80.0,
        ..Default::default()
    };
    let out = compose(&source, Some(&crop), &TransformState::default(), &spec).unwrap();
    assert_eq!(out.dimensions(), (80, 80));
}

#[test]
fn test_proportional_clamp_keeps_aspect() {
    let source = source_from(gradient_image(200, 100), "a.png");
    let crop = CropRect::new(0.0, 0.0, 200.0, 100.0);
    let spec = OutputSpec {
        max_width: 80.0,
        max_height: 80.0,
        sizing: OutputSizing::Proportional,
        ..Default::default()
    };
    let out = compose(&source, Some(&crop), &TransformState::default(), &spec).unwrap();
    assert_eq!(out.dimensions(), (80, 40));
}

#[test]
fn test_crop_outside_image_is_transparent() {
    let source = source_from(gradient_image(20, 20), "a.png");
    let crop = CropRect::new(10.0, 0.0, 20.0, 20.0);
    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec()).unwrap();
    assert_eq!(out.get_pixel(0, 0)[3], 255);
    assert_eq!(out.get_pixel(19, 0)[3], 0);
}

// ---------------------------------------------------------------------------
// Rotation and scale
// ---------------------------------------------------------------------------

#[test]
fn test_full_turn_matches_unrotated() {
    let source = source_from(ring_image(48), "a.png");
    let crop = CropRect::new(0.0, 0.0, 48.0, 48.0);
    let spec = wide_open_spec();

    let mut turned = TransformState::default();
    for _ in 0..4 {
        turned.rotate(RotationDirection::Clockwise);
    }
    assert_eq!(turned.rotation_degrees(), 360);

    let plain = compose(&source, Some(&crop), &TransformState::default(), &spec).unwrap();
    let rotated = compose(&source, Some(&crop), &turned, &spec).unwrap();
    assert_eq!(plain, rotated);
}

#[test]
fn test_quarter_turn_rotates_clockwise() {
    let img = coordinate_image(16, 16);
    let source = source_from(img.clone(), "a.png");
    let crop = CropRect::new(0.0, 0.0, 16.0, 16.0);
    let mut t = TransformState::default();
    t.rotate(RotationDirection::Clockwise);

    let out = compose(&source, Some(&crop), &t, &wide_open_spec()).unwrap();
    for (x, y, px) in out.enumerate_pixels() {
        assert_eq!(px, img.get_pixel(y, 15 - x), "at {x},{y}");
    }
}

#[test]
fn test_half_turn_flips_both_axes() {
    let img = coordinate_image(20, 12);
    let source = source_from(img.clone(), "a.png");
    let crop = CropRect::new(0.0, 0.0, 20.0, 12.0);
    let mut t = TransformState::default();
    t.rotate(RotationDirection::CounterClockwise);
    t.rotate(RotationDirection::CounterClockwise);

    let out = compose(&source, Some(&crop), &t, &wide_open_spec()).unwrap();
    for (x, y, px) in out.enumerate_pixels() {
        assert_eq!(px, img.get_pixel(19 - x, 11 - y), "at {x},{y}");
    }
}

#[test]
fn test_quarter_turn_on_landscape_leaves_uncovered_corners() {
    let source = source_from(gradient_image(40, 20), "a.png");
    let crop = CropRect::new(0.0, 0.0, 40.0, 20.0);
    let mut t = TransformState::default();
    t.rotate(RotationDirection::Clockwise);

    let out = compose(&source, Some(&crop), &t, &wide_open_spec()).unwrap();
    assert_eq!(out.dimensions(), (40, 20));
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(20, 10)[3], 255);
}

#[test]
fn test_scale_pivots_on_center_and_keeps_output_extent() {
    let img = coordinate_image(32, 24);
    let source = source_from(img, "a.png");
    let crop = CropRect::new(0.0, 0.0, 32.0, 24.0);
    let spec = wide_open_spec();

    let plain = compose(&source, Some(&crop), &TransformState::default(), &spec).unwrap();
    for direction in [ZoomDirection::In, ZoomDirection::Out] {
        let mut t = TransformState::default();
        for _ in 0..3 {
            t.zoom(direction);
        }
        let zoomed = compose(&source, Some(&crop), &t, &spec).unwrap();
        assert_eq!(zoomed.dimensions(), plain.dimensions());
        assert!(mean_abs_diff(&plain, &zoomed) < 0.5);
    }
}

#[test]
fn test_large_output_composes_in_parallel_identically() {
    let img = gradient_image(400, 300);
    let source = source_from(img.clone(), "a.png");
    let crop = CropRect::new(0.0, 0.0, 400.0, 300.0);
    let out = compose(&source, Some(&crop), &TransformState::default(), &wide_open_spec()).unwrap();
    assert_eq!(out, img);
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn test_encode_jpeg_is_similar_to_raster() {
    let img = gradient_image(64, 48);
    let bytes = encode_jpeg(&img, 0.95).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);

    let decoded = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .unwrap()
        .decode()
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 48));
    assert!(mean_abs_diff(&img, &decoded) < 4.0);
}

#[test]
fn test_lower_quality_is_smaller() {
    let img = common::ring_image(128);
    let high = encode_jpeg(&img, 0.95).unwrap();
    let low = encode_jpeg(&img, 0.2).unwrap();
    assert!(low.len() < high.len());
}

#[test]
fn test_background_encode_resolves() {
    let img = gradient_image(32, 32);
    let pending = spawn_encode(img, 0.95).unwrap();
    let bytes = pending.wait().unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_cancelled_encode_yields_nothing() {
    let token = CancelToken::new();
    token.cancel();
    let pending =
        cropper_core::compose::spawn_encode_with_token(gradient_image(32, 32), 0.95, token)
            .unwrap();
    assert!(pending.wait().is_none());
}

#[test]
fn test_cancel_after_start_discards_result() {
    let pending = spawn_encode(gradient_image(32, 32), 0.95).unwrap();
    pending.cancel();
    assert!(matches!(
        pending.join(),
        Err(cropper_core::error::CropperError::EncodeCancelled)
    ));
}

#[test]
fn test_background_encode_reports_ready_before_wait() {
    let pending = spawn_encode(gradient_image(32, 32), 0.95).unwrap();
    while !pending.is_ready() {
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    let bytes = pending.wait().unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_cloned_token_cancels_encode() {
    let pending = spawn_encode(gradient_image(32, 32), 0.95).unwrap();
    let token = pending.token();
    assert!(!token.is_cancelled());
    token.cancel();
    assert!(pending.token().is_cancelled());
    assert!(pending.wait().is_none());
}
