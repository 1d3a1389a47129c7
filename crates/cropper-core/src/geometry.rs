use serde::{Deserialize, Serialize};

use crate::config::OutputSizing;
use crate::consts::INITIAL_CROP_FRACTION;

/// Width/height pair in pixels. Fractional values are allowed because
/// display sizes and mapped crop sizes are rarely integral.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// A crop selection. Which coordinate space it lives in depends on the
/// caller: session crops are in display coordinates, mapped crops are in
/// natural image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Map a rectangle from the on-screen image element to the natural pixel grid.
    pub fn to_natural(&self, display: Size, natural: Size) -> CropRect {
        let scale_x = natural.width / display.width;
        let scale_y = natural.height / display.height;

        CropRect {
            x: self.x * scale_x,
            y: self.y * scale_y,
            width: self.width * scale_x,
            height: self.height * scale_y,
        }
    }

    /// Snap a free-form selection to `aspect`, widen it to at least
    /// `min_width`, and keep it inside `bounds`. The centre is preserved
    /// where the bounds allow it.
    pub fn constrained(&self, aspect: f64, min_width: f64, bounds: Size) -> CropRect {
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;

        let mut w = self.width.max(min_width);
        let mut h = w / aspect;

        if h > bounds.height {
            h = bounds.height;
            w = h * aspect;
        }
        if w > bounds.width {
            w = bounds.width;
            h = w / aspect;
        }

        CropRect {
            x: (cx - w / 2.0).max(0.0).min(bounds.width - w),
            y: (cy - h / 2.0).max(0.0).min(bounds.height - h),
            width: w,
            height: h,
        }
    }
}

/// Compute the centered starting crop for an image of `width` x `height`.
///
/// The rectangle follows `aspect_ratio`, covers 80% of the limiting
/// dimension, and is capped by `max_width` / `max_height` on that same
/// dimension. `aspect_ratio` must be positive.
pub fn compute_initial_crop(
    width: f64,
    height: f64,
    aspect_ratio: f64,
    max_width: f64,
    max_height: f64,
) -> CropRect {
    let (crop_width, crop_height) = if width / height > aspect_ratio {
        // Wider than the target: height limits.
        let crop_height = (height * INITIAL_CROP_FRACTION).min(max_height);
        (crop_height * aspect_ratio, crop_height)
    } else {
        let crop_width = (width * INITIAL_CROP_FRACTION).min(max_width);
        (crop_width, crop_width / aspect_ratio)
    };

    CropRect {
        x: (width - crop_width) / 2.0,
        y: (height - crop_height) / 2.0,
        width: crop_width,
        height: crop_height,
    }
}

/// Size of the output raster for a crop of `crop` natural pixels.
///
/// `Independent` clamps each axis on its own, which distorts the crop when
/// only one axis exceeds its cap. `Proportional` applies one shared factor.
pub fn output_size(crop: Size, max_width: f64, max_height: f64, sizing: OutputSizing) -> Size {
    match sizing {
        OutputSizing::Independent => {
            Size::new(crop.width.min(max_width), crop.height.min(max_height))
        }
        OutputSizing::Proportional => {
            let factor = (max_width / crop.width)
                .min(max_height / crop.height)
                .min(1.0);
            Size::new(crop.width * factor, crop.height * factor)
        }
    }
}
