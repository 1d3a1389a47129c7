pub mod affine;
pub mod canvas;
pub mod encode;

pub use affine::Affine;
pub use canvas::{Canvas, DrawRegion};
pub use encode::{encode_jpeg, spawn_encode, spawn_encode_with_token, CancelToken, PendingEncode};

use image::RgbaImage;
use tracing::{debug, warn};

use crate::config::OutputSpec;
use crate::geometry::{output_size, CropRect, Size};
use crate::source::SourceImage;
use crate::transform::TransformState;

/// Render the completed crop of `source` into a new raster.
///
/// `crop` is in display coordinates. Returns `None` when no crop has been
/// completed yet, when the crop has no area, or when no raster can be allocated for the output size.
pub fn compose(
    source: &SourceImage,
    crop: Option<&CropRect>,
    transform: &TransformState,
    spec: &OutputSpec,
) -> Option<RgbaImage> {
    let Some(crop) = crop else {
        debug!("Compose skipped: no completed crop");
        return None;
    };
    if crop.is_empty() {
        debug!(?crop, "Compose skipped: degenerate crop");
        return None;
    }

    let natural = crop.to_natural(source.display_size(), source.natural_size());
    let output = output_size(
        Size::new(natural.width, natural.height),
        spec.max_width,
        spec.max_height,
        spec.sizing,
    );

    // Raster dimensions are integral; fractional sizes are truncated.
    let Some(mut canvas) = Canvas::new(output.width as u32, output.height as u32) else {
        warn!(
            width = output.width,
            height = output.height,
            "Compose failed: raster unavailable for output size"
        );
        return None;
    };

    debug!(
        crop_x = natural.x,
        crop_y = natural.y,
        crop_w = natural.width,
        crop_h = natural.height,
        out_w = canvas.width(),
        out_h = canvas.height(),
        rotation = transform.rotation_degrees(),
        scale = transform.scale(),
        "Composing crop"
    );

    let scale = transform.scale();
    let pixels = source.image().to_rgba8();

    canvas.clear();
    canvas.save();
    canvas.translate(canvas.width() as f64 / 2.0, canvas.height() as f64 / 2.0);
    canvas.rotate_degrees(transform.rotation_degrees());
    canvas.scale(scale, scale);
    canvas.draw_image(
        &pixels,
        &DrawRegion {
            sx: natural.x,
            sy: natural.y,
            sw: natural.width,
            sh: natural.height,
            dx: -output.width / (2.0 * scale),
            dy: -output.height / (2.0 * scale),
            dw: output.width / scale,
            dh: output.height / scale,
        },
    );
    canvas.restore();

    Some(canvas.into_image())
}
