use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use super::affine::Affine;
use crate::consts::{MAX_RASTER_PIXELS, PARALLEL_PIXEL_THRESHOLD};

/// Source region and destination rectangle of one `draw_image` call.
/// Destination coordinates are in the current user space of the canvas.
#[derive(Clone, Copy, Debug)]
pub struct DrawRegion {
    pub sx: f64,
    pub sy: f64,
    pub sw: f64,
    pub sh: f64,
    pub dx: f64,
    pub dy: f64,
    pub dw: f64,
    pub dh: f64,
}

/// RGBA raster with a canvas-style transform stack.
pub struct Canvas {
    raster: RgbaImage,
    transform: Affine,
    saved: Vec<Affine>,
}

impl Canvas {
    /// Allocate a transparent raster. Returns `None` when no raster of this
    /// size can be provided (zero area or above `MAX_RASTER_PIXELS`).
    pub fn new(width: u32, height: u32) -> Option<Canvas> {
        let pixels = width as u64 * height as u64;
        if pixels == 0 || pixels > MAX_RASTER_PIXELS {
            return None;
        }
        Some(Canvas {
            raster: RgbaImage::new(width, height),
            transform: Affine::IDENTITY,
            saved: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn clear(&mut self) {
        self.raster
            .pixels_mut()
            .for_each(|p| *p = Rgba([0, 0, 0, 0]));
    }

    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    pub fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.transform = t;
        }
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.transform = self.transform.translate(tx, ty);
    }

    pub fn rotate_degrees(&mut self, degrees: i64) {
        self.transform = self.transform.rotate_degrees(degrees);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.scale(sx, sy);
    }

    /// Draw `region` of `source` through the current transform with
    /// bilinear filtering and source-over compositing.
    ///
    /// Nothing is drawn if the transform is singular or the region is empty.
    pub fn draw_image(&mut self, source: &RgbaImage, region: &DrawRegion) {
        if !(region.sw > 0.0 && region.sh > 0.0 && region.dw > 0.0 && region.dh > 0.0) {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };

        let width = self.raster.width() as usize;
        let height = self.raster.height() as usize;
        let sampler = RegionSampler::new(source, region);

        let draw_row = |(row, line): (usize, &mut [u8])| {
            for col in 0..width {
                let (ux, uy) = inverse.apply(col as f64 + 0.5, row as f64 + 0.5);
                if let Some(src) = sampler.sample(ux, uy) {
                    let px = &mut line[col * 4..col * 4 + 4];
                    blend_over(px, src);
                }
            }
        };

        let stride = width * 4;
        let buf: &mut [u8] = &mut self.raster;
        if width * height >= PARALLEL_PIXEL_THRESHOLD {
            buf.par_chunks_mut(stride).enumerate().for_each(draw_row);
        } else {
            buf.chunks_mut(stride).enumerate().for_each(draw_row);
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.raster
    }
}

/// Maps destination user-space points into the source region and samples it.
struct RegionSampler<'a> {
    source: &'a RgbaImage,
    region: DrawRegion,
    // Inclusive pixel index bounds of the source region clipped to the image.
    x_min: i64,
    x_max: i64,
    y_min: i64,
    y_max: i64,
}

impl<'a> RegionSampler<'a> {
    fn new(source: &'a RgbaImage, region: &DrawRegion) -> Self {
        let (w, h) = (source.width() as i64, source.height() as i64);
        Self {
            source,
            region: *region,
            x_min: (region.sx.floor() as i64).max(0),
            x_max: ((region.sx + region.sw).ceil() as i64 - 1).min(w - 1),
            y_min: (region.sy.floor() as i64).max(0),
            y_max: ((region.sy + region.sh).ceil() as i64 - 1).min(h - 1),
        }
    }

    fn sample(&self, ux: f64, uy: f64) -> Option<[f32; 4]> {
        let r = &self.region;
        if ux < r.dx || ux >= r.dx + r.dw || uy < r.dy || uy >= r.dy + r.dh {
            return None;
        }

        let sx = r.sx + (ux - r.dx) / r.dw * r.sw;
        let sy = r.sy + (uy - r.dy) / r.dh * r.sh;

        // Outside the decoded image nothing is drawn.
        if sx < 0.0
            || sy < 0.0
            || sx >= self.source.width() as f64
            || sy >= self.source.height() as f64
            || self.x_min > self.x_max
            || self.y_min > self.y_max
        {
            return None;
        }

        Some(self.bilinear(sx - 0.5, sy - 0.5))
    }

    fn bilinear(&self, x: f64, y: f64) -> [f32; 4] {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let fx = (x - x0 as f64) as f32;
        let fy = (y - y0 as f64) as f32;

        let taps = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x0 + 1, y0, fx * (1.0 - fy)),
            (x0, y0 + 1, (1.0 - fx) * fy),
            (x0 + 1, y0 + 1, fx * fy),
        ];

        // Interpolate premultiplied colour so transparent texels do not bleed.
        let mut acc = [0.0f32; 4];
        for (tx, ty, weight) in taps {
            if weight == 0.0 {
                continue;
            }
            let cx = tx.clamp(self.x_min, self.x_max) as u32;
            let cy = ty.clamp(self.y_min, self.y_max) as u32;
            let Rgba([pr, pg, pb, pa]) = *self.source.get_pixel(cx, cy);
            let a = pa as f32 / 255.0;
            acc[0] += pr as f32 * a * weight;
            acc[1] += pg as f32 * a * weight;
            acc[2] += pb as f32 * a * weight;
            acc[3] += a * weight;
        }

        if acc[3] <= 0.0 {
            return [0.0; 4];
        }
        [acc[0] / acc[3], acc[1] / acc[3], acc[2] / acc[3], acc[3]]
    }
}

/// Source-over blend of a straight-alpha `src` (rgb 0..255, alpha 0..1)
/// into an RGBA8 destination pixel.
fn blend_over(dst: &mut [u8], src: [f32; 4]) {
    let sa = src[3];
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    for i in 0..3 {
        let c = if da == 0.0 {
            src[i]
        } else {
            (src[i] * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a
        };
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
