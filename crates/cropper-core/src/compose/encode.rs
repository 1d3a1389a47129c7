use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage, RgbaImage};
use tracing::{debug, warn};

use crate::error::{CropperError, Result};

/// Convert a `(0, 1]` quality into the encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Flatten onto opaque black. JPEG has no alpha channel, and an unpainted
/// canvas pixel is transparent black.
pub fn flatten_on_black(raster: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
        let [r, g, b, a] = raster.get_pixel(x, y).0;
        let alpha = a as u16;
        image::Rgb([
            ((r as u16 * alpha + 127) / 255) as u8,
            ((g as u16 * alpha + 127) / 255) as u8,
            ((b as u16 * alpha + 127) / 255) as u8,
        ])
    })
}

/// Encode a raster as JPEG at `quality` in `(0, 1]`.
pub fn encode_jpeg(raster: &RgbaImage, quality: f32) -> Result<Vec<u8>> {
    let rgb = flatten_on_black(raster);
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality))
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CropperError::Encode(e.to_string()))?;
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = bytes.len(),
        "Encoded JPEG"
    );
    Ok(bytes)
}

/// Shared flag used to abandon an in-flight encode.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A single-shot encode running on its own thread.
///
/// Once the handle is cancelled the result is discarded, even if the
/// encoder already finished.
pub struct PendingEncode {
    handle: JoinHandle<Result<Vec<u8>>>,
    token: CancelToken,
}

impl PendingEncode {
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the encoder thread has finished (successfully or not).
    pub fn is_ready(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the encode resolves.
    pub fn join(self) -> Result<Vec<u8>> {
        let result = self
            .handle
            .join()
            .map_err(|_| CropperError::Encode("encoder thread panicked".into()))?;
        if self.token.is_cancelled() {
            return Err(CropperError::EncodeCancelled);
        }
        result
    }

    /// Block until the encode resolves, yielding `None` when it was
    /// cancelled or produced no output.
    pub fn wait(self) -> Option<Vec<u8>> {
        match self.join() {
            Ok(bytes) => Some(bytes),
            Err(CropperError::EncodeCancelled) => {
                debug!("Encode cancelled");
                None
            }
            Err(e) => {
                warn!(error = %e, "Encode produced no output");
                None
            }
        }
    }
}

/// Start encoding `raster` in the background. The raster is moved into the
/// worker and dropped once encoding completes.
pub fn spawn_encode(raster: RgbaImage, quality: f32) -> Result<PendingEncode> {
    spawn_encode_with_token(raster, quality, CancelToken::new())
}

pub fn spawn_encode_with_token(
    raster: RgbaImage,
    quality: f32,
    token: CancelToken,
) -> Result<PendingEncode> {
    let worker_token = token.clone();
    let handle = std::thread::Builder::new()
        .name("cropper-encode".into())
        .spawn(move || {
            if worker_token.is_cancelled() {
                return Err(CropperError::EncodeCancelled);
            }
            encode_jpeg(&raster, quality)
        })?;

    Ok(PendingEncode { handle, token })
}
