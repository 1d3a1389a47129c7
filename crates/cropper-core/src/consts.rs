/// Fraction of the limiting image dimension covered by the initial crop.
pub const INITIAL_CROP_FRACTION: f64 = 0.8;

/// Multiplicative step applied by a single zoom in/out.
pub const ZOOM_STEP: f64 = 1.1;

/// Lower bound of the user scale factor.
pub const MIN_SCALE: f64 = 0.5;

/// Upper bound of the user scale factor.
pub const MAX_SCALE: f64 = 3.0;

/// Degrees added or removed by one rotate action.
pub const ROTATION_STEP_DEGREES: i64 = 90;

/// Encoder quality used by every known destination.
pub const DEFAULT_QUALITY: f32 = 0.95;

/// Default aspect ratio (16:9 widescreen).
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Default minimum crop width, in display pixels.
pub const DEFAULT_MIN_WIDTH: f64 = 200.0;

/// Default output raster width cap.
pub const DEFAULT_MAX_WIDTH: f64 = 1920.0;

/// Default output raster height cap.
pub const DEFAULT_MAX_HEIGHT: f64 = 1080.0;

/// Largest output raster (in pixels) the compositor will allocate.
/// Equal to a 16384 x 16384 raster.
pub const MAX_RASTER_PIXELS: u64 = 268_435_456;

/// Minimum pixel count (h*w) to compose rows in parallel with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// MIME type of every packaged output file.
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";
