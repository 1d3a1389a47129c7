use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use crate::error::{CropperError, Result};
use crate::geometry::Size;

/// A decoded source image together with the size it is shown at.
///
/// The natural size is the decoded pixel grid. The display size is the
/// rendered size of the image element, which is where crop rectangles are
/// drawn by the user.
#[derive(Clone, Debug)]
pub struct SourceImage {
    bytes: Vec<u8>,
    file_name: String,
    format: Option<ImageFormat>,
    image: DynamicImage,
    display: Size,
}

impl SourceImage {
    /// Decode an in-memory file. The format is sniffed from the content.
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self> {
        let format = image::guess_format(&bytes).ok();
        let image = image::load_from_memory(&bytes)?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CropperError::InvalidDimensions { width, height });
        }

        let file_name = file_name.into();
        debug!(file = %file_name, width, height, ?format, "Decoded source image");

        Ok(Self {
            bytes,
            file_name,
            format,
            image,
            display: Size::from_pixels(width, height),
        })
    }

    /// Read and decode a file from disk, keeping its file name.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Self::from_bytes(bytes, file_name)
    }

    /// Wrap an already decoded image. Used when the raster was produced in memory.
    pub fn from_image(image: DynamicImage, file_name: impl Into<String>) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CropperError::InvalidDimensions { width, height });
        }
        Ok(Self {
            bytes: Vec::new(),
            file_name: file_name.into(),
            format: None,
            image,
            display: Size::from_pixels(width, height),
        })
    }

    /// Set the on-screen size of the image element.
    pub fn with_display_size(mut self, display: Size) -> Result<Self> {
        if !(display.width > 0.0 && display.height > 0.0) {
            return Err(CropperError::InvalidDimensions {
                width: display.width as u32,
                height: display.height as u32,
            });
        }
        self.display = display;
        Ok(self)
    }

    /// Shrink the display size to fit a `max_width` x `max_height` viewport,
    /// preserving aspect ratio. Images already inside the viewport keep their
    /// natural size.
    pub fn fit_to_viewport(self, max_width: f64, max_height: f64) -> Result<Self> {
        let natural = self.natural_size();
        let scale = (max_width / natural.width)
            .min(max_height / natural.height)
            .min(1.0);
        self.with_display_size(Size::new(natural.width * scale, natural.height * scale))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Original file bytes as selected by the user. Empty for in-memory images.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// MIME type of the source file, when the format could be detected.
    pub fn source_mime(&self) -> Option<&'static str> {
        self.format.map(|f| f.to_mime_type())
    }

    pub fn natural_size(&self) -> Size {
        let (w, h) = self.image.dimensions();
        Size::from_pixels(w, h)
    }

    pub fn display_size(&self) -> Size {
        self.display
    }
}
