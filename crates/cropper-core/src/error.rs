use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropperError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid output config: {0}")]
    InvalidConfig(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Encode was cancelled")]
    EncodeCancelled,

    #[error("Upload error: {0}")]
    Upload(String),
}

pub type Result<T> = std::result::Result<T, CropperError>;
