use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::info;

use crate::consts::OUTPUT_MIME_TYPE;
use crate::error::{CropperError, Result};

/// Encoded crop ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct CroppedFile {
    pub bytes: Vec<u8>,
    /// Original file name, kept as-is even though the content is now JPEG.
    pub name: String,
    pub mime_type: &'static str,
    pub last_modified: SystemTime,
}

impl CroppedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Wrap encoded bytes into a file named after the original selection.
pub fn package(bytes: Vec<u8>, original_name: &str) -> CroppedFile {
    CroppedFile {
        bytes,
        name: original_name.to_string(),
        mime_type: OUTPUT_MIME_TYPE,
        last_modified: SystemTime::now(),
    }
}

/// Receiver of finished crops. Returns the stored path assigned by the
/// destination.
pub trait Uploader {
    fn upload(&self, file: &CroppedFile) -> Result<String>;
}

/// Stores uploads as files inside a directory.
pub struct DirectoryUploader {
    root: PathBuf,
}

impl DirectoryUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Uploader for DirectoryUploader {
    fn upload(&self, file: &CroppedFile) -> Result<String> {
        // Only the final path component is honoured.
        let name = Path::new(&file.name)
            .file_name()
            .ok_or_else(|| CropperError::Upload(format!("invalid file name '{}'", file.name)))?;

        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        std::fs::write(&path, &file.bytes)?;

        info!(path = %path.display(), bytes = file.len(), "Stored cropped file");
        Ok(path.display().to_string())
    }
}
