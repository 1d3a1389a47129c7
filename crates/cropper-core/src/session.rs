use image::RgbaImage;
use tracing::{debug, info};

use crate::compose::{compose, spawn_encode, CancelToken, PendingEncode};
use crate::config::OutputSpec;
use crate::error::Result;
use crate::geometry::{compute_initial_crop, CropRect};
use crate::package::{package, CroppedFile};
use crate::source::SourceImage;
use crate::transform::{RotationDirection, TransformState, ZoomDirection};

/// User actions accepted by a [`CropSession`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionCommand {
    /// Live selection update while the user drags or resizes.
    SetCrop(CropRect),
    /// The selection was released; this is the rectangle that gets exported.
    CompleteCrop(CropRect),
    Rotate(RotationDirection),
    Zoom(ZoomDirection),
    SetScale(f64),
    /// Recompute the live selection. Rotation and scale are kept.
    Reset,
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Applied(CroppedFile),
    Cancelled,
}

/// Callbacks of the component that opened the cropper.
pub trait CropHandler {
    fn on_crop_complete(&mut self, file: CroppedFile);
    fn on_cancel(&mut self);
}

impl<F: FnMut(SessionOutcome)> CropHandler for F {
    fn on_crop_complete(&mut self, file: CroppedFile) {
        self(SessionOutcome::Applied(file))
    }

    fn on_cancel(&mut self) {
        self(SessionOutcome::Cancelled)
    }
}

/// One cropper invocation, from file selection to apply or cancel.
///
/// Every mutation goes through [`CropSession::dispatch`]. Crop rectangles are
/// in display coordinates of the source image.
pub struct CropSession {
    source: SourceImage,
    spec: OutputSpec,
    crop: CropRect,
    completed: Option<CropRect>,
    transform: TransformState,
}

impl CropSession {
    pub fn new(source: SourceImage, spec: OutputSpec) -> Result<Self> {
        spec.validate()?;
        let crop = initial_crop_for(&source, &spec);

        let natural = source.natural_size();
        info!(
            file = source.file_name(),
            width = natural.width,
            height = natural.height,
            aspect = spec.aspect_ratio,
            "Crop session started"
        );

        Ok(Self {
            source,
            spec,
            crop,
            completed: None,
            transform: TransformState::default(),
        })
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn spec(&self) -> &OutputSpec {
        &self.spec
    }

    /// Current live selection.
    pub fn crop(&self) -> CropRect {
        self.crop
    }

    /// Last finalized selection, if any.
    pub fn completed_crop(&self) -> Option<CropRect> {
        self.completed
    }

    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn dispatch(&mut self, command: SessionCommand) {
        debug!(?command, "Dispatch");
        match command {
            SessionCommand::SetCrop(rect) => self.crop = rect,
            SessionCommand::CompleteCrop(rect) => {
                self.crop = rect;
                self.completed = Some(rect);
            }
            SessionCommand::Rotate(direction) => self.transform.rotate(direction),
            SessionCommand::Zoom(direction) => self.transform.zoom(direction),
            SessionCommand::SetScale(value) => self.transform.set_scale(value),
            SessionCommand::Reset => self.crop = initial_crop_for(&self.source, &self.spec),
        }
    }

    pub fn dispatch_all(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        for command in commands {
            self.dispatch(command);
        }
    }

    /// Render the completed crop without encoding it.
    pub fn compose(&self) -> Option<RgbaImage> {
        compose(
            &self.source,
            self.completed.as_ref(),
            &self.transform,
            &self.spec,
        )
    }

    /// Compose and start encoding. `Ok(None)` means there is nothing to
    /// export yet.
    pub fn start_apply(&self) -> Result<Option<PendingApply>> {
        let Some(raster) = self.compose() else {
            return Ok(None);
        };
        let encode = spawn_encode(raster, self.spec.quality)?;
        Ok(Some(PendingApply {
            encode,
            file_name: self.source.file_name().to_string(),
        }))
    }

    /// Compose, encode, and package the completed crop.
    pub fn apply(&self) -> Result<Option<CroppedFile>> {
        Ok(self.start_apply()?.and_then(PendingApply::wait))
    }

    /// Apply and hand the file to `handler`. Returns whether a file was
    /// emitted; on `false` the session is still open and can be retried.
    pub fn apply_with(&self, handler: &mut impl CropHandler) -> Result<bool> {
        match self.apply()? {
            Some(file) => {
                info!(file = %file.name, bytes = file.len(), "Crop applied");
                handler.on_crop_complete(file);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// End the session without output.
    pub fn cancel(self, handler: &mut impl CropHandler) {
        info!(file = self.source.file_name(), "Crop session cancelled");
        handler.on_cancel();
    }
}

/// An apply in flight: the encode step plus the name of the output file.
pub struct PendingApply {
    encode: PendingEncode,
    file_name: String,
}

impl PendingApply {
    pub fn token(&self) -> CancelToken {
        self.encode.token()
    }

    pub fn cancel(&self) {
        self.encode.cancel();
    }

    pub fn is_ready(&self) -> bool {
        self.encode.is_ready()
    }

    /// Block until encoding resolves and package the result.
    pub fn wait(self) -> Option<CroppedFile> {
        let bytes = self.encode.wait()?;
        Some(package(bytes, &self.file_name))
    }
}

fn initial_crop_for(source: &SourceImage, spec: &OutputSpec) -> CropRect {
    let display = source.display_size();
    compute_initial_crop(
        display.width,
        display.height,
        spec.aspect_ratio,
        spec.max_width,
        spec.max_height,
    )
}
