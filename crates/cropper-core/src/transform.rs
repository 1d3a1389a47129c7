use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE, ROTATION_STEP_DEGREES, ZOOM_STEP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "Rotate Right"),
            Self::CounterClockwise => write!(f, "Rotate Left"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl fmt::Display for ZoomDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "Zoom In"),
            Self::Out => write!(f, "Zoom Out"),
        }
    }
}

/// User rotation and zoom applied when compositing.
///
/// Rotation accumulates in 90 degree steps with no wraparound. Scale is
/// always inside `[MIN_SCALE, MAX_SCALE]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    rotation_degrees: i64,
    scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            rotation_degrees: 0,
            scale: 1.0,
        }
    }
}

impl TransformState {
    pub fn rotation_degrees(&self) -> i64 {
        self.rotation_degrees
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale as a rounded percentage, as shown next to the slider.
    pub fn scale_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        let step = match direction {
            RotationDirection::Clockwise => ROTATION_STEP_DEGREES,
            RotationDirection::CounterClockwise => -ROTATION_STEP_DEGREES,
        };
        self.rotation_degrees = self.rotation_degrees.wrapping_add(step);
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        let next = match direction {
            ZoomDirection::In => self.scale * ZOOM_STEP,
            ZoomDirection::Out => self.scale / ZOOM_STEP,
        };
        self.scale = clamp_scale(next);
    }

    /// Set the scale directly (slider input). Non-finite values are ignored.
    pub fn set_scale(&mut self, value: f64) {
        if value.is_finite() {
            self.scale = clamp_scale(value);
        }
    }
}

fn clamp_scale(value: f64) -> f64 {
    value.clamp(MIN_SCALE, MAX_SCALE)
}
