use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ASPECT_RATIO, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH,
    DEFAULT_QUALITY,
};
use crate::error::{CropperError, Result};

/// How the output raster is derived from an oversized crop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSizing {
    /// Clamp width and height to their caps independently.
    #[default]
    Independent,
    /// Shrink both axes by the same factor so the crop aspect survives.
    Proportional,
}

impl fmt::Display for OutputSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Independent => write!(f, "Independent"),
            Self::Proportional => write!(f, "Proportional"),
        }
    }
}

/// Per-session output configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Target width/height ratio of the crop selection.
    pub aspect_ratio: f64,
    /// Floor on crop width, in display pixels.
    pub min_width: f64,
    /// Encoder quality in (0.0, 1.0].
    pub quality: f32,
    pub max_width: f64,
    pub max_height: f64,
    pub sizing: OutputSizing,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            min_width: DEFAULT_MIN_WIDTH,
            quality: DEFAULT_QUALITY,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            sizing: OutputSizing::default(),
        }
    }
}

impl OutputSpec {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let spec: OutputSpec =
            toml::from_str(contents).map_err(|e| CropperError::InvalidConfig(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load and validate a TOML output spec from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CropperError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CropperError::InvalidConfig(format!(
                "aspect_ratio must be > 0, got {}",
                self.aspect_ratio
            )));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(CropperError::InvalidConfig(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        if !(self.max_width.is_finite()
            && self.max_height.is_finite()
            && self.max_width > 0.0
            && self.max_height > 0.0)
        {
            return Err(CropperError::InvalidConfig(format!(
                "max dimensions must be finite and > 0, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if !(self.min_width.is_finite() && self.min_width >= 0.0) {
            return Err(CropperError::InvalidConfig(format!(
                "min_width must be finite and >= 0, got {}",
                self.min_width
            )));
        }
        Ok(())
    }

    /// Human label for the aspect ratio, e.g. `16:9 (Widescreen)`.
    pub fn aspect_label(&self) -> String {
        let r = self.aspect_ratio;
        if r == 1.0 {
            "1:1 (Square)".to_string()
        } else if r == 4.0 / 3.0 {
            "4:3 (Landscape)".to_string()
        } else if r == 16.0 / 9.0 {
            "16:9 (Widescreen)".to_string()
        } else {
            format!("{r}")
        }
    }
}

/// Upload destinations and the output each of them expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputPreset {
    #[default]
    Vehicle,
    Feature,
    Service,
    Avatar,
}

impl OutputPreset {
    pub const ALL: &[Self] = &[Self::Vehicle, Self::Feature, Self::Service, Self::Avatar];

    pub fn spec(&self) -> OutputSpec {
        let (aspect_ratio, max_width, max_height) = match self {
            Self::Vehicle => (16.0 / 9.0, 1920.0, 1080.0),
            Self::Feature => (4.0 / 3.0, 800.0, 600.0),
            Self::Service => (16.0 / 9.0, 1200.0, 675.0),
            Self::Avatar => (1.0, 400.0, 400.0),
        };
        OutputSpec {
            aspect_ratio,
            max_width,
            max_height,
            ..OutputSpec::default()
        }
    }
}

impl fmt::Display for OutputPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vehicle => write!(f, "Vehicle photo"),
            Self::Feature => write!(f, "Feature image"),
            Self::Service => write!(f, "Service banner"),
            Self::Avatar => write!(f, "Review avatar"),
        }
    }
}

/// Parse an aspect ratio written as `W:H`, `W/H`, or a plain number.
pub fn parse_aspect_ratio(s: &str) -> Result<f64> {
    let s = s.trim();
    let invalid = || CropperError::InvalidConfig(format!("invalid aspect ratio '{s}'"));

    let ratio = match s.split_once([':', '/']) {
        Some((w, h)) => {
            let w: f64 = w.trim().parse().map_err(|_| invalid())?;
            let h: f64 = h.trim().parse().map_err(|_| invalid())?;
            w / h
        }
        None => s.parse().map_err(|_| invalid())?,
    };

    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(invalid())
    }
}
