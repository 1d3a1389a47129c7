use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use cropper_core::config::{parse_aspect_ratio, OutputPreset, OutputSizing, OutputSpec};
use cropper_core::consts::{MAX_SCALE, MIN_SCALE, ZOOM_STEP};
use cropper_core::geometry::{CropRect, Size};
use cropper_core::package::{DirectoryUploader, Uploader};
use cropper_core::session::{CropSession, SessionCommand};
use cropper_core::source::SourceImage;
use cropper_core::transform::{RotationDirection, ZoomDirection};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::PresetArg;
use crate::summary::print_crop_summary;

#[derive(Args)]
pub struct CropArgs {
    /// Input image file
    pub file: PathBuf,

    /// Directory the cropped file is stored in
    #[arg(short, long, default_value = "uploads")]
    pub output: PathBuf,

    /// Destination preset
    #[arg(long, value_enum, default_value = "vehicle")]
    pub preset: PresetArg,

    /// Output config file (TOML), replaces the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Aspect ratio as W:H, W/H, or a number
    #[arg(long)]
    pub aspect: Option<String>,

    /// Encoder quality in (0, 1]
    #[arg(long)]
    pub quality: Option<f32>,

    /// Maximum output width
    #[arg(long)]
    pub max_width: Option<f64>,

    /// Maximum output height
    #[arg(long)]
    pub max_height: Option<f64>,

    /// Minimum crop width in display pixels
    #[arg(long)]
    pub min_width: Option<f64>,

    /// Shrink oversized crops proportionally instead of per axis
    #[arg(long)]
    pub proportional: bool,

    /// Width the image is displayed at (crop coordinates are relative to it)
    #[arg(long, requires = "display_height")]
    pub display_width: Option<f64>,

    /// Height the image is displayed at
    #[arg(long, requires = "display_width")]
    pub display_height: Option<f64>,

    /// Crop selection as x,y,width,height in display pixels
    #[arg(long)]
    pub rect: Option<String>,

    /// Number of clockwise quarter turns
    #[arg(long, default_value = "0")]
    pub rotate_right: u32,

    /// Number of counter-clockwise quarter turns
    #[arg(long, default_value = "0")]
    pub rotate_left: u32,

    /// Number of zoom-in steps
    #[arg(long, default_value = "0")]
    pub zoom_in: u32,

    /// Number of zoom-out steps
    #[arg(long, default_value = "0")]
    pub zoom_out: u32,

    /// Scale factor, applied after zoom steps (0.5-3.0)
    #[arg(long)]
    pub scale: Option<f64>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let spec = build_spec(args)?;

    let mut source = SourceImage::open(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    if let (Some(w), Some(h)) = (args.display_width, args.display_height) {
        source = source.with_display_size(Size::new(w, h))?;
    }

    let mut session = CropSession::new(source, spec)?;
    let commands = build_commands(args, &session)?;
    session.dispatch_all(commands);

    let Some(pending) = session.start_apply()? else {
        bail!("Nothing to export: the crop selection is empty or too small");
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message("Encoding");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let file = pending.wait();
    spinner.finish_and_clear();

    let Some(file) = file else {
        bail!("Encoding produced no output");
    };

    let uploader = DirectoryUploader::new(&args.output);
    let stored = uploader
        .upload(&file)
        .with_context(|| format!("Failed to store {}", file.name))?;

    print_crop_summary(&session, &file, &stored);
    Ok(())
}

fn build_spec(args: &CropArgs) -> Result<OutputSpec> {
    let mut spec = if let Some(ref path) = args.config {
        OutputSpec::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?
    } else {
        OutputPreset::from(args.preset).spec()
    };

    if let Some(ref aspect) = args.aspect {
        spec.aspect_ratio = parse_aspect_ratio(aspect)?;
    }
    if let Some(q) = args.quality {
        spec.quality = q;
    }
    if let Some(w) = args.max_width {
        spec.max_width = w;
    }
    if let Some(h) = args.max_height {
        spec.max_height = h;
    }
    if let Some(w) = args.min_width {
        spec.min_width = w;
    }
    if args.proportional {
        spec.sizing = OutputSizing::Proportional;
    }

    spec.validate()?;
    Ok(spec)
}

/// Translate flags into the same actions a user performs in the cropper.
fn build_commands(args: &CropArgs, session: &CropSession) -> Result<Vec<SessionCommand>> {
    let mut commands = Vec::new();

    // The selection control locks the aspect ratio and minimum width.
    let selection = match args.rect {
        Some(ref s) => {
            let spec = session.spec();
            parse_rect(s)?.constrained(
                spec.aspect_ratio,
                spec.min_width,
                session.source().display_size(),
            )
        }
        None => session.crop(),
    };
    debug!(?selection, "Crop selection");
    commands.push(SessionCommand::CompleteCrop(selection));

    // Only the net quarter turns matter for the drawn output.
    let turns = net_quarter_turns(args.rotate_right, args.rotate_left);
    commands.extend(
        std::iter::repeat(SessionCommand::Rotate(RotationDirection::Clockwise)).take(turns),
    );
    commands.extend(
        std::iter::repeat(SessionCommand::Zoom(ZoomDirection::In))
            .take(effective_zoom_steps(args.zoom_in)),
    );
    commands.extend(
        std::iter::repeat(SessionCommand::Zoom(ZoomDirection::Out))
            .take(effective_zoom_steps(args.zoom_out)),
    );
    if let Some(scale) = args.scale {
        commands.push(SessionCommand::SetScale(scale));
    }

    Ok(commands)
}

/// Clockwise quarter turns equivalent to `right` minus `left`, in `0..4`.
fn net_quarter_turns(right: u32, left: u32) -> usize {
    (i64::from(right) - i64::from(left)).rem_euclid(4) as usize
}

/// Zoom steps past the full scale range are no-ops once the scale clamps.
fn effective_zoom_steps(count: u32) -> usize {
    let full_range = ((MAX_SCALE / MIN_SCALE).ln() / ZOOM_STEP.ln()).ceil() as u32;
    count.min(full_range) as usize
}

fn parse_rect(s: &str) -> Result<CropRect> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid crop rect '{s}'"))?;

    match values.as_slice() {
        &[x, y, width, height] => Ok(CropRect::new(x, y, width, height)),
        _ => bail!("Crop rect must be x,y,width,height, got '{s}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_fold_to_net_rotation() {
        assert_eq!(net_quarter_turns(0, 0), 0);
        assert_eq!(net_quarter_turns(5, 0), 1);
        assert_eq!(net_quarter_turns(0, 1), 3);
        assert_eq!(net_quarter_turns(2, 6), 0);
        assert_eq!(net_quarter_turns(u32::MAX, 0), 3);
        assert_eq!(net_quarter_turns(0, u32::MAX), 1);
    }

    #[test]
    fn zoom_steps_are_capped_at_full_range() {
        assert_eq!(effective_zoom_steps(0), 0);
        assert_eq!(effective_zoom_steps(3), 3);
        assert_eq!(effective_zoom_steps(u32::MAX), 19);
    }

    #[test]
    fn capped_zoom_reaches_the_same_scale() {
        use cropper_core::transform::TransformState;

        let mut capped = TransformState::default();
        let mut full = TransformState::default();
        for _ in 0..effective_zoom_steps(1_000) {
            capped.zoom(ZoomDirection::In);
        }
        for _ in 0..1_000 {
            full.zoom(ZoomDirection::In);
        }
        assert_eq!(capped.scale(), full.scale());
        assert_eq!(capped.scale(), MAX_SCALE);

        for _ in 0..effective_zoom_steps(1_000) {
            capped.zoom(ZoomDirection::Out);
        }
        assert_eq!(capped.scale(), MIN_SCALE);
    }

    #[test]
    fn parse_rect_requires_four_values() {
        let rect = parse_rect("10, 20, 300, 200").unwrap();
        assert_eq!(rect, CropRect::new(10.0, 20.0, 300.0, 200.0));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }
}
