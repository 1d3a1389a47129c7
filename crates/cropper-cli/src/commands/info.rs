use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cropper_core::config::OutputPreset;
use cropper_core::geometry::compute_initial_crop;
use cropper_core::source::SourceImage;

use super::PresetArg;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Only show the initial crop for this destination
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = SourceImage::open(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let natural = source.natural_size();

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", natural.width, natural.height);
    println!("Format:      {}", source.source_mime().unwrap_or("unknown"));
    println!("File size:   {:.1} KB", source.bytes().len() as f64 / 1024.0);
    println!();

    let presets: Vec<OutputPreset> = match args.preset {
        Some(p) => vec![p.into()],
        None => OutputPreset::ALL.to_vec(),
    };

    println!("Initial crop:");
    for preset in presets {
        let spec = preset.spec();
        let crop = compute_initial_crop(
            natural.width,
            natural.height,
            spec.aspect_ratio,
            spec.max_width,
            spec.max_height,
        );
        println!(
            "  {:<16}{:.1}x{:.1} at ({:.1}, {:.1})",
            preset.to_string(),
            crop.width,
            crop.height,
            crop.x,
            crop.y
        );
    }

    Ok(())
}
