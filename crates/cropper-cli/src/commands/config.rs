use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cropper_core::config::{OutputPreset, OutputSpec};

use super::PresetArg;

#[derive(Args)]
pub struct ConfigArgs {
    /// Start from a destination preset instead of the defaults
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save an OutputSpec as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let spec = match args.preset {
        Some(p) => OutputPreset::from(p).spec(),
        None => OutputSpec::default(),
    };
    let toml_str = spec.to_toml_string()?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
