mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cropper", about = "Crop, rotate, and re-encode images for upload")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image metadata and the initial crop for a destination
    Info(commands::info::InfoArgs),
    /// Crop an image and store the result
    Crop(commands::crop::CropArgs),
    /// Print or save the default output config as TOML
    Config(commands::config::ConfigArgs),
    /// List the known upload destinations
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Crop(args) => commands::crop::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Presets => commands::presets::run(),
    }
}
