pub mod config;
pub mod crop;
pub mod info;
pub mod presets;

use clap::ValueEnum;
use cropper_core::config::OutputPreset;

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    /// 16:9, up to 1920x1080
    Vehicle,
    /// 4:3, up to 800x600
    Feature,
    /// 16:9, up to 1200x675
    Service,
    /// 1:1, up to 400x400
    Avatar,
}

impl From<PresetArg> for OutputPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Vehicle => OutputPreset::Vehicle,
            PresetArg::Feature => OutputPreset::Feature,
            PresetArg::Service => OutputPreset::Service,
            PresetArg::Avatar => OutputPreset::Avatar,
        }
    }
}
