use anyhow::Result;
use console::Style;
use cropper_core::config::OutputPreset;

pub fn run() -> Result<()> {
    let name = Style::new().cyan().bold();
    let label = Style::new().dim();

    for preset in OutputPreset::ALL {
        let spec = preset.spec();
        println!(
            "  {:<18}{} {:<20}{} {}x{}  {} {:.2}",
            name.apply_to(preset.to_string()),
            label.apply_to("aspect"),
            spec.aspect_label(),
            label.apply_to("max"),
            spec.max_width,
            spec.max_height,
            label.apply_to("quality"),
            spec.quality
        );
    }
    Ok(())
}
