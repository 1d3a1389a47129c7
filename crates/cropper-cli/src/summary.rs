use console::Style;
use cropper_core::package::CroppedFile;
use cropper_core::session::CropSession;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_crop_summary(session: &CropSession, file: &CroppedFile, stored: &str) {
    let s = Styles::new();
    let spec = session.spec();
    let transform = session.transform();
    let natural = session.source().natural_size();

    println!();
    println!("  {}", s.title.apply_to("Crop Applied"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Source"),
        s.value.apply_to(format!(
            "{} ({}x{})",
            session.source().file_name(),
            natural.width,
            natural.height
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Aspect"),
        s.value.apply_to(spec.aspect_label())
    );
    if let Some(crop) = session.completed_crop() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Selection"),
            s.value.apply_to(format!(
                "{:.1}x{:.1} at ({:.1}, {:.1})",
                crop.width, crop.height, crop.x, crop.y
            ))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rotation"),
        s.value.apply_to(format!("{}\u{b0}", transform.rotation_degrees()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("{}%", transform.scale_percent()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.value.apply_to(format!(
            "{} KB {} q={:.2}",
            file.len() / 1024,
            file.mime_type,
            spec.quality
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Stored"),
        s.path.apply_to(stored)
    );
    println!();
}
