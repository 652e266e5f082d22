use std::path::Path;

use console::Style;
use tdenoise_core::filters::effective_kernel_size;
use tdenoise_core::pipeline::{DenoiseParams, ExportSummary};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_denoise_summary(title: &str, frames: usize, params: &DenoiseParams, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Frames"), s.value.apply_to(frames));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Radius"),
        s.value.apply_to(format!("{} (window {})", params.radius, params.window_len()))
    );

    if params.alignment.enabled {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Alignment"),
            s.method.apply_to(params.alignment.flow.normalized())
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Alignment"),
            s.disabled.apply_to("disabled")
        );
    }

    match effective_kernel_size(params.spatial_kernel) {
        Some(k) => println!(
            "  {:<14}{}",
            s.label.apply_to("Median"),
            s.method.apply_to(format!("{k}x{k}"))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Median"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();
}

pub fn print_export_result(summary: &ExportSummary, output: &Path) {
    let s = Styles::new();
    let secs = summary.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        summary.written.len() as f64 / secs
    } else {
        0.0
    };

    println!();
    println!(
        "  {} {} frames to {} in {:.1}s ({:.2} fps)",
        s.method.apply_to("Wrote"),
        s.value.apply_to(summary.written.len()),
        s.path.apply_to(output.display()),
        secs,
        rate
    );
}
