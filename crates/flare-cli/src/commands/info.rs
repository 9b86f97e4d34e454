use anyhow::Result;
use clap::Args;
use flare_core::presets::{EVALUATION_PRESETS, GENERATION_PRESETS, SENSOR_PITCHES};

use crate::summary::{print_title, Styles};

#[derive(Args)]
pub struct InfoArgs {
    /// Explain the metrics and the pixel classification
    #[arg(long)]
    pub metrics: bool,

    /// List typical pixel pitches by device class
    #[arg(long)]
    pub sensors: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let show_all = !args.metrics && !args.sensors;
    if args.metrics || show_all {
        print_metrics();
        print_presets();
    }
    if args.sensors || show_all {
        print_sensors();
    }
    Ok(())
}

const METRICS: &[(&str, &str, &str, &str)] = &[
    (
        "F_raw",
        "sum(value - offset) / (N * pixel_pitch^2)",
        "ADU/um^2",
        "Flare intensity per unit of sensor area",
    ),
    (
        "F_norm",
        "F_raw(flare) / F_raw(direct light)",
        "ratio",
        "Comparable across sensors and resolutions",
    ),
    (
        "F_final",
        "F_norm * (N_flare / N_total)^beta",
        "ratio",
        "Flare weighted by how much of the frame it covers",
    ),
];

fn print_metrics() {
    let s = Styles::new();
    print_title(&s, "Flare Metrics");

    for (name, formula, unit, purpose) in METRICS {
        println!("  {}", s.header.apply_to(name));
        println!("    {:<10}{}", s.label.apply_to("Formula"), s.value.apply_to(formula));
        println!("    {:<10}{}", s.label.apply_to("Units"), s.value.apply_to(unit));
        println!("    {:<10}{}", s.label.apply_to("Purpose"), purpose);
        println!();
    }
    println!(
        "  {}",
        s.disabled
            .apply_to("F_norm falls back to the light-source region when no direct light is present.")
    );
    println!(
        "  {}",
        s.disabled
            .apply_to("RGB frames also report a luminance-weighted F_final and a chromatic index.")
    );
    println!();

    println!("  {}", s.header.apply_to("Pixel classification"));
    let rows = [
        ("Background", "value <= offset + signal_threshold"),
        ("Flare", "offset + signal_threshold < value <= direct_threshold"),
        ("Direct light", "direct_threshold < value <= light_threshold"),
        ("Light source", "value > light_threshold"),
    ];
    for (region, rule) in rows {
        println!("    {:<14}{}", s.label.apply_to(region), s.method.apply_to(rule));
    }
    println!();
}

fn print_presets() {
    let s = Styles::new();
    println!("  {}", s.header.apply_to("Evaluation presets"));
    for preset in EVALUATION_PRESETS {
        println!(
            "    {:<20}{}",
            s.method.apply_to(preset.name),
            preset.description
        );
    }
    println!();
    println!("  {}", s.header.apply_to("Generation presets"));
    for preset in GENERATION_PRESETS {
        println!(
            "    {:<20}{}",
            s.method.apply_to(preset.name),
            preset.description
        );
    }
    println!();
}

fn print_sensors() {
    let s = Styles::new();
    print_title(&s, "Typical Pixel Pitches");

    for (class, devices) in SENSOR_PITCHES {
        println!("  {}", s.header.apply_to(class));
        for (device, pitch) in devices.iter() {
            println!(
                "    {:<22}{}",
                s.label.apply_to(device),
                s.value.apply_to(format!("{pitch} um"))
            );
        }
        println!();
    }
}
