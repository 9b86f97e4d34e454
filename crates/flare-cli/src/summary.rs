use std::path::{Path, PathBuf};

use console::Style;
use flare_core::classify::Region;
use flare_core::generate::GeneratorConfig;
use flare_core::metrics::{ChannelMetrics, FlareMetrics};
use flare_core::report::{ChannelReport, EvaluationReport};

pub struct Styles {
    pub title: Style,
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub method: Style,
    pub disabled: Style,
    pub path: Style,
}

impl Styles {
    pub fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_evaluation(input: &Path, report: &EvaluationReport) {
    let s = Styles::new();
    print_title(&s, "Flare Evaluation");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame"),
        s.value
            .apply_to(format!("{}x{} {}", report.cols, report.rows, report.layout))
    );
    let t = &report.thresholds;
    println!(
        "  {:<14}{}",
        s.label.apply_to("Thresholds"),
        s.method.apply_to(format!(
            "offset {}, signal {}, direct {}, light {} (max {})",
            t.offset(),
            t.signal_threshold(),
            t.direct_threshold(),
            t.light_threshold(),
            t.max_value()
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pixel pitch"),
        s.value.apply_to(format!("{} um", report.pixel_pitch_um))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Beta"),
        s.value.apply_to(report.beta)
    );
    println!();

    for ((channel, metrics), channel_report) in report.metrics.channels().into_iter().zip(&report.channels) {
        let heading = match report.metrics {
            FlareMetrics::Grayscale(_) => "Metrics".to_string(),
            FlareMetrics::Rgb { .. } => format!("Metrics ({channel})"),
        };
        println!("  {}", s.header.apply_to(heading));
        print_channel_metrics(&s, metrics);
        print_regions(&s, channel_report);
        print_analysis(&s, channel_report);
        println!();
    }

    if let FlareMetrics::Rgb {
        combined_f_final,
        chromatic_aberration_index,
        ..
    } = report.metrics
    {
        println!("  {}", s.header.apply_to("Combined"));
        println!(
            "    {:<16}{}",
            s.label.apply_to("F_final"),
            s.value.apply_to(format!("{combined_f_final:.6}"))
        );
        println!(
            "    {:<16}{}",
            s.label.apply_to("Chromatic index"),
            s.value.apply_to(format!("{chromatic_aberration_index:.6}"))
        );
        println!();
    }
}

fn print_channel_metrics(s: &Styles, m: &ChannelMetrics) {
    println!(
        "    {:<16}{}",
        s.label.apply_to("F_raw"),
        s.value.apply_to(format!("{:.6} ADU/um^2", m.f_raw))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("F_norm"),
        s.value.apply_to(format!("{:.6}", m.f_norm))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("F_final"),
        s.value.apply_to(format!("{:.6}", m.f_final))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Reference"),
        s.method.apply_to(m.reference)
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Coverage"),
        s.value.apply_to(format!(
            "{} px ({:.2}%)",
            m.flare_pixels,
            m.coverage_ratio * 100.0
        ))
    );
}

fn print_regions(s: &Styles, channel: &ChannelReport) {
    for region in Region::ALL {
        let stats = channel.regions.region(region);
        let mean = if stats.is_empty() {
            s.disabled.apply_to("-".to_string())
        } else {
            s.value.apply_to(format!("{:.1}", stats.mean()))
        };
        println!(
            "    {:<16}{:>9} px   mean {}",
            s.label.apply_to(region),
            stats.count,
            mean
        );
    }
}

fn print_analysis(s: &Styles, channel: &ChannelReport) {
    if let Some(ref quality) = channel.quality {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Quality"),
            s.method.apply_to(format!(
                "{} ({:.3})",
                quality.grade, quality.quality_index
            ))
        );
    }
    if let Some(ref stats) = channel.statistics {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Flare peak"),
            s.value.apply_to(format!(
                "{} ADU, mean {:.1}",
                stats.max_flare_intensity, stats.mean_flare_intensity
            ))
        );
    }
    if let Some(ref spatial) = channel.spatial {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Flare regions"),
            s.value.apply_to(format!(
                "{} (largest {} px, concentration {:.2})",
                spatial.flare_regions, spatial.max_region_size, spatial.concentration
            ))
        );
    }
}

pub fn print_saved(saved: &[(&str, &Path)]) {
    if saved.is_empty() {
        return;
    }
    let s = Styles::new();
    for (what, path) in saved {
        println!(
            "  {:<14}{}",
            s.label.apply_to(what),
            s.path.apply_to(path.display())
        );
    }
    println!();
}

pub fn print_generation(config: &GeneratorConfig, seed: u64, output: &Path) {
    let s = Styles::new();
    print_title(&s, "Flare Synthesis");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame"),
        s.value.apply_to(format!(
            "{}x{} {}, {}-bit",
            config.size, config.size, config.channels, config.bit_depth
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Seed"),
        s.value.apply_to(seed)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Lights"),
        s.value.apply_to(format!(
            "{} placed, {} random",
            config.lights.len(),
            config.random_lights.count
        ))
    );
    let pattern = &config.random_lights.pattern;
    println!(
        "  {:<14}{}",
        s.label.apply_to("Cross"),
        enabled(&s, pattern.diffraction_cross)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Ghosting"),
        enabled(&s, pattern.ghosting)
    );
    if config.chromatic_enabled {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Chromatic"),
            s.method.apply_to(format!(
                "bias {:+.2}",
                config.random_lights.color_temperature_bias
            ))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Chromatic"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Noise"),
        s.value.apply_to(format!("sigma {} ADU", config.noise_sigma))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Hot pixels"),
        s.value.apply_to(config.hot_pixels.count)
    );
    println!();
}

fn enabled(s: &Styles, on: bool) -> console::StyledObject<&'static str> {
    if on {
        s.method.apply_to("enabled")
    } else {
        s.disabled.apply_to("disabled")
    }
}

/// One row per file: name, headline F_final, and per-channel F_raw/F_norm.
pub fn print_metric_table(results: &[(PathBuf, FlareMetrics)]) {
    if results.is_empty() {
        return;
    }

    println!(
        "\n{:<28}  {:>10}  {:>12}  {:>10}  {:>8}",
        "File", "Channel", "F_raw", "F_norm", "F_final"
    );
    println!("{}", "-".repeat(76));
    for (path, metrics) in results {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for (channel, m) in metrics.channels() {
            println!(
                "{:<28}  {:>10}  {:>12.4}  {:>10.6}  {:>8.6}",
                name, channel, m.f_raw, m.f_norm, m.f_final
            );
        }
        if let FlareMetrics::Rgb {
            combined_f_final, ..
        } = metrics
        {
            println!(
                "{:<28}  {:>10}  {:>12}  {:>10}  {:>8.6}",
                name, "combined", "", "", combined_f_final
            );
        }
    }
}

pub fn print_failures(failed: &[(PathBuf, anyhow::Error)]) {
    if failed.is_empty() {
        return;
    }
    let s = Styles::new();
    println!();
    println!("  {}", s.header.apply_to("Failures"));
    for (path, err) in failed {
        println!(
            "    {}  {}",
            s.path.apply_to(path.display()),
            s.disabled.apply_to(format!("{err:#}"))
        );
    }
}
