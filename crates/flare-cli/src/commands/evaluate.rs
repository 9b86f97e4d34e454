use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use flare_core::config::{EvaluationConfig, FlareConfig};
use flare_core::engine::evaluate_detailed;
use flare_core::frame::ChannelLayout;
use flare_core::io::{load_frame_csv, save_heatmap, save_region_map};
use flare_core::presets::evaluation_preset;

use crate::summary;

/// Evaluation settings shared by `evaluate` and `batch`.
#[derive(Args, Clone, Debug, Default)]
pub struct EvaluationFlags {
    /// Frames are RGB, one "r g b" triple per cell
    #[arg(long)]
    pub rgb: bool,

    /// Sensor or threshold preset (see `flare info`)
    #[arg(long)]
    pub preset: Option<String>,

    /// TOML config file; its [evaluation] table overrides the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sensor black level in ADU
    #[arg(long)]
    pub offset: Option<u32>,

    /// Minimum signal above the black level counted as flare
    #[arg(long)]
    pub signal_threshold: Option<u32>,

    /// Upper bound of the flare region in ADU
    #[arg(long)]
    pub direct_threshold: Option<u32>,

    /// Upper bound of the direct-light region in ADU
    #[arg(long)]
    pub light_threshold: Option<u32>,

    /// Pixel pitch in micrometers
    #[arg(long)]
    pub pixel_pitch: Option<f64>,

    /// Coverage exponent of F_final
    #[arg(long)]
    pub beta: Option<f64>,

    /// Sensor bit depth (1-16)
    #[arg(long)]
    pub bit_depth: Option<u8>,

    /// Add statistics, quality grade and spatial analysis
    #[arg(long)]
    pub detailed: bool,
}

impl EvaluationFlags {
    /// Layer defaults, preset, config file and explicit flags, in that order.
    pub fn resolve(&self) -> Result<EvaluationConfig> {
        let mut config = FlareConfig::default();
        if let Some(ref name) = self.preset {
            evaluation_preset(name)?.apply(&mut config.evaluation);
        }
        if let Some(ref path) = self.config {
            config = super::overlay_config_file(&config, path)?;
        }

        let mut eval = config.evaluation;
        if self.rgb {
            eval.channels = ChannelLayout::Rgb;
        }
        if let Some(v) = self.bit_depth {
            eval.bit_depth = v;
        }
        if let Some(v) = self.offset {
            eval.offset = v;
        }
        if let Some(v) = self.signal_threshold {
            eval.signal_threshold = v;
        }
        if let Some(v) = self.direct_threshold {
            eval.direct_threshold = v;
        }
        if let Some(v) = self.light_threshold {
            eval.light_threshold = v;
        }
        if let Some(v) = self.pixel_pitch {
            eval.pixel_pitch_um = v;
        }
        if let Some(v) = self.beta {
            eval.beta = v;
        }
        if self.detailed {
            eval.analysis = true;
        }
        Ok(eval)
    }
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Input CSV frame
    pub input: PathBuf,

    #[command(flatten)]
    pub flags: EvaluationFlags,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the region map (.png) or flare mask (.pgm)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Save an intensity heatmap (.png)
    #[arg(long)]
    pub heatmap: Option<PathBuf>,

    /// Print only the headline F_final
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run(args: &EvaluateArgs) -> Result<()> {
    let config = args.flags.resolve()?;
    let thresholds = config.thresholds().context("Invalid thresholds")?;
    let params = config.metric_params().context("Invalid metric parameters")?;

    let frame = load_frame_csv(&args.input, config.channels, config.bit_depth)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let report = evaluate_detailed(&frame, &thresholds, &params, config.analysis)?;

    if args.quiet {
        println!("{:.6}", report.metrics.headline_f_final());
    } else {
        summary::print_evaluation(&args.input, &report);
    }

    let mut saved = Vec::new();
    if let Some(ref path) = args.output {
        report
            .save_json(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        saved.push(("Report", path.as_path()));
    }
    if let Some(ref path) = args.plot {
        save_region_map(&frame, &thresholds, path)
            .with_context(|| format!("Failed to write region map {}", path.display()))?;
        saved.push(("Region map", path.as_path()));
    }
    if let Some(ref path) = args.heatmap {
        save_heatmap(&frame, path)
            .with_context(|| format!("Failed to write heatmap {}", path.display()))?;
        saved.push(("Heatmap", path.as_path()));
    }

    if !args.quiet {
        summary::print_saved(&saved);
    }
    Ok(())
}
