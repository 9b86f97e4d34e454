use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use flare_core::config::EvaluationConfig;
use flare_core::engine::evaluate_detailed;
use flare_core::io::{load_frame_csv, save_region_map};
use flare_core::metrics::{FlareMetrics, MetricParams};
use flare_core::thresholds::ThresholdSet;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;

use super::evaluate::EvaluationFlags;
use crate::summary;

#[derive(Args)]
pub struct BatchArgs {
    /// Directory of CSV frames
    pub input_dir: PathBuf,

    /// Directory for JSON reports and region maps, created if missing
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub flags: EvaluationFlags,
}

struct BatchSettings<'a> {
    config: &'a EvaluationConfig,
    thresholds: ThresholdSet,
    params: MetricParams,
    output_dir: &'a Path,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let config = args.flags.resolve()?;
    let settings = BatchSettings {
        config: &config,
        thresholds: config.thresholds().context("Invalid thresholds")?,
        params: config.metric_params().context("Invalid metric parameters")?,
        output_dir: &args.output_dir,
    };

    let inputs = csv_files(&args.input_dir)?;
    if inputs.is_empty() {
        bail!("No CSV files found in {}", args.input_dir.display());
    }
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Evaluating");

    let outcomes: Vec<(PathBuf, Result<FlareMetrics>)> = inputs
        .par_iter()
        .map(|input| {
            let outcome = process_file(input, &settings);
            if let Err(ref e) = outcome {
                warn!(file = %input.display(), error = %format!("{e:#}"), "Evaluation failed");
            }
            pb.inc(1);
            (input.clone(), outcome)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut evaluated = Vec::new();
    let mut failed = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(metrics) => evaluated.push((path, metrics)),
            Err(e) => failed.push((path, e)),
        }
    }

    summary::print_metric_table(&evaluated);
    summary::print_failures(&failed);
    println!(
        "\nEvaluated {} of {} files, results in {}",
        evaluated.len(),
        inputs.len(),
        args.output_dir.display()
    );

    if !failed.is_empty() {
        bail!("{} of {} files failed", failed.len(), inputs.len());
    }
    Ok(())
}

/// Evaluate one frame and write `<stem>.json` and `<stem>.png`.
fn process_file(input: &Path, settings: &BatchSettings<'_>) -> Result<FlareMetrics> {
    let frame = load_frame_csv(input, settings.config.channels, settings.config.bit_depth)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let report = evaluate_detailed(
        &frame,
        &settings.thresholds,
        &settings.params,
        settings.config.analysis,
    )?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let json_path = settings.output_dir.join(format!("{stem}.json"));
    report
        .save_json(&json_path)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    let plot_path = settings.output_dir.join(format!("{stem}.png"));
    save_region_map(&frame, &settings.thresholds, &plot_path)
        .with_context(|| format!("Failed to write {}", plot_path.display()))?;

    Ok(report.metrics)
}

/// `*.csv` files directly inside `dir`, sorted by name.
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
