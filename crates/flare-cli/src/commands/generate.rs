use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use flare_core::config::FlareConfig;
use flare_core::engine::{evaluate_generated, generate, generate_sequence};
use flare_core::frame::{ChannelLayout, SensorFrame};
use flare_core::io::save_frame_csv;
use flare_core::presets::generation_preset;
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary;

#[derive(Args)]
pub struct GenerateArgs {
    /// Output CSV file; sequence frames get a _NNNN suffix
    pub output: PathBuf,

    /// Scene preset (standard, minimal, severe)
    #[arg(long)]
    pub preset: Option<String>,

    /// TOML config file; its [generation] table overrides the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame side length in pixels
    #[arg(long)]
    pub size: Option<usize>,

    /// Sensor bit depth (1-16)
    #[arg(long)]
    pub bit_depth: Option<u8>,

    /// Number of randomly placed light sources
    #[arg(long)]
    pub lights: Option<usize>,

    /// Write an RGB frame
    #[arg(long)]
    pub rgb: bool,

    /// Channel-dependent flare size (implies --rgb)
    #[arg(long)]
    pub chromatic: bool,

    /// Color temperature bias of random lights, -1.0 to 1.0
    #[arg(long, allow_hyphen_values = true)]
    pub bias: Option<f64>,

    /// Gaussian noise standard deviation in ADU
    #[arg(long)]
    pub noise: Option<f64>,

    /// Disable the diffraction cross
    #[arg(long)]
    pub no_cross: bool,

    /// Add ghost reflections
    #[arg(long)]
    pub ghosting: bool,

    /// Number of hot pixels
    #[arg(long)]
    pub hot_pixels: Option<usize>,

    /// Random seed; drawn at random and printed when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generate this many frames of one scene
    #[arg(long)]
    pub sequence: Option<usize>,

    /// Move the light sources along a circle across the sequence
    #[arg(long, requires = "sequence")]
    pub motion: bool,

    /// Evaluate each generated frame; coverage uses [generation] beta
    #[arg(long)]
    pub evaluate: bool,
}

impl GenerateArgs {
    /// Layer defaults, preset, config file and explicit flags, in that order.
    fn resolve(&self) -> Result<FlareConfig> {
        let mut config = FlareConfig::default();
        if let Some(ref name) = self.preset {
            generation_preset(name)?.apply(&mut config.generation);
        }
        if let Some(ref path) = self.config {
            config = super::overlay_config_file(&config, path)?;
        }

        let generation = &mut config.generation;
        if let Some(v) = self.size {
            generation.size = v;
        }
        if let Some(v) = self.bit_depth {
            generation.bit_depth = v;
        }
        if let Some(v) = self.lights {
            generation.random_lights.count = v;
        }
        if self.rgb || self.chromatic {
            generation.channels = ChannelLayout::Rgb;
        }
        if self.chromatic {
            generation.chromatic_enabled = true;
        }
        if let Some(v) = self.bias {
            generation.random_lights.color_temperature_bias = v;
        }
        if let Some(v) = self.noise {
            generation.noise_sigma = v;
        }
        if let Some(v) = self.hot_pixels {
            generation.hot_pixels.count = v;
        }

        let patterns = std::iter::once(&mut generation.random_lights.pattern)
            .chain(generation.lights.iter_mut().map(|light| &mut light.pattern));
        for pattern in patterns {
            if self.no_cross {
                pattern.diffraction_cross = false;
            }
            if self.ghosting {
                pattern.ghosting = true;
            }
        }

        // Evaluate generated frames at the depth they were quantized to.
        config.evaluation.bit_depth = generation.bit_depth;
        config.evaluation.channels = generation.channels;
        Ok(config)
    }
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = args.resolve()?;
    config.generation.validate().context("Invalid generator config")?;
    let seed = args.seed.unwrap_or_else(rand::random);

    summary::print_generation(&config.generation, seed, &args.output);

    let frames = match args.sequence {
        Some(count) => {
            let frames = generate_sequence(&config.generation, seed, count, args.motion)?;

            let pb = ProgressBar::new(frames.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}/{len}")?
                    .progress_chars("=> "),
            );
            pb.set_message("Writing frames");
            let paths = frames
                .into_iter()
                .enumerate()
                .map(|(i, frame)| {
                    let path = sequence_path(&args.output, i);
                    save_frame_csv(&frame, &path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    pb.inc(1);
                    Ok((path, frame))
                })
                .collect::<Result<Vec<_>>>()?;
            pb.finish();
            paths
        }
        None => {
            let frame = generate(&config.generation, seed)?;
            save_frame_csv(&frame, &args.output)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
            vec![(args.output.clone(), frame)]
        }
    };

    match frames.first() {
        Some((first, _)) => println!(
            "Generated {} frame(s), first at {}",
            frames.len(),
            first.display()
        ),
        None => println!("No frames generated"),
    }

    if args.evaluate {
        evaluate_frames(&config, &frames)?;
    }
    Ok(())
}

fn evaluate_frames(config: &FlareConfig, frames: &[(PathBuf, SensorFrame)]) -> Result<()> {
    let thresholds = config
        .evaluation
        .thresholds()
        .context("Invalid thresholds")?;
    let pixel_pitch_um = config.evaluation.pixel_pitch_um;

    let results = frames
        .iter()
        .map(|(path, frame)| {
            let metrics =
                evaluate_generated(frame, &config.generation, &thresholds, pixel_pitch_um)?;
            Ok((path.clone(), metrics))
        })
        .collect::<Result<Vec<_>>>()?;

    summary::print_metric_table(&results);
    Ok(())
}

/// `dir/frame.csv` becomes `dir/frame_0007.csv` for index 7.
fn sequence_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    output.with_file_name(format!("{stem}_{index:04}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_path_keeps_directory_and_extension() {
        let path = sequence_path(Path::new("out/scene.csv"), 7);
        assert_eq!(path, PathBuf::from("out/scene_0007.csv"));
    }

    #[test]
    fn test_sequence_path_defaults_extension() {
        let path = sequence_path(Path::new("scene"), 12);
        assert_eq!(path, PathBuf::from("scene_0012.csv"));
    }
}
