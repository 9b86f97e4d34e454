//! Entry points wiring classification and metrics for evaluation, and
//! compositing and noise for generation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::analysis::{FlareStatistics, QualityAssessment, SpatialStats};
use crate::classify::{classify_sensor_frame, label_map};
use crate::consts::{NOISE_STREAM_SALT, SEQUENCE_MOTION_AMPLITUDE, SEQUENCE_MOTION_STEP};
use crate::error::{FlareError, Result};
use crate::frame::{max_value_for_bit_depth, SensorFrame};
use crate::generate::{self, noise, GeneratorConfig, LightSourceSpec};
use crate::metrics::{self, FlareMetrics, MetricParams};
use crate::report::{ChannelReport, EvaluationReport};
use crate::thresholds::ThresholdSet;

/// Flare indices of a sensor readout.
pub fn evaluate(
    frame: &SensorFrame,
    thresholds: &ThresholdSet,
    pixel_pitch_um: f64,
    beta: f64,
) -> Result<FlareMetrics> {
    let params = MetricParams::new(pixel_pitch_um, beta)?;
    evaluate_with_params(frame, thresholds, &params)
}

pub fn evaluate_with_params(
    frame: &SensorFrame,
    thresholds: &ThresholdSet,
    params: &MetricParams,
) -> Result<FlareMetrics> {
    info!(
        rows = frame.rows(),
        cols = frame.cols(),
        channels = %frame.layout(),
        "Evaluating flare"
    );
    check_sensor_range(frame, thresholds)?;

    let per_channel = classify_sensor_frame(frame, thresholds)
        .into_iter()
        .map(|(channel, aggregate)| metrics::compute(&aggregate, params, channel))
        .collect::<Result<Vec<_>>>()?;
    let result = FlareMetrics::from_channels(per_channel)?;

    info!(f_final = result.headline_f_final(), "Evaluation complete");
    Ok(result)
}

/// Evaluate and keep the per-region aggregates, optionally with the
/// statistics, quality and spatial analyses of every channel.
pub fn evaluate_detailed(
    frame: &SensorFrame,
    thresholds: &ThresholdSet,
    params: &MetricParams,
    include_analysis: bool,
) -> Result<EvaluationReport> {
    info!(
        rows = frame.rows(),
        cols = frame.cols(),
        channels = %frame.layout(),
        include_analysis,
        "Evaluating flare (detailed)"
    );
    check_sensor_range(frame, thresholds)?;

    let aggregates = classify_sensor_frame(frame, thresholds);
    let per_channel = aggregates
        .iter()
        .map(|(channel, aggregate)| metrics::compute(aggregate, params, *channel))
        .collect::<Result<Vec<_>>>()?;

    let channels = frame
        .planes()
        .into_iter()
        .zip(&aggregates)
        .zip(&per_channel)
        .map(|(((channel, plane), (_, aggregate)), channel_metrics)| {
            let mut report = ChannelReport {
                channel,
                regions: *aggregate,
                statistics: None,
                quality: None,
                spatial: None,
            };
            if include_analysis {
                report.statistics = Some(FlareStatistics::from_frame(plane, thresholds, aggregate));
                report.quality = Some(QualityAssessment::from_metrics(channel_metrics));
                report.spatial = Some(SpatialStats::from_labels(&label_map(plane, thresholds)));
            }
            report
        })
        .collect();

    let metrics = FlareMetrics::from_channels(per_channel)?;
    info!(f_final = metrics.headline_f_final(), "Evaluation complete");

    Ok(EvaluationReport {
        layout: frame.layout(),
        rows: frame.rows(),
        cols: frame.cols(),
        thresholds: *thresholds,
        pixel_pitch_um: params.pixel_pitch_um(),
        beta: params.beta(),
        metrics,
        channels,
    })
}

/// Thresholds must describe the sensor the frame came from.
fn check_sensor_range(frame: &SensorFrame, thresholds: &ThresholdSet) -> Result<()> {
    let frame_max = max_value_for_bit_depth(frame.bit_depth());
    if frame_max != thresholds.max_value() {
        return Err(FlareError::config(format!(
            "{}-bit frame (max {frame_max}) does not match thresholds with max {}",
            frame.bit_depth(),
            thresholds.max_value()
        )));
    }
    Ok(())
}

/// Synthesize a quantized sensor frame.
///
/// Placement and hot pixels draw from `seed`, noise from a stream derived
/// from it, so equal `(config, seed)` pairs give identical frames.
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<SensorFrame> {
    info!(
        size = config.size,
        bit_depth = config.bit_depth,
        channels = %config.channels,
        seed,
        "Generating synthetic flare frame"
    );

    let buffer = generate::composite(config, seed)?;
    let frame = noise::apply(buffer, config.noise_sigma, seed ^ NOISE_STREAM_SALT)?;

    info!(rows = frame.rows(), cols = frame.cols(), "Frame generated");
    Ok(frame)
}

/// Displacement of every light center in frame `index` of a moving sequence.
pub fn sequence_offset(index: usize) -> (f64, f64) {
    let phase = SEQUENCE_MOTION_STEP * index as f64;
    (
        SEQUENCE_MOTION_AMPLITUDE * phase.cos(),
        SEQUENCE_MOTION_AMPLITUDE * phase.sin(),
    )
}

/// Synthesize `frames` frames of one scene.
///
/// Light placement is drawn once from `seed`; frame `i` then uses seed
/// `seed + i` for hot pixels and noise. With `motion`, every light center of
/// frame `i` is shifted by [`sequence_offset`].
pub fn generate_sequence(
    config: &GeneratorConfig,
    seed: u64,
    frames: usize,
    motion: bool,
) -> Result<Vec<SensorFrame>> {
    config.validate()?;
    info!(frames, seed, motion, "Generating frame sequence");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let lights = generate::materialize_lights(config, &mut rng);

    (0..frames)
        .map(|i| {
            let (dr, dc) = if motion { sequence_offset(i) } else { (0.0, 0.0) };
            let mut frame_config = config.clone();
            frame_config.random_lights.count = 0;
            frame_config.lights = lights
                .iter()
                .map(|light| LightSourceSpec {
                    center_row: light.center_row + dr,
                    center_col: light.center_col + dc,
                    ..light.clone()
                })
                .collect();
            debug!(frame = i, dr, dc, "Sequence frame");
            generate(&frame_config, seed.wrapping_add(i as u64))
        })
        .collect()
}

/// Evaluate a frame synthesized from `config`, weighting coverage with the
/// generator's own `beta`.
pub fn evaluate_generated(
    frame: &SensorFrame,
    config: &GeneratorConfig,
    thresholds: &ThresholdSet,
    pixel_pitch_um: f64,
) -> Result<FlareMetrics> {
    evaluate(frame, thresholds, pixel_pitch_um, config.beta)
}

/// Generate a frame and immediately evaluate it with the config's beta.
pub fn generate_and_evaluate(
    config: &GeneratorConfig,
    seed: u64,
    thresholds: &ThresholdSet,
    pixel_pitch_um: f64,
) -> Result<(SensorFrame, FlareMetrics)> {
    let frame = generate(config, seed)?;
    let metrics = evaluate_generated(&frame, config, thresholds, pixel_pitch_um)?;
    Ok((frame, metrics))
}
