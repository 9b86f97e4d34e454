use serde::{Deserialize, Serialize};

use crate::classify::{region_of, ClassifiedAggregate, Region};
use crate::frame::Frame;
use crate::thresholds::ThresholdSet;

/// Intensity statistics of the flare region of one channel.
/// Intensities are measured above the black level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlareStatistics {
    pub total_flare_signal: u64,
    pub mean_flare_intensity: f64,
    pub max_flare_intensity: u32,
    /// Mean over max; 0 when there is no flare.
    pub intensity_ratio: f64,
    pub flare_coverage_percent: f64,
    pub direct_light_coverage_percent: f64,
    pub light_source_pixels: usize,
}

impl FlareStatistics {
    /// Derive statistics from an already classified channel. Only the
    /// maximum needs another pass over the samples.
    pub fn from_frame(
        frame: &Frame,
        thresholds: &ThresholdSet,
        aggregate: &ClassifiedAggregate,
    ) -> Self {
        let offset = thresholds.offset();
        let max_flare_intensity = frame
            .data
            .iter()
            .filter(|&&v| region_of(v, thresholds) == Region::Flare)
            .map(|&v| (v as u32).saturating_sub(offset))
            .max()
            .unwrap_or(0);

        let total = aggregate.total_pixels();
        let percent = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };

        let mean_flare_intensity = aggregate.flare.mean();
        let intensity_ratio = if max_flare_intensity > 0 {
            mean_flare_intensity / max_flare_intensity as f64
        } else {
            0.0
        };

        Self {
            total_flare_signal: aggregate.flare.sum,
            mean_flare_intensity,
            max_flare_intensity,
            intensity_ratio,
            flare_coverage_percent: percent(aggregate.flare.count),
            direct_light_coverage_percent: percent(aggregate.direct_light.count),
            light_source_pixels: aggregate.light_source.count,
        }
    }
}
