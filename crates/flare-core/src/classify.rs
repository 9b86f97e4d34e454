use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::{Channel, Frame, SensorFrame};
use crate::thresholds::ThresholdSet;

/// Intensity region a sample falls into. The four regions are mutually
/// exclusive and jointly exhaustive over `[0, max_value]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Background,
    Flare,
    DirectLight,
    LightSource,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Background,
        Region::Flare,
        Region::DirectLight,
        Region::LightSource,
    ];
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => write!(f, "Background"),
            Self::Flare => write!(f, "Flare"),
            Self::DirectLight => write!(f, "Direct Light"),
            Self::LightSource => write!(f, "Light Source"),
        }
    }
}

/// Sum of `(value - offset)` and pixel count for one region of one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    pub sum: u64,
    pub count: usize,
}

impl RegionStats {
    pub fn new(sum: u64, count: usize) -> Self {
        Self { sum, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean signal above offset, 0 for an empty region.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }
}

/// Per-region aggregates for a single channel.
///
/// Counts over the four regions always sum to the channel's pixel count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAggregate {
    pub background: RegionStats,
    pub flare: RegionStats,
    pub direct_light: RegionStats,
    pub light_source: RegionStats,
}

impl ClassifiedAggregate {
    pub fn region(&self, region: Region) -> &RegionStats {
        match region {
            Region::Background => &self.background,
            Region::Flare => &self.flare,
            Region::DirectLight => &self.direct_light,
            Region::LightSource => &self.light_source,
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut RegionStats {
        match region {
            Region::Background => &mut self.background,
            Region::Flare => &mut self.flare,
            Region::DirectLight => &mut self.direct_light,
            Region::LightSource => &mut self.light_source,
        }
    }

    pub fn total_pixels(&self) -> usize {
        Region::ALL.iter().map(|&r| self.region(r).count).sum()
    }

    fn accumulate(&mut self, region: Region, contribution: u64) {
        let stats = self.region_mut(region);
        stats.sum += contribution;
        stats.count += 1;
    }

    fn merge(self, other: Self) -> Self {
        Self {
            background: self.background.merge(other.background),
            flare: self.flare.merge(other.flare),
            direct_light: self.direct_light.merge(other.direct_light),
            light_source: self.light_source.merge(other.light_source),
        }
    }
}

/// Region of a single sample. Each boundary value belongs to the lower region.
#[inline]
pub fn region_of(value: u16, thresholds: &ThresholdSet) -> Region {
    let v = value as u32;
    if v <= thresholds.flare_floor() {
        Region::Background
    } else if v <= thresholds.direct_threshold() {
        Region::Flare
    } else if v <= thresholds.light_threshold() {
        Region::DirectLight
    } else {
        Region::LightSource
    }
}

/// Signal above the black level; samples below the offset contribute zero.
#[inline]
fn signal_above_offset(value: u16, offset: u32) -> u64 {
    (value as u32).saturating_sub(offset) as u64
}

/// Classify every sample of one channel and aggregate per region.
pub fn classify(frame: &Frame, thresholds: &ThresholdSet) -> ClassifiedAggregate {
    let (h, w) = frame.data.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        classify_parallel(&frame.data, thresholds, h, w)
    } else {
        classify_sequential(&frame.data, thresholds)
    }
}

fn classify_sequential(data: &Array2<u16>, thresholds: &ThresholdSet) -> ClassifiedAggregate {
    let offset = thresholds.offset();
    let mut aggregate = ClassifiedAggregate::default();
    for &value in data.iter() {
        aggregate.accumulate(region_of(value, thresholds), signal_above_offset(value, offset));
    }
    aggregate
}

/// Row-parallel classification using Rayon. Integer sums make the result
/// identical to the sequential path.
fn classify_parallel(
    data: &Array2<u16>,
    thresholds: &ThresholdSet,
    h: usize,
    w: usize,
) -> ClassifiedAggregate {
    let offset = thresholds.offset();
    (0..h)
        .into_par_iter()
        .map(|row| {
            let mut partial = ClassifiedAggregate::default();
            for col in 0..w {
                let value = data[[row, col]];
                partial.accumulate(region_of(value, thresholds), signal_above_offset(value, offset));
            }
            partial
        })
        .reduce(ClassifiedAggregate::default, ClassifiedAggregate::merge)
}

/// Classify each channel of a sensor readout independently (R, G, B order for color).
pub fn classify_sensor_frame(
    frame: &SensorFrame,
    thresholds: &ThresholdSet,
) -> Vec<(Channel, ClassifiedAggregate)> {
    frame
        .planes()
        .into_iter()
        .map(|(channel, plane)| {
            let aggregate = classify(plane, thresholds);
            debug!(
                %channel,
                background = aggregate.background.count,
                flare = aggregate.flare.count,
                direct_light = aggregate.direct_light.count,
                light_source = aggregate.light_source.count,
                "Channel classified"
            );
            (channel, aggregate)
        })
        .collect()
}

/// Full per-pixel region labels, for visualization and spatial analysis.
pub fn label_map(frame: &Frame, thresholds: &ThresholdSet) -> Array2<Region> {
    frame.data.mapv(|v| region_of(v, thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_lower_region() {
        let t = ThresholdSet::new(64, 10, 400, 600, 1023).unwrap();
        assert_eq!(region_of(74, &t), Region::Background);
        assert_eq!(region_of(75, &t), Region::Flare);
        assert_eq!(region_of(400, &t), Region::Flare);
        assert_eq!(region_of(401, &t), Region::DirectLight);
        assert_eq!(region_of(600, &t), Region::DirectLight);
        assert_eq!(region_of(601, &t), Region::LightSource);
    }

    #[test]
    fn test_below_offset_clamps_to_zero() {
        assert_eq!(signal_above_offset(10, 64), 0);
        assert_eq!(signal_above_offset(70, 64), 6);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let t = ThresholdSet::new(64, 10, 400, 600, 1023).unwrap();
        let (h, w) = (300, 300);
        let data = Array2::from_shape_fn((h, w), |(r, c)| ((r * 7 + c * 13) % 1024) as u16);
        assert_eq!(
            classify_parallel(&data, &t, h, w),
            classify_sequential(&data, &t)
        );
    }
}
