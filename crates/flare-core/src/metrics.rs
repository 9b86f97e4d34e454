use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{ClassifiedAggregate, Region, RegionStats};
use crate::consts::{DEFAULT_BETA, DEFAULT_PIXEL_PITCH_UM, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{FlareError, Result};
use crate::frame::Channel;

/// Physical parameters of the metric computation, validated once.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetricParams {
    pixel_pitch_um: f64,
    beta: f64,
}

impl MetricParams {
    pub fn new(pixel_pitch_um: f64, beta: f64) -> Result<Self> {
        if !(pixel_pitch_um.is_finite() && pixel_pitch_um > 0.0) {
            return Err(FlareError::config(format!(
                "pixel pitch must be a positive number of micrometers, got {pixel_pitch_um}"
            )));
        }
        if !(beta.is_finite() && beta > 0.0) {
            return Err(FlareError::config(format!(
                "coverage exponent beta must be positive, got {beta}"
            )));
        }
        Ok(Self {
            pixel_pitch_um,
            beta,
        })
    }

    pub fn pixel_pitch_um(&self) -> f64 {
        self.pixel_pitch_um
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Physical area of one pixel in um^2.
    pub fn pixel_area_um2(&self) -> f64 {
        self.pixel_pitch_um * self.pixel_pitch_um
    }
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            pixel_pitch_um: DEFAULT_PIXEL_PITCH_UM,
            beta: DEFAULT_BETA,
        }
    }
}

/// Region whose areal intensity normalizes F_norm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceRegion {
    /// Preferred reference: pixels lit directly but below the source core.
    DirectLight,
    /// Fallback when no direct-light pixels exist.
    LightSource,
}

impl std::fmt::Display for ReferenceRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectLight => write!(f, "Direct Light"),
            Self::LightSource => write!(f, "Light Source (fallback)"),
        }
    }
}

/// The three flare indices of one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    /// Mean flare signal per unit area, ADU/um^2.
    #[serde(rename = "F_raw")]
    pub f_raw: f64,
    /// F_raw of the flare region over F_raw of the reference region.
    #[serde(rename = "F_norm")]
    pub f_norm: f64,
    /// F_norm weighted by flare coverage raised to beta.
    #[serde(rename = "F_final")]
    pub f_final: f64,
    pub reference: ReferenceRegion,
    pub flare_pixels: usize,
    /// Fraction of all pixels classified as flare.
    pub coverage_ratio: f64,
}

/// Flare indices of a whole readout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FlareMetrics {
    Grayscale(ChannelMetrics),
    Rgb {
        red: ChannelMetrics,
        green: ChannelMetrics,
        blue: ChannelMetrics,
        #[serde(rename = "combined_F_final")]
        combined_f_final: f64,
        chromatic_aberration_index: f64,
    },
}

impl FlareMetrics {
    /// Assemble the RGB variant, deriving the combined and chromatic indices.
    pub fn from_rgb(red: ChannelMetrics, green: ChannelMetrics, blue: ChannelMetrics) -> Self {
        let finals = [red.f_final, green.f_final, blue.f_final];
        Self::Rgb {
            combined_f_final: luminance_weighted(finals),
            chromatic_aberration_index: chromatic_aberration_index(finals),
            red,
            green,
            blue,
        }
    }

    /// Assemble from per-channel results: one entry for grayscale, three
    /// (R, G, B) for color.
    pub fn from_channels(per_channel: Vec<ChannelMetrics>) -> Result<Self> {
        let count = per_channel.len();
        let mut iter = per_channel.into_iter();
        match (iter.next(), iter.next(), iter.next(), iter.next()) {
            (Some(gray), None, None, None) => Ok(Self::Grayscale(gray)),
            (Some(red), Some(green), Some(blue), None) => Ok(Self::from_rgb(red, green, blue)),
            _ => Err(FlareError::data_format(
                0,
                format!("expected 1 or 3 channels, got {count}"),
            )),
        }
    }

    /// The single number summarizing the readout: F_final, or the
    /// luminance-weighted F_final for RGB.
    pub fn headline_f_final(&self) -> f64 {
        match self {
            Self::Grayscale(m) => m.f_final,
            Self::Rgb {
                combined_f_final, ..
            } => *combined_f_final,
        }
    }

    pub fn channels(&self) -> Vec<(Channel, &ChannelMetrics)> {
        match self {
            Self::Grayscale(m) => vec![(Channel::Gray, m)],
            Self::Rgb {
                red, green, blue, ..
            } => vec![
                (Channel::Red, red),
                (Channel::Green, green),
                (Channel::Blue, blue),
            ],
        }
    }
}

/// Mean signal above offset per unit physical area; 0 for an empty region.
pub fn areal_intensity(stats: &RegionStats, params: &MetricParams) -> f64 {
    if stats.is_empty() {
        return 0.0;
    }
    stats.sum as f64 / (stats.count as f64 * params.pixel_area_um2())
}

/// Compute F_raw, F_norm and F_final for one channel.
///
/// DirectLight is the preferred reference; LightSource is used only when no
/// direct-light pixels exist. With both empty the ratio has no meaning and
/// `MetricUndefined` is returned instead of a silent zero.
pub fn compute(
    aggregate: &ClassifiedAggregate,
    params: &MetricParams,
    channel: Channel,
) -> Result<ChannelMetrics> {
    let (reference, reference_stats) = if !aggregate.direct_light.is_empty() {
        (ReferenceRegion::DirectLight, &aggregate.direct_light)
    } else if !aggregate.light_source.is_empty() {
        debug!(%channel, "No direct-light pixels, normalizing against light source");
        (ReferenceRegion::LightSource, &aggregate.light_source)
    } else {
        return Err(FlareError::MetricUndefined { channel });
    };

    let reference_intensity = areal_intensity(reference_stats, params);
    if reference_intensity <= 0.0 {
        return Err(FlareError::MetricUndefined { channel });
    }

    let f_raw = areal_intensity(aggregate.region(Region::Flare), params);
    let f_norm = f_raw / reference_intensity;

    let total = aggregate.total_pixels();
    let flare_pixels = aggregate.flare.count;
    let coverage_ratio = if total == 0 {
        0.0
    } else {
        flare_pixels as f64 / total as f64
    };
    let f_final = f_norm * coverage_ratio.powf(params.beta());

    Ok(ChannelMetrics {
        f_raw,
        f_norm,
        f_final,
        reference,
        flare_pixels,
        coverage_ratio,
    })
}

/// Luminance-weighted combination of R, G, B values (ITU-R BT.601).
pub fn luminance_weighted(rgb: [f64; 3]) -> f64 {
    LUMINANCE_R * rgb[0] + LUMINANCE_G * rgb[1] + LUMINANCE_B * rgb[2]
}

/// Spread of per-channel values normalized by their mean.
///
/// Defined as 0 when the mean is 0: there is no flare signal whose
/// dispersion could be measured.
pub fn chromatic_aberration_index(values: [f64; 3]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    (max - min) / mean
}
