//! Named configurations for common sensors and evaluation scenarios.

use crate::config::EvaluationConfig;
use crate::error::{FlareError, Result};
use crate::generate::GeneratorConfig;

/// Partial evaluation settings; `None` leaves the current value untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluationPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub bit_depth: Option<u8>,
    pub pixel_pitch_um: Option<f64>,
    pub offset: Option<u32>,
    pub signal_threshold: Option<u32>,
    pub direct_threshold: Option<u32>,
    pub light_threshold: Option<u32>,
}

impl EvaluationPreset {
    const fn sensor(
        name: &'static str,
        description: &'static str,
        pixel_pitch_um: f64,
        offset: u32,
        signal_threshold: u32,
        bit_depth: u8,
    ) -> Self {
        Self {
            name,
            description,
            bit_depth: Some(bit_depth),
            pixel_pitch_um: Some(pixel_pitch_um),
            offset: Some(offset),
            signal_threshold: Some(signal_threshold),
            direct_threshold: None,
            light_threshold: None,
        }
    }

    const fn thresholds(
        name: &'static str,
        description: &'static str,
        bounds: [u32; 4],
        bit_depth: Option<u8>,
    ) -> Self {
        Self {
            name,
            description,
            bit_depth,
            pixel_pitch_um: None,
            offset: Some(bounds[0]),
            signal_threshold: Some(bounds[1]),
            direct_threshold: Some(bounds[2]),
            light_threshold: Some(bounds[3]),
        }
    }

    pub fn apply(&self, config: &mut EvaluationConfig) {
        if let Some(v) = self.bit_depth {
            config.bit_depth = v;
        }
        if let Some(v) = self.pixel_pitch_um {
            config.pixel_pitch_um = v;
        }
        if let Some(v) = self.offset {
            config.offset = v;
        }
        if let Some(v) = self.signal_threshold {
            config.signal_threshold = v;
        }
        if let Some(v) = self.direct_threshold {
            config.direct_threshold = v;
        }
        if let Some(v) = self.light_threshold {
            config.light_threshold = v;
        }
    }
}

pub const EVALUATION_PRESETS: &[EvaluationPreset] = &[
    EvaluationPreset::sensor("smartphone", "Smartphone sensor (1.22 um pitch)", 1.22, 64, 10, 10),
    EvaluationPreset::sensor("mirrorless", "Full-frame mirrorless (3.76 um pitch)", 3.76, 64, 10, 10),
    EvaluationPreset::sensor("dslr", "Full-frame DSLR (6.72 um pitch)", 6.72, 100, 15, 14),
    EvaluationPreset::sensor("scientific", "Scientific CMOS, 16 bit", 4.5, 200, 20, 16),
    EvaluationPreset::thresholds(
        "standard",
        "Typical 10-bit sensor evaluation",
        [64, 10, 400, 600],
        Some(10),
    ),
    EvaluationPreset::thresholds(
        "high_sensitivity",
        "Detect subtle flare",
        [64, 5, 150, 400],
        None,
    ),
    EvaluationPreset::thresholds("low_light", "Low light conditions", [32, 3, 120, 300], None),
    EvaluationPreset::thresholds(
        "high_dynamic_range",
        "14-bit HDR sensor",
        [256, 50, 2000, 8000],
        Some(14),
    ),
    EvaluationPreset::thresholds(
        "automotive",
        "12-bit automotive sensor",
        [128, 20, 400, 1200],
        Some(12),
    ),
    EvaluationPreset::thresholds(
        "mobile_camera",
        "Smartphone camera module",
        [64, 15, 180, 480],
        None,
    ),
];

pub fn evaluation_preset(name: &str) -> Result<&'static EvaluationPreset> {
    EVALUATION_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            FlareError::config(format!(
                "unknown evaluation preset '{name}' (available: {})",
                names(EVALUATION_PRESETS.iter().map(|p| p.name))
            ))
        })
}

/// Scene complexity for synthesized frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub light_count: usize,
    pub core_radius_range: (f64, f64),
    pub halo_extent_factor: f64,
    pub ghosting: bool,
    pub hot_pixels: usize,
}

impl GenerationPreset {
    pub fn apply(&self, config: &mut GeneratorConfig) {
        config.random_lights.count = self.light_count;
        config.random_lights.core_radius_range = self.core_radius_range;
        config.random_lights.pattern.ghosting = self.ghosting;
        config.shape.halo_extent_factor = self.halo_extent_factor;
        config.hot_pixels.count = self.hot_pixels;
    }
}

pub const GENERATION_PRESETS: &[GenerationPreset] = &[
    GenerationPreset {
        name: "standard",
        description: "A few medium sources with halo and cross",
        light_count: 3,
        core_radius_range: (2.0, 4.0),
        halo_extent_factor: 12.0,
        ghosting: false,
        hot_pixels: 0,
    },
    GenerationPreset {
        name: "minimal",
        description: "One small source, light flare",
        light_count: 1,
        core_radius_range: (1.5, 2.5),
        halo_extent_factor: 8.0,
        ghosting: false,
        hot_pixels: 5,
    },
    GenerationPreset {
        name: "severe",
        description: "Many large sources with ghosts, for stress testing",
        light_count: 6,
        core_radius_range: (4.0, 8.0),
        halo_extent_factor: 20.0,
        ghosting: true,
        hot_pixels: 100,
    },
];

pub fn generation_preset(name: &str) -> Result<&'static GenerationPreset> {
    GENERATION_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            FlareError::config(format!(
                "unknown generation preset '{name}' (available: {})",
                names(GENERATION_PRESETS.iter().map(|p| p.name))
            ))
        })
}

fn names<'a>(iter: impl Iterator<Item = &'a str>) -> String {
    iter.collect::<Vec<_>>().join(", ")
}

/// Typical pixel pitches by device class, in micrometers.
pub const SENSOR_PITCHES: &[(&str, &[(&str, &str)])] = &[
    (
        "Smartphones",
        &[
            ("iPhone 14 Pro", "1.22"),
            ("Samsung S23 Ultra", "1.40"),
            ("Google Pixel 8 Pro", "1.20"),
        ],
    ),
    (
        "Mirrorless",
        &[
            ("Sony A7R V", "3.76"),
            ("Canon R5", "4.39"),
            ("Nikon Z9", "4.35"),
        ],
    ),
    (
        "DSLR",
        &[
            ("Canon 5D Mark IV", "6.72"),
            ("Nikon D850", "4.35"),
            ("Canon 1DX Mark III", "8.20"),
        ],
    ),
    (
        "Medium format",
        &[
            ("Hasselblad X2D", "5.30"),
            ("Fujifilm GFX100", "3.76"),
            ("Phase One IQ4", "4.60"),
        ],
    ),
    (
        "Scientific / industrial",
        &[("sCMOS typical", "6.50"), ("CCD typical", "4.50-9.00")],
    ),
];
