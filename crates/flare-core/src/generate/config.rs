use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BETA, DEFAULT_BIT_DEPTH, DEFAULT_CHROMATIC_STEP, DEFAULT_CORE_RADIUS,
    DEFAULT_CROSS_EXTENT_FACTOR, DEFAULT_CROSS_GAIN, DEFAULT_CROSS_LENGTH_FACTOR,
    DEFAULT_FRAME_SIZE, DEFAULT_GHOST_ATTENUATION, DEFAULT_GHOST_COUNT,
    DEFAULT_HALO_EXTENT_FACTOR, DEFAULT_HALO_LENGTH_FACTOR, DEFAULT_NOISE_SIGMA, DEFAULT_OFFSET,
};
use crate::error::{FlareError, Result};
use crate::frame::{max_value_for_bit_depth, validate_bit_depth, ChannelLayout};

/// Optional artifacts composited around a light source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFlags {
    /// Four-armed diffraction spikes along the row and column through the center.
    #[serde(default = "default_true")]
    pub diffraction_cross: bool,
    /// Attenuated reflections mirrored through the frame center.
    #[serde(default)]
    pub ghosting: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self {
            diffraction_cross: true,
            ghosting: false,
        }
    }
}

/// One synthesized light contributor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightSourceSpec {
    pub center_row: f64,
    pub center_col: f64,
    /// Radius of the saturated core, pixels.
    #[serde(default = "default_core_radius")]
    pub core_radius: f64,
    /// Peak contribution in ADU.
    pub intensity: f64,
    /// Positive values spread red outward and pull blue inward under
    /// chromatic dispersion; negative values do the opposite.
    #[serde(default)]
    pub color_temperature_bias: f64,
    #[serde(default)]
    pub pattern: PatternFlags,
}

fn default_core_radius() -> f64 {
    DEFAULT_CORE_RADIUS
}

/// Light sources placed by the seeded random source.
///
/// Centers fall uniformly inside the frame, keeping a margin of 1/8 of the
/// side; the core radius is drawn uniformly from `core_radius_range`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomLights {
    pub count: usize,
    pub core_radius_range: (f64, f64),
    /// Peak contribution in ADU; the sensor maximum when unset.
    pub intensity: Option<f64>,
    pub color_temperature_bias: f64,
    pub pattern: PatternFlags,
}

impl Default for RandomLights {
    fn default() -> Self {
        Self {
            count: 3,
            core_radius_range: (2.0, 4.0),
            intensity: None,
            color_temperature_bias: 0.0,
            pattern: PatternFlags::default(),
        }
    }
}

/// Sensor defects: isolated pixels reading high regardless of illumination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotPixels {
    pub count: usize,
    /// Uniform value range `[min, max)` in ADU.
    pub min: f64,
    pub max: f64,
}

impl Default for HotPixels {
    fn default() -> Self {
        Self {
            count: 0,
            min: 200.0,
            max: 400.0,
        }
    }
}

/// Geometry of the composited artifacts, relative to each source's core radius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareShape {
    /// Halo decay length = factor x core radius.
    pub halo_length_factor: f64,
    /// Halo cut-off distance = factor x core radius.
    pub halo_extent_factor: f64,
    /// Cross amplitude relative to source intensity.
    pub cross_gain: f64,
    pub cross_length_factor: f64,
    pub cross_extent_factor: f64,
    /// Intensity ratio between successive ghosts, in (0, 1).
    pub ghost_attenuation: f64,
    pub ghost_count: usize,
    /// Radial scale change per unit of color temperature bias.
    pub chromatic_step: f64,
}

impl Default for FlareShape {
    fn default() -> Self {
        Self {
            halo_length_factor: DEFAULT_HALO_LENGTH_FACTOR,
            halo_extent_factor: DEFAULT_HALO_EXTENT_FACTOR,
            cross_gain: DEFAULT_CROSS_GAIN,
            cross_length_factor: DEFAULT_CROSS_LENGTH_FACTOR,
            cross_extent_factor: DEFAULT_CROSS_EXTENT_FACTOR,
            ghost_attenuation: DEFAULT_GHOST_ATTENUATION,
            ghost_count: DEFAULT_GHOST_COUNT,
            chromatic_step: DEFAULT_CHROMATIC_STEP,
        }
    }
}

/// Everything needed to synthesize a flare test frame, except the seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Frame side length in pixels.
    pub size: usize,
    pub bit_depth: u8,
    pub channels: ChannelLayout,
    /// Uniform floor every sample starts from (sensor black level), ADU.
    pub background: f64,
    /// Explicit light sources, composited in order.
    pub lights: Vec<LightSourceSpec>,
    pub random_lights: RandomLights,
    /// Composite each color channel with its own radial scale.
    pub chromatic_enabled: bool,
    /// Standard deviation of the additive Gaussian noise, ADU.
    pub noise_sigma: f64,
    /// Coverage exponent used when the frame is re-fed into evaluation.
    pub beta: f64,
    pub hot_pixels: HotPixels,
    pub shape: FlareShape,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_FRAME_SIZE,
            bit_depth: DEFAULT_BIT_DEPTH,
            channels: ChannelLayout::Mono,
            background: DEFAULT_OFFSET as f64,
            lights: Vec::new(),
            random_lights: RandomLights::default(),
            chromatic_enabled: false,
            noise_sigma: DEFAULT_NOISE_SIGMA,
            beta: DEFAULT_BETA,
            hot_pixels: HotPixels::default(),
            shape: FlareShape::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn max_value(&self) -> u32 {
        max_value_for_bit_depth(self.bit_depth)
    }

    /// Reject configurations the generator cannot honor. Called once at the
    /// generation entry point; the compositing code relies on it.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(FlareError::config("frame size must be positive"));
        }
        validate_bit_depth(self.bit_depth)?;

        if self.chromatic_enabled && self.channels == ChannelLayout::Mono {
            return Err(FlareError::config(
                "chromatic dispersion needs an RGB channel layout",
            ));
        }
        if !(self.background.is_finite() && self.background >= 0.0) {
            return Err(FlareError::config(format!(
                "background floor must be non-negative, got {}",
                self.background
            )));
        }
        if !(self.noise_sigma.is_finite() && self.noise_sigma >= 0.0) {
            return Err(FlareError::config(format!(
                "noise sigma must be non-negative, got {}",
                self.noise_sigma
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(FlareError::config(format!(
                "coverage exponent beta must be positive, got {}",
                self.beta
            )));
        }

        for (i, light) in self.lights.iter().enumerate() {
            validate_light(light).map_err(|e| FlareError::config(format!("light #{i}: {e}")))?;
        }

        let (lo, hi) = self.random_lights.core_radius_range;
        if self.random_lights.count > 0 && !(lo > 0.0 && hi >= lo && hi.is_finite()) {
            return Err(FlareError::config(format!(
                "random light core radius range must satisfy 0 < min <= max, got ({lo}, {hi})"
            )));
        }
        if !self.random_lights.color_temperature_bias.is_finite() {
            return Err(FlareError::config(
                "random light color temperature bias must be finite",
            ));
        }
        if let Some(intensity) = self.random_lights.intensity {
            if !(intensity.is_finite() && intensity >= 0.0) {
                return Err(FlareError::config(format!(
                    "random light intensity must be non-negative, got {intensity}"
                )));
            }
        }

        let hot = &self.hot_pixels;
        if hot.count > 0 && !(hot.min >= 0.0 && hot.max > hot.min && hot.max.is_finite()) {
            return Err(FlareError::config(format!(
                "hot pixel range must satisfy 0 <= min < max, got [{}, {})",
                hot.min, hot.max
            )));
        }

        validate_shape(&self.shape)
    }
}

fn validate_light(light: &LightSourceSpec) -> std::result::Result<(), String> {
    if !(light.center_row.is_finite() && light.center_col.is_finite()) {
        return Err("center must be finite".into());
    }
    if !(light.core_radius.is_finite() && light.core_radius > 0.0) {
        return Err(format!("core radius must be positive, got {}", light.core_radius));
    }
    if !(light.intensity.is_finite() && light.intensity >= 0.0) {
        return Err(format!("intensity must be non-negative, got {}", light.intensity));
    }
    if !light.color_temperature_bias.is_finite() {
        return Err("color temperature bias must be finite".into());
    }
    Ok(())
}

fn validate_shape(shape: &FlareShape) -> Result<()> {
    let positive = [
        ("halo_length_factor", shape.halo_length_factor),
        ("cross_length_factor", shape.cross_length_factor),
        ("chromatic_step", shape.chromatic_step),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(FlareError::config(format!("{name} must be positive, got {value}")));
        }
    }
    if !(shape.halo_extent_factor.is_finite() && shape.halo_extent_factor >= 1.0) {
        return Err(FlareError::config(format!(
            "halo_extent_factor must be at least 1, got {}",
            shape.halo_extent_factor
        )));
    }
    if !(shape.cross_extent_factor.is_finite() && shape.cross_extent_factor >= 1.0) {
        return Err(FlareError::config(format!(
            "cross_extent_factor must be at least 1, got {}",
            shape.cross_extent_factor
        )));
    }
    if !(shape.cross_gain.is_finite() && shape.cross_gain >= 0.0) {
        return Err(FlareError::config(format!(
            "cross_gain must be non-negative, got {}",
            shape.cross_gain
        )));
    }
    if !(shape.ghost_attenuation > 0.0 && shape.ghost_attenuation < 1.0) {
        return Err(FlareError::config(format!(
            "ghost_attenuation must be in (0, 1), got {}",
            shape.ghost_attenuation
        )));
    }
    Ok(())
}
