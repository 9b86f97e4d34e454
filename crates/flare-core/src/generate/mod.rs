//! Synthetic flare frame generation.
//!
//! Compositing happens in an `f64` [`FrameBuffer`]; clipping and rounding
//! happen once in [`noise::apply`], so the order in which light sources are
//! added never changes the result.

pub mod config;
pub mod noise;
pub mod patterns;

pub use config::{
    FlareShape, GeneratorConfig, HotPixels, LightSourceSpec, PatternFlags, RandomLights,
};

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::consts::{HOT_PIXEL_PROTECT_FRACTION, RANDOM_LIGHT_MARGIN_DIVISOR};
use crate::error::Result;
use crate::frame::{max_value_for_bit_depth, ChannelLayout};

/// Pre-noise working buffer, one plane per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub planes: Vec<Array2<f64>>,
    pub layout: ChannelLayout,
    pub bit_depth: u8,
}

impl FrameBuffer {
    /// Square buffer with every sample of every plane at `floor`.
    pub fn uniform(size: usize, layout: ChannelLayout, bit_depth: u8, floor: f64) -> Self {
        let planes = (0..layout.channel_count())
            .map(|_| Array2::from_elem((size, size), floor))
            .collect();
        Self {
            planes,
            layout,
            bit_depth,
        }
    }

    pub fn rows(&self) -> usize {
        self.planes.first().map_or(0, |p| p.nrows())
    }

    pub fn cols(&self) -> usize {
        self.planes.first().map_or(0, |p| p.ncols())
    }

    pub fn max_value(&self) -> u32 {
        max_value_for_bit_depth(self.bit_depth)
    }

    /// Geometric center in pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.rows() as f64 - 1.0) / 2.0,
            (self.cols() as f64 - 1.0) / 2.0,
        )
    }
}

/// Composite every light source of `config` onto a uniform background.
///
/// Explicit lights come first, then `random_lights.count` sources placed by a
/// `ChaCha8Rng` seeded with `seed`. Hot pixels are drawn from the same stream
/// after placement.
pub fn composite(config: &GeneratorConfig, seed: u64) -> Result<FrameBuffer> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let lights = materialize_lights(config, &mut rng);

    let mut buffer =
        FrameBuffer::uniform(config.size, config.channels, config.bit_depth, config.background);
    let frame_center = buffer.center();
    let shape = &config.shape;

    if config.chromatic_enabled {
        for (plane, &channel) in buffer.planes.iter_mut().zip(config.channels.channels()) {
            for light in &lights {
                let scale = patterns::chromatic_scale(
                    channel,
                    light.color_temperature_bias,
                    shape.chromatic_step,
                );
                patterns::composite_light(plane, light, scale, shape, frame_center);
            }
        }
    } else if let Some((first, rest)) = buffer.planes.split_first_mut() {
        for light in &lights {
            patterns::composite_light(first, light, 1.0, shape, frame_center);
        }
        for plane in rest {
            plane.assign(&*first);
        }
    }

    place_hot_pixels(&mut buffer, &config.hot_pixels, &mut rng);

    debug!(
        size = config.size,
        lights = lights.len(),
        chromatic = config.chromatic_enabled,
        "Light sources composited"
    );
    Ok(buffer)
}

/// Explicit lights followed by the randomly placed ones.
pub fn materialize_lights(config: &GeneratorConfig, rng: &mut impl Rng) -> Vec<LightSourceSpec> {
    let mut lights = config.lights.clone();

    let random = &config.random_lights;
    let margin = config.size / RANDOM_LIGHT_MARGIN_DIVISOR;
    let (lo, hi) = (margin, config.size - margin);
    let (radius_lo, radius_hi) = random.core_radius_range;
    let intensity = random
        .intensity
        .unwrap_or_else(|| config.max_value() as f64);

    for _ in 0..random.count {
        let center_row = rng.gen_range(lo..hi) as f64;
        let center_col = rng.gen_range(lo..hi) as f64;
        let core_radius = rng.gen_range(radius_lo..=radius_hi);
        lights.push(LightSourceSpec {
            center_row,
            center_col,
            core_radius,
            intensity,
            color_temperature_bias: random.color_temperature_bias,
            pattern: random.pattern,
        });
    }

    lights
}

/// Overwrite random positions with defect values, identical across channels.
/// Positions already near saturation are left alone.
fn place_hot_pixels(buffer: &mut FrameBuffer, hot: &HotPixels, rng: &mut impl Rng) {
    if hot.count == 0 {
        return;
    }
    let (rows, cols) = (buffer.rows(), buffer.cols());
    let protect = HOT_PIXEL_PROTECT_FRACTION * buffer.max_value() as f64;

    let mut skipped = 0usize;
    for _ in 0..hot.count {
        let row = rng.gen_range(0..rows);
        let col = rng.gen_range(0..cols);
        let value = rng.gen_range(hot.min..hot.max);

        if buffer.planes.iter().any(|p| p[[row, col]] >= protect) {
            skipped += 1;
            continue;
        }
        for plane in buffer.planes.iter_mut() {
            plane[[row, col]] = value;
        }
    }

    if skipped > 0 {
        warn!(
            skipped,
            requested = hot.count,
            "Hot pixels skipped over near-saturated samples"
        );
    }
}
