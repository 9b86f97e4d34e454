use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{FlareError, Result};
use crate::frame::{ChannelLayout, ColorFrame, Frame, SensorFrame};

use super::FrameBuffer;

/// Add zero-mean Gaussian noise to every sample, then clip to the sensor
/// range and round to integer ADU.
///
/// Planes are sampled in order from a single `ChaCha8Rng` stream, so the
/// same `(buffer, sigma, seed)` always yields the same frame. `sigma == 0`
/// draws nothing and only quantizes.
pub fn apply(buffer: FrameBuffer, sigma: f64, seed: u64) -> Result<SensorFrame> {
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(FlareError::config(format!(
            "noise sigma must be non-negative, got {sigma}"
        )));
    }

    let max_value = buffer.max_value() as f64;
    let bit_depth = buffer.bit_depth;
    let layout = buffer.layout;
    let mut planes = buffer.planes;

    if sigma > 0.0 {
        let normal = Normal::new(0.0, sigma)
            .map_err(|e| FlareError::config(format!("invalid noise sigma {sigma}: {e}")))?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for plane in planes.iter_mut() {
            for v in plane.iter_mut() {
                *v += normal.sample(&mut rng);
            }
        }
    }

    let frames: Vec<Frame> = planes
        .into_iter()
        .map(|plane| Frame::new(quantize(&plane, max_value), bit_depth))
        .collect();

    let mut frames = frames.into_iter();
    match (layout, frames.next(), frames.next(), frames.next()) {
        (ChannelLayout::Mono, Some(gray), None, None) => Ok(SensorFrame::Mono(gray)),
        (ChannelLayout::Rgb, Some(red), Some(green), Some(blue)) => {
            Ok(SensorFrame::Color(ColorFrame::new(red, green, blue)?))
        }
        (layout, ..) => Err(FlareError::config(format!(
            "frame buffer planes do not match the {layout} layout"
        ))),
    }
}

/// Clip to `[0, max_value]` and round half away from zero.
fn quantize(plane: &Array2<f64>, max_value: f64) -> Array2<u16> {
    plane.mapv(|v| v.clamp(0.0, max_value).round() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_clips_and_rounds() {
        let plane = ndarray::array![[-5.0, 0.4, 0.5], [1022.6, 1023.0, 5000.0]];
        let q = quantize(&plane, 1023.0);
        assert_eq!(q, ndarray::array![[0u16, 0, 1], [1023, 1023, 1023]]);
    }
}
