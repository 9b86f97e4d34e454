#![allow(dead_code)]

use ndarray::Array2;

use flare_core::frame::{ChannelLayout, ColorFrame, Frame, SensorFrame};
use flare_core::generate::{GeneratorConfig, LightSourceSpec, PatternFlags, RandomLights};
use flare_core::thresholds::ThresholdSet;

pub const BIT_DEPTH: u8 = 10;

/// 64 / 10 / 400 / 600 on a 10-bit sensor.
pub fn standard_thresholds() -> ThresholdSet {
    ThresholdSet::new(64, 10, 400, 600, 1023).expect("valid thresholds")
}

pub fn mono(data: Array2<u16>) -> SensorFrame {
    SensorFrame::Mono(Frame::new(data, BIT_DEPTH))
}

pub fn uniform(rows: usize, cols: usize, value: u16) -> SensorFrame {
    SensorFrame::Mono(Frame::filled(rows, cols, value, BIT_DEPTH))
}

pub fn rgb(red: Array2<u16>, green: Array2<u16>, blue: Array2<u16>) -> SensorFrame {
    SensorFrame::Color(
        ColorFrame::new(
            Frame::new(red, BIT_DEPTH),
            Frame::new(green, BIT_DEPTH),
            Frame::new(blue, BIT_DEPTH),
        )
        .expect("matching planes"),
    )
}

/// Four identical rows of `[0, 1, 2, 3]`.
pub fn ramp_4x4() -> SensorFrame {
    mono(Array2::from_shape_fn((4, 4), |(_, c)| c as u16))
}

/// A frame at the black level with `flare` pixels at 200 ADU and `direct`
/// pixels at 500 ADU, laid out row-major from the top-left corner.
pub fn frame_with_regions(rows: usize, cols: usize, flare: usize, direct: usize) -> SensorFrame {
    let mut data = Array2::from_elem((rows, cols), 64u16);
    for (i, v) in data.iter_mut().enumerate() {
        if i < direct {
            *v = 500;
        } else if i < direct + flare {
            *v = 200;
        }
    }
    mono(data)
}

/// Noise-free generator setup with nothing but a uniform background.
pub fn empty_scene(size: usize, channels: ChannelLayout) -> GeneratorConfig {
    GeneratorConfig {
        size,
        bit_depth: BIT_DEPTH,
        channels,
        background: 64.0,
        lights: Vec::new(),
        random_lights: RandomLights {
            count: 0,
            ..RandomLights::default()
        },
        noise_sigma: 0.0,
        ..GeneratorConfig::default()
    }
}

/// One bright source at the center of a 128x128 frame.
pub fn single_light_scene(channels: ChannelLayout, chromatic: bool, bias: f64) -> GeneratorConfig {
    GeneratorConfig {
        lights: vec![LightSourceSpec {
            center_row: 64.0,
            center_col: 64.0,
            core_radius: 3.0,
            intensity: 1023.0,
            color_temperature_bias: bias,
            pattern: PatternFlags::default(),
        }],
        chromatic_enabled: chromatic,
        ..empty_scene(128, channels)
    }
}

/// Write `contents` to a temporary `.csv` file that lives as long as the handle.
pub fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp file");
    f.write_all(contents.as_bytes()).expect("write CSV data");
    f.flush().expect("flush");
    f
}
