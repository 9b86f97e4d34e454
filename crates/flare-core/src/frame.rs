use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, MAX_BIT_DEPTH};
use crate::error::{FlareError, Result};

/// Largest representable sample for a sensor of the given bit depth.
pub fn max_value_for_bit_depth(bit_depth: u8) -> u32 {
    (1u32 << bit_depth.min(MAX_BIT_DEPTH)) - 1
}

/// Reject bit depths the u16 sample storage cannot hold.
pub fn validate_bit_depth(bit_depth: u8) -> Result<()> {
    if bit_depth == 0 || bit_depth > MAX_BIT_DEPTH {
        return Err(FlareError::config(format!(
            "bit depth must be in 1..={MAX_BIT_DEPTH}, got {bit_depth}"
        )));
    }
    Ok(())
}

/// A single sensor channel.
/// Samples are raw ADU counts bounded by `2^bit_depth - 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel data, row-major, shape = (rows, cols)
    pub data: Array2<u16>,
    /// Sensor bit depth the samples were quantized to
    pub bit_depth: u8,
}

impl Frame {
    pub fn new(data: Array2<u16>, bit_depth: u8) -> Self {
        Self { data, bit_depth }
    }

    /// A frame with every sample set to `value`.
    pub fn filled(rows: usize, cols: usize, value: u16, bit_depth: u8) -> Self {
        Self::new(Array2::from_elem((rows, cols), value), bit_depth)
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    pub fn max_value(&self) -> u32 {
        max_value_for_bit_depth(self.bit_depth)
    }
}

/// Color frame composed of separate channel frames of identical shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFrame {
    pub red: Frame,
    pub green: Frame,
    pub blue: Frame,
}

impl ColorFrame {
    pub fn new(red: Frame, green: Frame, blue: Frame) -> Result<Self> {
        if red.data.dim() != green.data.dim() || red.data.dim() != blue.data.dim() {
            return Err(FlareError::data_format(
                0,
                format!(
                    "color planes differ in shape: {:?} / {:?} / {:?}",
                    red.data.dim(),
                    green.data.dim(),
                    blue.data.dim()
                ),
            ));
        }
        Ok(Self { red, green, blue })
    }

    /// Planes in R, G, B order, tagged with their channel.
    pub fn planes(&self) -> [(Channel, &Frame); 3] {
        [
            (Channel::Red, &self.red),
            (Channel::Green, &self.green),
            (Channel::Blue, &self.blue),
        ]
    }

    /// Compute luminance using ITU-R BT.601 weights, rounded back to ADU.
    pub fn luminance(&self) -> Frame {
        let (h, w) = self.red.data.dim();
        let mut data = Array2::<u16>::zeros((h, w));

        for row in 0..h {
            for col in 0..w {
                let y = LUMINANCE_R * self.red.data[[row, col]] as f64
                    + LUMINANCE_G * self.green.data[[row, col]] as f64
                    + LUMINANCE_B * self.blue.data[[row, col]] as f64;
                data[[row, col]] = y.round() as u16;
            }
        }

        Frame::new(data, self.red.bit_depth)
    }
}

/// A sensor readout, either single-channel or RGB.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum SensorFrame {
    Mono(Frame),
    Color(ColorFrame),
}

impl SensorFrame {
    pub fn layout(&self) -> ChannelLayout {
        match self {
            Self::Mono(_) => ChannelLayout::Mono,
            Self::Color(_) => ChannelLayout::Rgb,
        }
    }

    /// Every channel plane with its tag; one entry for mono, three for RGB.
    pub fn planes(&self) -> Vec<(Channel, &Frame)> {
        match self {
            Self::Mono(f) => vec![(Channel::Gray, f)],
            Self::Color(cf) => cf.planes().to_vec(),
        }
    }

    fn first_plane(&self) -> &Frame {
        match self {
            Self::Mono(f) => f,
            Self::Color(cf) => &cf.red,
        }
    }

    pub fn rows(&self) -> usize {
        self.first_plane().rows()
    }

    pub fn cols(&self) -> usize {
        self.first_plane().cols()
    }

    pub fn bit_depth(&self) -> u8 {
        self.first_plane().bit_depth
    }

    /// Single-channel view: the frame itself for mono, luminance for RGB.
    pub fn to_mono(&self) -> Frame {
        match self {
            Self::Mono(f) => f.clone(),
            Self::Color(cf) => cf.luminance(),
        }
    }
}

/// Channel arrangement of a sensor readout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    #[default]
    Mono,
    Rgb,
}

impl ChannelLayout {
    pub fn channel_count(&self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Rgb => crate::consts::COLOR_CHANNEL_COUNT,
        }
    }

    pub fn channels(&self) -> &'static [Channel] {
        match self {
            Self::Mono => &[Channel::Gray],
            Self::Rgb => &[Channel::Red, Channel::Green, Channel::Blue],
        }
    }
}

impl std::fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mono => write!(f, "Grayscale"),
            Self::Rgb => write!(f, "RGB"),
        }
    }
}

/// Identifies one plane of a sensor readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Gray,
    Red,
    Green,
    Blue,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gray => write!(f, "gray"),
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
        }
    }
}
