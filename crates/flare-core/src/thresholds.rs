use serde::{Deserialize, Serialize};

use crate::error::{FlareError, Result};
use crate::frame::{max_value_for_bit_depth, validate_bit_depth};

/// Validated intensity boundaries that partition `[0, max_value]` into the
/// four classification regions.
///
/// Invariant: `offset + signal_threshold < direct_threshold < light_threshold <= max_value`.
/// Fields are private so a `ThresholdSet` can only exist in a valid state;
/// deserialization goes through the same check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdBounds")]
pub struct ThresholdSet {
    offset: u32,
    signal_threshold: u32,
    direct_threshold: u32,
    light_threshold: u32,
    max_value: u32,
}

/// Unvalidated threshold fields, as found in config files and reports.
#[derive(Clone, Copy, Debug, Deserialize)]
struct ThresholdBounds {
    offset: u32,
    signal_threshold: u32,
    direct_threshold: u32,
    light_threshold: u32,
    max_value: u32,
}

impl TryFrom<ThresholdBounds> for ThresholdSet {
    type Error = FlareError;

    fn try_from(b: ThresholdBounds) -> Result<Self> {
        ThresholdSet::new(
            b.offset,
            b.signal_threshold,
            b.direct_threshold,
            b.light_threshold,
            b.max_value,
        )
    }
}

impl ThresholdSet {
    pub fn new(
        offset: u32,
        signal_threshold: u32,
        direct_threshold: u32,
        light_threshold: u32,
        max_value: u32,
    ) -> Result<Self> {
        let flare_floor = offset.checked_add(signal_threshold).ok_or_else(|| {
            FlareError::config(format!(
                "offset ({offset}) + signal threshold ({signal_threshold}) overflows"
            ))
        })?;

        if flare_floor >= direct_threshold {
            return Err(FlareError::config(format!(
                "offset + signal threshold ({flare_floor}) must be below the direct threshold ({direct_threshold})"
            )));
        }
        if direct_threshold >= light_threshold {
            return Err(FlareError::config(format!(
                "direct threshold ({direct_threshold}) must be below the light threshold ({light_threshold})"
            )));
        }
        if light_threshold > max_value {
            return Err(FlareError::config(format!(
                "light threshold ({light_threshold}) exceeds the sensor maximum ({max_value})"
            )));
        }

        Ok(Self {
            offset,
            signal_threshold,
            direct_threshold,
            light_threshold,
            max_value,
        })
    }

    /// Build a threshold set whose ceiling is the full range of `bit_depth`.
    pub fn for_bit_depth(
        offset: u32,
        signal_threshold: u32,
        direct_threshold: u32,
        light_threshold: u32,
        bit_depth: u8,
    ) -> Result<Self> {
        validate_bit_depth(bit_depth)?;
        Self::new(
            offset,
            signal_threshold,
            direct_threshold,
            light_threshold,
            max_value_for_bit_depth(bit_depth),
        )
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn signal_threshold(&self) -> u32 {
        self.signal_threshold
    }

    pub fn direct_threshold(&self) -> u32 {
        self.direct_threshold
    }

    pub fn light_threshold(&self) -> u32 {
        self.light_threshold
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Highest value still classified as background (`offset + signal_threshold`).
    pub fn flare_floor(&self) -> u32 {
        self.offset + self.signal_threshold
    }
}

impl std::fmt::Display for ThresholdSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "offset {} / flare > {} / direct > {} / light > {} (max {})",
            self.offset,
            self.flare_floor(),
            self.direct_threshold,
            self.light_threshold,
            self.max_value
        )
    }
}
