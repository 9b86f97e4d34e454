use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BETA, DEFAULT_BIT_DEPTH, DEFAULT_DIRECT_THRESHOLD, DEFAULT_LIGHT_THRESHOLD,
    DEFAULT_OFFSET, DEFAULT_PIXEL_PITCH_UM, DEFAULT_SIGNAL_THRESHOLD,
};
use crate::error::{FlareError, Result};
use crate::frame::ChannelLayout;
use crate::generate::GeneratorConfig;
use crate::metrics::MetricParams;
use crate::thresholds::ThresholdSet;

/// Evaluation settings as found in a TOML file or on the command line.
/// Nothing is validated until [`thresholds`](Self::thresholds) or
/// [`metric_params`](Self::metric_params) is called.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub bit_depth: u8,
    pub channels: ChannelLayout,
    /// Sensor black level, ADU.
    pub offset: u32,
    pub signal_threshold: u32,
    pub direct_threshold: u32,
    pub light_threshold: u32,
    pub pixel_pitch_um: f64,
    /// Coverage exponent of F_final.
    pub beta: f64,
    /// Include statistics, quality grade and spatial analysis in reports.
    pub analysis: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            bit_depth: DEFAULT_BIT_DEPTH,
            channels: ChannelLayout::Mono,
            offset: DEFAULT_OFFSET,
            signal_threshold: DEFAULT_SIGNAL_THRESHOLD,
            direct_threshold: DEFAULT_DIRECT_THRESHOLD,
            light_threshold: DEFAULT_LIGHT_THRESHOLD,
            pixel_pitch_um: DEFAULT_PIXEL_PITCH_UM,
            beta: DEFAULT_BETA,
            analysis: false,
        }
    }
}

impl EvaluationConfig {
    pub fn thresholds(&self) -> Result<ThresholdSet> {
        ThresholdSet::for_bit_depth(
            self.offset,
            self.signal_threshold,
            self.direct_threshold,
            self.light_threshold,
            self.bit_depth,
        )
    }

    pub fn metric_params(&self) -> Result<MetricParams> {
        MetricParams::new(self.pixel_pitch_um, self.beta)
    }
}

/// Combined configuration file with `[evaluation]` and `[generation]` tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareConfig {
    pub evaluation: EvaluationConfig,
    pub generation: GeneratorConfig,
}

impl FlareConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FlareError::config(format!("invalid TOML: {e}")))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| FlareError::config(format!("cannot serialize configuration: {e}")))
    }

    /// Overlay the keys present in `text` onto `self`. Keys the document
    /// does not mention keep their current values, at any nesting depth.
    pub fn merged_with_toml(&self, text: &str) -> Result<Self> {
        let overlay: toml::Table =
            toml::from_str(text).map_err(|e| FlareError::config(format!("invalid TOML: {e}")))?;
        let mut merged = toml::Value::try_from(self)
            .map_err(|e| FlareError::config(format!("cannot serialize configuration: {e}")))?;
        merge_values(&mut merged, toml::Value::Table(overlay));
        merged
            .try_into()
            .map_err(|e| FlareError::config(format!("invalid configuration: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
