use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{FlareStatistics, QualityAssessment, SpatialStats};
use crate::classify::ClassifiedAggregate;
use crate::error::Result;
use crate::frame::{Channel, ChannelLayout};
use crate::metrics::{self, FlareMetrics, MetricParams};
use crate::thresholds::ThresholdSet;

/// Per-channel section of an evaluation report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel: Channel,
    /// Pixel count and `(value - offset)` sum of every region.
    pub regions: ClassifiedAggregate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<FlareStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialStats>,
}

/// Everything needed to reproduce an evaluation from the JSON alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub layout: ChannelLayout,
    pub rows: usize,
    pub cols: usize,
    pub thresholds: ThresholdSet,
    pub pixel_pitch_um: f64,
    pub beta: f64,
    pub metrics: FlareMetrics,
    pub channels: Vec<ChannelReport>,
}

impl EvaluationReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Recompute the metrics from the stored region aggregates.
    pub fn recompute_metrics(&self) -> Result<FlareMetrics> {
        let params = MetricParams::new(self.pixel_pitch_um, self.beta)?;
        let per_channel = self
            .channels
            .iter()
            .map(|c| metrics::compute(&c.regions, &params, c.channel))
            .collect::<Result<Vec<_>>>()?;
        FlareMetrics::from_channels(per_channel)
    }
}
