use serde::{Deserialize, Serialize};

use crate::consts::{COVERAGE_WEIGHT, SEVERITY_SATURATION_F_RAW, SEVERITY_WEIGHT};
use crate::metrics::ChannelMetrics;

/// Letter grade derived from the quality index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityGrade {
    A,
    B,
    C,
    D,
    F,
}

impl QualityGrade {
    pub fn from_index(quality_index: f64) -> Self {
        if quality_index >= 0.9 {
            Self::A
        } else if quality_index >= 0.8 {
            Self::B
        } else if quality_index >= 0.7 {
            Self::C
        } else if quality_index >= 0.6 {
            Self::D
        } else {
            Self::F
        }
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// Overall optical quality of one channel; 1.0 means no flare at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// F_raw scaled into [0, 1].
    pub severity_score: f64,
    /// Flare coverage fraction.
    pub coverage_score: f64,
    pub quality_index: f64,
    pub grade: QualityGrade,
}

impl QualityAssessment {
    pub fn from_metrics(metrics: &ChannelMetrics) -> Self {
        let severity_score = (metrics.f_raw / SEVERITY_SATURATION_F_RAW).min(1.0);
        let coverage_score = metrics.coverage_ratio;
        let quality_index = 1.0 - (severity_score * SEVERITY_WEIGHT + coverage_score * COVERAGE_WEIGHT);
        Self {
            severity_score,
            coverage_score,
            quality_index,
            grade: QualityGrade::from_index(quality_index),
        }
    }
}
