//! Supplementary flare analysis beyond the three headline indices:
//! intensity statistics, a letter-graded quality assessment, and the
//! spatial structure of the flare mask.

pub mod components;
pub mod quality;
pub mod spatial;
pub mod statistics;

pub use quality::{QualityAssessment, QualityGrade};
pub use spatial::SpatialStats;
pub use statistics::FlareStatistics;
