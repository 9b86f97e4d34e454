use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::classify::Region;

use super::components::region_areas;

/// Spatial structure of the flare mask of one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialStats {
    /// Number of 4-connected flare regions.
    pub flare_regions: usize,
    pub max_region_size: usize,
    pub mean_region_size: f64,
    /// 1 for flare concentrated at one point, falling towards 0 as it spreads
    /// over the frame. 0 when there is no flare.
    pub concentration: f64,
}

impl SpatialStats {
    pub fn from_labels(labels: &Array2<Region>) -> Self {
        let mask = labels.mapv(|r| r == Region::Flare);
        let areas = region_areas(labels, Region::Flare);

        let flare_regions = areas.len();
        let max_region_size = areas.first().copied().unwrap_or(0);
        let mean_region_size = if flare_regions == 0 {
            0.0
        } else {
            areas.iter().sum::<usize>() as f64 / flare_regions as f64
        };

        Self {
            flare_regions,
            max_region_size,
            mean_region_size,
            concentration: concentration(&mask),
        }
    }
}

/// `1 - mean distance to the mask centroid / half the frame diagonal`.
fn concentration(mask: &Array2<bool>) -> f64 {
    let (h, w) = mask.dim();
    let points: Vec<(f64, f64)> = mask
        .indexed_iter()
        .filter(|(_, set)| **set)
        .map(|((r, c), _)| (r as f64, c as f64))
        .collect();
    if points.is_empty() {
        return 0.0;
    }

    let n = points.len() as f64;
    let cy = points.iter().map(|p| p.0).sum::<f64>() / n;
    let cx = points.iter().map(|p| p.1).sum::<f64>() / n;
    let mean_distance = points
        .iter()
        .map(|&(r, c)| ((r - cy).powi(2) + (c - cx).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let half_diagonal = ((h * h + w * w) as f64).sqrt() / 2.0;

    1.0 - mean_distance / half_diagonal
}
