mod common;

use approx::assert_relative_eq;
use ndarray::Array2;

use flare_core::analysis::components::region_areas;
use flare_core::analysis::{FlareStatistics, QualityAssessment, QualityGrade, SpatialStats};
use flare_core::classify::{classify, label_map, Region};
use flare_core::frame::Frame;
use flare_core::metrics::{ChannelMetrics, ReferenceRegion};

use common::{standard_thresholds, BIT_DEPTH};

fn channel_metrics(f_raw: f64, coverage_ratio: f64) -> ChannelMetrics {
    ChannelMetrics {
        f_raw,
        f_norm: 0.0,
        f_final: 0.0,
        reference: ReferenceRegion::DirectLight,
        flare_pixels: 0,
        coverage_ratio,
    }
}

#[test]
fn test_flare_statistics() {
    let t = standard_thresholds();
    let frame = Frame::new(ndarray::array![[64u16, 100], [200, 700]], BIT_DEPTH);
    let aggregate = classify(&frame, &t);
    let stats = FlareStatistics::from_frame(&frame, &t, &aggregate);

    assert_eq!(stats.total_flare_signal, 36 + 136);
    assert_relative_eq!(stats.mean_flare_intensity, 86.0);
    assert_eq!(stats.max_flare_intensity, 136);
    assert_relative_eq!(stats.intensity_ratio, 86.0 / 136.0);
    assert_relative_eq!(stats.flare_coverage_percent, 50.0);
    assert_relative_eq!(stats.direct_light_coverage_percent, 0.0);
    assert_eq!(stats.light_source_pixels, 1);
}

#[test]
fn test_flare_statistics_without_flare() {
    let t = standard_thresholds();
    let frame = Frame::filled(4, 4, 64, BIT_DEPTH);
    let stats = FlareStatistics::from_frame(&frame, &t, &classify(&frame, &t));
    assert_eq!(stats.max_flare_intensity, 0);
    assert_eq!(stats.intensity_ratio, 0.0);
    assert_eq!(stats.flare_coverage_percent, 0.0);
}

#[test]
fn test_quality_grades() {
    assert_eq!(QualityGrade::from_index(1.0), QualityGrade::A);
    assert_eq!(QualityGrade::from_index(0.9), QualityGrade::A);
    assert_eq!(QualityGrade::from_index(0.85), QualityGrade::B);
    assert_eq!(QualityGrade::from_index(0.75), QualityGrade::C);
    assert_eq!(QualityGrade::from_index(0.65), QualityGrade::D);
    assert_eq!(QualityGrade::from_index(0.2), QualityGrade::F);
    assert_eq!(QualityGrade::C.to_string(), "C");
}

#[test]
fn test_quality_assessment() {
    let clean = QualityAssessment::from_metrics(&channel_metrics(0.0, 0.0));
    assert_relative_eq!(clean.quality_index, 1.0);
    assert_eq!(clean.grade, QualityGrade::A);

    let saturated = QualityAssessment::from_metrics(&channel_metrics(500.0, 1.0));
    assert_relative_eq!(saturated.severity_score, 1.0);
    assert_relative_eq!(saturated.quality_index, 0.0, epsilon = 1e-12);
    assert_eq!(saturated.grade, QualityGrade::F);

    let mild = QualityAssessment::from_metrics(&channel_metrics(10.0, 0.05));
    assert_relative_eq!(mild.severity_score, 0.1);
    assert_relative_eq!(mild.quality_index, 1.0 - (0.06 + 0.02), epsilon = 1e-12);
    assert_eq!(mild.grade, QualityGrade::A);
}

#[test]
fn test_spatial_two_separate_regions() {
    let t = standard_thresholds();
    let mut data = Array2::from_elem((10, 10), 64u16);
    for c in 0..3 {
        data[[1, c]] = 200;
    }
    data[[8, 8]] = 200;
    data[[8, 9]] = 200;
    let labels = label_map(&Frame::new(data, BIT_DEPTH), &t);
    let spatial = SpatialStats::from_labels(&labels);

    assert_eq!(spatial.flare_regions, 2);
    assert_eq!(spatial.max_region_size, 3);
    assert_relative_eq!(spatial.mean_region_size, 2.5);
    assert!(spatial.concentration > 0.0 && spatial.concentration < 1.0);
}

#[test]
fn test_spatial_no_flare() {
    let t = standard_thresholds();
    let labels = label_map(&Frame::filled(5, 5, 64, BIT_DEPTH), &t);
    let spatial = SpatialStats::from_labels(&labels);
    assert_eq!(spatial.flare_regions, 0);
    assert_eq!(spatial.max_region_size, 0);
    assert_eq!(spatial.concentration, 0.0);
}

#[test]
fn test_single_point_is_fully_concentrated() {
    let t = standard_thresholds();
    let mut data = Array2::from_elem((9, 9), 64u16);
    data[[4, 4]] = 200;
    let spatial = SpatialStats::from_labels(&label_map(&Frame::new(data, BIT_DEPTH), &t));
    assert_relative_eq!(spatial.concentration, 1.0);
}

#[test]
fn test_flare_patches_sorted_largest_first() {
    let t = standard_thresholds();
    let mut data = Array2::from_elem((4, 6), 64u16);
    data[[0, 0]] = 200;
    for c in 2..6 {
        data[[3, c]] = 200;
    }
    data[[0, 4]] = 200;
    data[[0, 5]] = 200;
    let labels = label_map(&Frame::new(data, BIT_DEPTH), &t);

    assert_eq!(region_areas(&labels, Region::Flare), vec![4, 2, 1]);
    let spatial = SpatialStats::from_labels(&labels);
    assert_eq!(spatial.flare_regions, 3);
    assert_eq!(spatial.max_region_size, 4);
    assert_relative_eq!(spatial.mean_region_size, 7.0 / 3.0);
}
