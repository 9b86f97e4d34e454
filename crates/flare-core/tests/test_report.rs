mod common;

use approx::assert_relative_eq;
use ndarray::Array2;

use flare_core::engine::evaluate_detailed;
use flare_core::metrics::{FlareMetrics, MetricParams};
use flare_core::report::EvaluationReport;

use common::{frame_with_regions, rgb, standard_thresholds};

fn params() -> MetricParams {
    MetricParams::new(2.4, 0.5).unwrap()
}

#[test]
fn test_grayscale_schema() {
    let frame = frame_with_regions(16, 16, 20, 8);
    let report = evaluate_detailed(&frame, &standard_thresholds(), &params(), false).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["layout"], "mono");
    assert_eq!(json["rows"], 16);
    assert_eq!(json["metrics"]["mode"], "grayscale");
    assert!(json["metrics"]["F_raw"].is_number());
    assert!(json["metrics"]["F_norm"].is_number());
    assert!(json["metrics"]["F_final"].is_number());
    assert_eq!(json["thresholds"]["direct_threshold"], 400);
    assert_eq!(json["pixel_pitch_um"], 2.4);
    assert_eq!(json["channels"][0]["channel"], "gray");
    assert_eq!(json["channels"][0]["regions"]["flare"]["count"], 20);
    assert_eq!(json["channels"][0]["regions"]["direct_light"]["sum"], 8 * 436);
    assert!(json["channels"][0].get("statistics").is_none());
}

#[test]
fn test_rgb_schema() {
    let plane = Array2::from_shape_fn((8, 8), |(r, _)| if r == 0 { 500u16 } else { 200 });
    let frame = rgb(plane.clone(), plane.clone(), plane);
    let report = evaluate_detailed(&frame, &standard_thresholds(), &params(), false).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["metrics"]["mode"], "rgb");
    for channel in ["red", "green", "blue"] {
        assert!(json["metrics"][channel]["F_final"].is_number(), "{channel}");
    }
    assert!(json["metrics"]["combined_F_final"].is_number());
    assert_eq!(json["metrics"]["chromatic_aberration_index"], 0.0);
    assert_eq!(json["channels"].as_array().unwrap().len(), 3);
}

#[test]
fn test_metrics_reproducible_from_json() {
    let frame = frame_with_regions(32, 32, 150, 40);
    let report = evaluate_detailed(&frame, &standard_thresholds(), &params(), true).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    let loaded = EvaluationReport::load_json(&path).unwrap();

    let recomputed = loaded.recompute_metrics().unwrap();
    let (FlareMetrics::Grayscale(original), FlareMetrics::Grayscale(recomputed)) =
        (&report.metrics, &recomputed)
    else {
        panic!("expected grayscale metrics");
    };
    assert_relative_eq!(original.f_raw, recomputed.f_raw, max_relative = 1e-12);
    assert_relative_eq!(original.f_norm, recomputed.f_norm, max_relative = 1e-12);
    assert_relative_eq!(original.f_final, recomputed.f_final, max_relative = 1e-12);
    assert_eq!(loaded.thresholds, report.thresholds);
    assert_eq!(loaded.channels[0].regions, report.channels[0].regions);
}

#[test]
fn test_analysis_sections_included_on_request() {
    let frame = frame_with_regions(16, 16, 20, 8);
    let report = evaluate_detailed(&frame, &standard_thresholds(), &params(), true).unwrap();
    let channel = &report.channels[0];

    let stats = channel.statistics.as_ref().unwrap();
    assert_eq!(stats.total_flare_signal, 20 * 136);
    assert_eq!(channel.spatial.as_ref().unwrap().flare_regions, 1);
    assert!(channel.quality.is_some());

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert!(json["channels"][0]["statistics"].is_object());
    assert!(json["channels"][0]["quality"]["grade"].is_string());
}
