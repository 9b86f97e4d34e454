use flare_core::error::FlareError;
use flare_core::thresholds::ThresholdSet;

#[test]
fn test_valid_ordering_accepted() {
    let t = ThresholdSet::new(64, 10, 400, 600, 1023).unwrap();
    assert_eq!(t.flare_floor(), 74);
    assert_eq!(t.max_value(), 1023);
}

#[test]
fn test_light_threshold_may_equal_max() {
    assert!(ThresholdSet::new(0, 0, 1, 3, 3).is_ok());
}

#[test]
fn test_invalid_orderings_rejected() {
    let cases = [
        (64, 10, 74, 600, 1023),  // floor == direct
        (64, 10, 400, 400, 1023), // direct == light
        (64, 10, 500, 400, 1023), // direct > light
        (64, 10, 400, 2000, 1023), // light > max
        (u32::MAX, 1, 400, 600, 1023), // overflow
    ];
    for (o, s, d, l, m) in cases {
        let err = ThresholdSet::new(o, s, d, l, m).unwrap_err();
        assert!(matches!(err, FlareError::Config(_)), "{o}/{s}/{d}/{l}/{m}: {err}");
    }
}

#[test]
fn test_for_bit_depth_sets_ceiling() {
    let t = ThresholdSet::for_bit_depth(256, 50, 2000, 8000, 14).unwrap();
    assert_eq!(t.max_value(), 16383);
    assert!(ThresholdSet::for_bit_depth(64, 10, 400, 600, 0).is_err());
    assert!(ThresholdSet::for_bit_depth(64, 10, 400, 600, 17).is_err());
    // 8-bit ceiling is below the default light threshold.
    assert!(ThresholdSet::for_bit_depth(64, 10, 400, 600, 8).is_err());
}

#[test]
fn test_deserialization_is_validated() {
    let ok = r#"{"offset":64,"signal_threshold":10,"direct_threshold":400,"light_threshold":600,"max_value":1023}"#;
    let t: ThresholdSet = serde_json::from_str(ok).unwrap();
    assert_eq!(t.direct_threshold(), 400);

    let bad = r#"{"offset":64,"signal_threshold":10,"direct_threshold":700,"light_threshold":600,"max_value":1023}"#;
    assert!(serde_json::from_str::<ThresholdSet>(bad).is_err());
}
