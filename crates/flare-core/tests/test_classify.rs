mod common;

use ndarray::Array2;

use flare_core::classify::{classify, classify_sensor_frame, label_map, region_of, Region};
use flare_core::frame::{Channel, Frame};
use flare_core::thresholds::ThresholdSet;

use common::{mono, rgb, standard_thresholds, BIT_DEPTH};

#[test]
fn test_region_counts_partition_the_frame() {
    let t = standard_thresholds();
    for (rows, cols) in [(1, 1), (3, 7), (16, 16), (300, 257)] {
        let data = Array2::from_shape_fn((rows, cols), |(r, c)| ((r * 31 + c * 17) % 1024) as u16);
        let aggregate = classify(&Frame::new(data, BIT_DEPTH), &t);
        assert_eq!(aggregate.total_pixels(), rows * cols, "{rows}x{cols}");
    }
}

#[test]
fn test_uniform_flare_floor_is_background() {
    let t = standard_thresholds();
    let frame = Frame::filled(8, 8, 74, BIT_DEPTH);
    let aggregate = classify(&frame, &t);
    assert_eq!(aggregate.background.count, 64);
    assert_eq!(aggregate.background.sum, 64 * 10);
    assert!(aggregate.flare.is_empty());
    assert!(aggregate.direct_light.is_empty());
    assert!(aggregate.light_source.is_empty());
}

#[test]
fn test_values_below_offset_count_as_background_with_zero_signal() {
    let t = standard_thresholds();
    let frame = Frame::filled(4, 4, 10, BIT_DEPTH);
    let aggregate = classify(&frame, &t);
    assert_eq!(aggregate.background.count, 16);
    assert_eq!(aggregate.background.sum, 0);
}

#[test]
fn test_ramp_with_tight_thresholds() {
    let t = ThresholdSet::new(0, 0, 1, 2, 1023).unwrap();
    let frame = common::ramp_4x4();
    let (_, aggregate) = classify_sensor_frame(&frame, &t).remove(0);

    assert_eq!((aggregate.background.count, aggregate.background.sum), (4, 0));
    assert_eq!((aggregate.flare.count, aggregate.flare.sum), (4, 4));
    assert_eq!((aggregate.direct_light.count, aggregate.direct_light.sum), (4, 8));
    assert_eq!((aggregate.light_source.count, aggregate.light_source.sum), (4, 12));
}

#[test]
fn test_ramp_with_literal_thresholds() {
    let t = ThresholdSet::new(0, 1, 2, 3, 1023).unwrap();
    let frame = common::ramp_4x4();
    let (_, aggregate) = classify_sensor_frame(&frame, &t).remove(0);

    assert_eq!(aggregate.background.count, 8);
    assert_eq!((aggregate.flare.count, aggregate.flare.sum), (4, 8));
    assert_eq!((aggregate.direct_light.count, aggregate.direct_light.sum), (4, 12));
    assert_eq!(aggregate.light_source.count, 0);
}

#[test]
fn test_rgb_channels_classified_independently() {
    let t = standard_thresholds();
    let frame = rgb(
        Array2::from_elem((2, 2), 200),
        Array2::from_elem((2, 2), 500),
        Array2::from_elem((2, 2), 64),
    );
    let result = classify_sensor_frame(&frame, &t);

    let channels: Vec<Channel> = result.iter().map(|(c, _)| *c).collect();
    assert_eq!(channels, vec![Channel::Red, Channel::Green, Channel::Blue]);
    assert_eq!(result[0].1.flare.count, 4);
    assert_eq!(result[1].1.direct_light.count, 4);
    assert_eq!(result[2].1.background.count, 4);
}

#[test]
fn test_label_map_matches_region_of() {
    let t = standard_thresholds();
    let data = ndarray::array![[0u16, 74, 75], [400, 401, 600], [601, 1023, 64]];
    let frame = Frame::new(data.clone(), BIT_DEPTH);
    let labels = label_map(&frame, &t);

    assert_eq!(labels.dim(), (3, 3));
    for ((idx, &v), &label) in data.indexed_iter().zip(labels.iter()) {
        assert_eq!(label, region_of(v, &t), "at {idx:?}");
    }
    assert_eq!(labels[[0, 2]], Region::Flare);
    assert_eq!(labels[[1, 1]], Region::DirectLight);
    assert_eq!(labels[[2, 0]], Region::LightSource);
}

#[test]
fn test_mono_helper_single_channel() {
    let frame = mono(Array2::from_elem((3, 3), 100));
    let result = classify_sensor_frame(&frame, &standard_thresholds());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].0, Channel::Gray);
}
