mod common;

use flare_core::error::FlareError;
use flare_core::frame::{ChannelLayout, SensorFrame};
use flare_core::io::{load_frame_csv, read_frame_csv, save_frame_csv, write_frame_csv};

use common::{rgb, write_temp_csv};

#[test]
fn test_load_grayscale() {
    let file = write_temp_csv("64,65,66\n100,200,300\n");
    let frame = load_frame_csv(file.path(), ChannelLayout::Mono, 10).unwrap();
    let SensorFrame::Mono(f) = frame else {
        panic!("expected mono frame");
    };
    assert_eq!(f.data, ndarray::array![[64u16, 65, 66], [100, 200, 300]]);
    assert_eq!(f.bit_depth, 10);
}

#[test]
fn test_decimal_grayscale_rounded() {
    let frame = read_frame_csv("64.00, 64.4\n64.5,70.9\n".as_bytes(), ChannelLayout::Mono, 10)
        .unwrap();
    assert_eq!(
        frame.planes()[0].1.data,
        ndarray::array![[64u16, 64], [65, 71]]
    );
}

#[test]
fn test_load_rgb_with_mixed_whitespace() {
    let text = "1 2 3,4\t5  6\n7 8 9, 10 11 12\n";
    let frame = read_frame_csv(text.as_bytes(), ChannelLayout::Rgb, 10).unwrap();
    let SensorFrame::Color(cf) = frame else {
        panic!("expected color frame");
    };
    assert_eq!(cf.red.data, ndarray::array![[1u16, 4], [7, 10]]);
    assert_eq!(cf.green.data, ndarray::array![[2u16, 5], [8, 11]]);
    assert_eq!(cf.blue.data, ndarray::array![[3u16, 6], [9, 12]]);
}

#[test]
fn test_ragged_rows_rejected_with_line() {
    let err = read_frame_csv("1,2,3\n4,5\n".as_bytes(), ChannelLayout::Mono, 10).unwrap_err();
    match err {
        FlareError::DataFormat { line, .. } => assert_eq!(line, 2),
        other => panic!("expected DataFormat, got {other}"),
    }
}

#[test]
fn test_bad_cells_rejected() {
    let cases = [
        ("1,abc\n", ChannelLayout::Mono),
        ("1,-2\n", ChannelLayout::Mono),
        ("1,2000\n", ChannelLayout::Mono),
        ("1,inf\n", ChannelLayout::Mono),
        ("1 2 3,4 5\n", ChannelLayout::Rgb),
        ("1 2 3,4 5 6 7\n", ChannelLayout::Rgb),
        ("1 2 3,4 -5 6\n", ChannelLayout::Rgb),
        ("1 2 3,4 5 1024\n", ChannelLayout::Rgb),
    ];
    for (text, layout) in cases {
        let err = read_frame_csv(text.as_bytes(), layout, 10).unwrap_err();
        assert!(
            matches!(err, FlareError::DataFormat { line: 1, .. }),
            "{text:?}: {err}"
        );
    }
}

#[test]
fn test_empty_input_rejected() {
    let err = read_frame_csv("".as_bytes(), ChannelLayout::Mono, 10).unwrap_err();
    assert!(matches!(err, FlareError::DataFormat { .. }));
}

#[test]
fn test_invalid_bit_depth_rejected() {
    let err = read_frame_csv("1,2\n".as_bytes(), ChannelLayout::Mono, 0).unwrap_err();
    assert!(matches!(err, FlareError::Config(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_frame_csv(
        std::path::Path::new("/nonexistent/frame.csv"),
        ChannelLayout::Mono,
        10,
    )
    .unwrap_err();
    assert!(matches!(err, FlareError::Io(_)));
}

#[test]
fn test_rgb_written_as_space_separated_triplets() {
    let frame = rgb(
        ndarray::array![[1u16, 4]],
        ndarray::array![[2u16, 5]],
        ndarray::array![[3u16, 6]],
    );
    let mut out = Vec::new();
    write_frame_csv(&frame, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1 2 3,4 5 6\n");
}

#[test]
fn test_saved_frame_reloads() {
    let frame = common::mono(ndarray::Array2::from_shape_fn((5, 7), |(r, c)| {
        (r * 100 + c) as u16
    }));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.csv");
    save_frame_csv(&frame, &path).unwrap();
    let reloaded = load_frame_csv(&path, ChannelLayout::Mono, 10).unwrap();
    assert_eq!(reloaded, frame);
}
