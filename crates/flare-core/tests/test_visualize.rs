mod common;

use image::Rgb;
use ndarray::Array2;

use flare_core::classify::Region;
use flare_core::frame::Frame;
use flare_core::io::visualize::{
    colorize_regions, flare_mask, heatmap, region_color, save_heatmap, save_region_map,
    DIRECT_LIGHT_COLOR, FLARE_COLOR, LIGHT_SOURCE_COLOR,
};

use common::{mono, standard_thresholds, BIT_DEPTH};

fn sample() -> Array2<u16> {
    ndarray::array![[64u16, 200], [500, 900]]
}

#[test]
fn test_region_colors() {
    let img = colorize_regions(&Frame::new(sample(), BIT_DEPTH), &standard_thresholds());
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(*img.get_pixel(1, 0), Rgb(FLARE_COLOR));
    assert_eq!(*img.get_pixel(0, 1), Rgb(DIRECT_LIGHT_COLOR));
    assert_eq!(*img.get_pixel(1, 1), Rgb(LIGHT_SOURCE_COLOR));

    let bg = img.get_pixel(0, 0).0;
    assert_eq!(bg[0], bg[1]);
    assert!(bg[0] < 64);
}

#[test]
fn test_background_dimmed() {
    let Rgb([dark, _, _]) = region_color(Region::Background, 0, 1023);
    let Rgb([bright, _, _]) = region_color(Region::Background, 1023, 1023);
    assert_eq!(dark, 0);
    assert!(bright > dark && bright < 100);
}

#[test]
fn test_flare_mask() {
    let mask = flare_mask(&Frame::new(sample(), BIT_DEPTH), &standard_thresholds());
    assert_eq!(mask.get_pixel(1, 0).0, [255]);
    assert_eq!(mask.get_pixel(0, 0).0, [0]);
    assert_eq!(mask.get_pixel(0, 1).0, [0]);
}

#[test]
fn test_heatmap_extremes_differ() {
    let img = heatmap(&Frame::new(sample(), BIT_DEPTH));
    assert_ne!(img.get_pixel(0, 0), img.get_pixel(1, 1));
}

#[test]
fn test_save_png_and_pgm() {
    let frame = mono(sample());
    let dir = tempfile::tempdir().unwrap();

    let png = dir.path().join("regions.png");
    save_region_map(&frame, &standard_thresholds(), &png).unwrap();
    let loaded = image::open(&png).unwrap().to_rgb8();
    assert_eq!(*loaded.get_pixel(1, 0), Rgb(FLARE_COLOR));

    let pgm = dir.path().join("mask.pgm");
    save_region_map(&frame, &standard_thresholds(), &pgm).unwrap();
    let mask = image::open(&pgm).unwrap().to_luma8();
    assert_eq!(mask.get_pixel(1, 0).0, [255]);

    let heat = dir.path().join("heat.png");
    save_heatmap(&frame, &heat).unwrap();
    assert!(heat.exists());
}
