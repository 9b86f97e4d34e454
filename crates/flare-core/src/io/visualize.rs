use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, GrayImage, ImageEncoder, ImageFormat, Luma, Rgb, RgbImage};

use crate::classify::{label_map, Region};
use crate::error::Result;
use crate::frame::{Frame, SensorFrame};
use crate::thresholds::ThresholdSet;

pub const FLARE_COLOR: [u8; 3] = [255, 255, 0];
pub const DIRECT_LIGHT_COLOR: [u8; 3] = [255, 165, 0];
pub const LIGHT_SOURCE_COLOR: [u8; 3] = [255, 0, 0];
/// Background keeps its scene structure at reduced brightness.
pub const BACKGROUND_DIM: f64 = 0.3;

/// Display color of one classified sample.
pub fn region_color(region: Region, value: u16, max_value: u32) -> Rgb<u8> {
    match region {
        Region::Background => {
            let level = value as f64 / max_value.max(1) as f64 * 255.0 * BACKGROUND_DIM;
            let level = level.round().clamp(0.0, 255.0) as u8;
            Rgb([level, level, level])
        }
        Region::Flare => Rgb(FLARE_COLOR),
        Region::DirectLight => Rgb(DIRECT_LIGHT_COLOR),
        Region::LightSource => Rgb(LIGHT_SOURCE_COLOR),
    }
}

/// Color every pixel by its region.
pub fn colorize_regions(frame: &Frame, thresholds: &ThresholdSet) -> RgbImage {
    let labels = label_map(frame, thresholds);
    let max_value = thresholds.max_value();
    let (h, w) = frame.data.dim();

    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let color = region_color(labels[[row, col]], frame.data[[row, col]], max_value);
            img.put_pixel(col as u32, row as u32, color);
        }
    }
    img
}

/// Binary mask: 255 where the sample is flare, 0 elsewhere.
pub fn flare_mask(frame: &Frame, thresholds: &ThresholdSet) -> GrayImage {
    let labels = label_map(frame, thresholds);
    let (h, w) = frame.data.dim();

    let mut img = GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let v = if labels[[row, col]] == Region::Flare { 255 } else { 0 };
            img.put_pixel(col as u32, row as u32, Luma([v]));
        }
    }
    img
}

/// Save the region map, choosing the format from the extension: `.pgm`
/// writes the flare mask, anything else a colorized PNG. Color frames are
/// shown through their luminance.
pub fn save_region_map(frame: &SensorFrame, thresholds: &ThresholdSet, path: &Path) -> Result<()> {
    let mono = frame.to_mono();
    match path.extension().and_then(|e| e.to_str()) {
        Some("pgm") => save_pgm(&flare_mask(&mono, thresholds), path)?,
        _ => colorize_regions(&mono, thresholds).save_with_format(path, ImageFormat::Png)?,
    }
    Ok(())
}

/// Binary (P5) graymap.
fn save_pgm(mask: &GrayImage, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    PnmEncoder::new(writer)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
        .write_image(mask.as_raw(), mask.width(), mask.height(), ExtendedColorType::L8)?;
    Ok(())
}

/// Intensity heatmap normalized to the frame's own range.
pub fn heatmap(frame: &Frame) -> RgbImage {
    let (h, w) = frame.data.dim();
    let min = frame.data.iter().copied().min().unwrap_or(0) as f64;
    let max = frame.data.iter().copied().max().unwrap_or(0) as f64;
    let range = max - min;

    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let t = if range > 0.0 {
                (frame.data[[row, col]] as f64 - min) / range
            } else {
                0.5
            };
            let color = colorous::INFERNO.eval_continuous(t);
            img.put_pixel(col as u32, row as u32, Rgb([color.r, color.g, color.b]));
        }
    }
    img
}

pub fn save_heatmap(frame: &SensorFrame, path: &Path) -> Result<()> {
    heatmap(&frame.to_mono()).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
