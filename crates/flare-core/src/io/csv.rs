//! Plain-text frame exchange format.
//!
//! One line per row, comma-separated cells, no header. Grayscale cells hold a
//! single number; RGB cells hold three whitespace-separated integers
//! (`"r g b"`).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use crate::error::{FlareError, Result};
use crate::frame::{
    max_value_for_bit_depth, validate_bit_depth, ChannelLayout, ColorFrame, Frame, SensorFrame,
};

/// Load a frame from a CSV file.
pub fn load_frame_csv(path: &Path, layout: ChannelLayout, bit_depth: u8) -> Result<SensorFrame> {
    let file = File::open(path)?;
    let frame = read_frame_csv(file, layout, bit_depth)?;
    debug!(
        path = %path.display(),
        rows = frame.rows(),
        cols = frame.cols(),
        channels = %layout,
        "Loaded frame"
    );
    Ok(frame)
}

/// Parse a frame from any reader. Every cell is checked against the sensor
/// range before a frame is built.
pub fn read_frame_csv<R: Read>(
    reader: R,
    layout: ChannelLayout,
    bit_depth: u8,
) -> Result<SensorFrame> {
    validate_bit_depth(bit_depth)?;
    let max_value = max_value_for_bit_depth(bit_depth);
    let channel_count = layout.channel_count();

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let mut planes: Vec<Vec<u16>> = vec![Vec::new(); channel_count];
    let mut rows = 0usize;
    let mut cols = 0usize;

    for record in rdr.records() {
        let record = record.map_err(ragged_row)?;
        let line = record.position().map_or(rows as u64 + 1, |p| p.line());
        cols = record.len();

        for (col, cell) in record.iter().enumerate() {
            let context = |message: String| {
                FlareError::data_format(line, format!("row {}, column {}: {message}", rows + 1, col + 1))
            };
            match layout {
                ChannelLayout::Mono => {
                    planes[0].push(parse_gray(cell, max_value).map_err(context)?);
                }
                ChannelLayout::Rgb => {
                    let rgb = parse_rgb(cell, max_value).map_err(context)?;
                    for (plane, value) in planes.iter_mut().zip(rgb) {
                        plane.push(value);
                    }
                }
            }
        }
        rows += 1;
    }

    if rows == 0 || cols == 0 {
        return Err(FlareError::data_format(0, "input contains no pixel rows"));
    }

    let mut frames = planes
        .into_iter()
        .map(|samples| {
            Array2::from_shape_vec((rows, cols), samples)
                .map(|data| Frame::new(data, bit_depth))
                .map_err(|e| FlareError::data_format(0, format!("frame shape: {e}")))
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    match (layout, frames.next(), frames.next(), frames.next()) {
        (ChannelLayout::Mono, Some(gray), ..) => Ok(SensorFrame::Mono(gray)),
        (ChannelLayout::Rgb, Some(red), Some(green), Some(blue)) => {
            Ok(SensorFrame::Color(ColorFrame::new(red, green, blue)?))
        }
        _ => Err(FlareError::data_format(0, "channel planes missing")),
    }
}

fn ragged_row(err: csv::Error) -> FlareError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => FlareError::data_format(
            pos.as_ref().map_or(0, |p| p.line()),
            format!("row has {len} cells, expected {expected_len}"),
        ),
        _ => err.into(),
    }
}

/// Grayscale cell; decimal values such as `64.00` are rounded.
fn parse_gray(cell: &str, max_value: u32) -> std::result::Result<u16, String> {
    let value: f64 = cell
        .parse()
        .map_err(|_| format!("cannot parse '{cell}' as a number"))?;
    if !value.is_finite() {
        return Err(format!("non-finite value '{cell}'"));
    }
    if value < 0.0 {
        return Err(format!("negative value {value}"));
    }
    let rounded = value.round();
    if rounded > max_value as f64 {
        return Err(format!("value {value} exceeds sensor maximum {max_value}"));
    }
    Ok(rounded as u16)
}

/// RGB cell: exactly three whitespace-separated integers.
fn parse_rgb(cell: &str, max_value: u32) -> std::result::Result<[u16; 3], String> {
    let parts: Vec<&str> = cell.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected 3 whitespace-separated values, found {} in '{cell}'",
            parts.len()
        ));
    }

    let mut rgb = [0u16; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let value: i64 = part
            .parse()
            .map_err(|_| format!("cannot parse '{part}' as an integer"))?;
        if value < 0 {
            return Err(format!("negative value {value}"));
        }
        if value > max_value as i64 {
            return Err(format!("value {value} exceeds sensor maximum {max_value}"));
        }
        *slot = value as u16;
    }
    Ok(rgb)
}

/// Write a frame in the same format, integers only.
pub fn save_frame_csv(frame: &SensorFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_frame_csv(frame, file)?;
    debug!(path = %path.display(), "Saved frame");
    Ok(())
}

pub fn write_frame_csv<W: Write>(frame: &SensorFrame, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    match frame {
        SensorFrame::Mono(f) => {
            for row in f.data.rows() {
                wtr.write_record(row.iter().map(|v| v.to_string()))?;
            }
        }
        SensorFrame::Color(cf) => {
            for ((r, g), b) in cf
                .red
                .data
                .rows()
                .into_iter()
                .zip(cf.green.data.rows())
                .zip(cf.blue.data.rows())
            {
                let cells = r
                    .iter()
                    .zip(g.iter())
                    .zip(b.iter())
                    .map(|((r, g), b)| format!("{r} {g} {b}"));
                wtr.write_record(cells)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gray_rounds_decimals() {
        assert_eq!(parse_gray("64.00", 1023), Ok(64));
        assert_eq!(parse_gray("64.6", 1023), Ok(65));
        assert!(parse_gray("-1", 1023).is_err());
        assert!(parse_gray("1024", 1023).is_err());
        assert!(parse_gray("NaN", 1023).is_err());
        assert!(parse_gray("abc", 1023).is_err());
    }

    #[test]
    fn test_parse_rgb_accepts_mixed_whitespace() {
        assert_eq!(parse_rgb("1 2\t 3", 1023), Ok([1, 2, 3]));
        assert!(parse_rgb("1 2", 1023).is_err());
        assert!(parse_rgb("1 2 3 4", 1023).is_err());
        assert!(parse_rgb("1 -2 3", 1023).is_err());
        assert!(parse_rgb("1 2.5 3", 1023).is_err());
    }
}
