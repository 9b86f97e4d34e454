use std::ops::Range;

use ndarray::Array2;

use crate::consts::MIN_CHROMATIC_SCALE;
use crate::frame::Channel;

use super::config::{FlareShape, LightSourceSpec};

/// Radial scale applied to a source's core radius in one color channel.
///
/// Red grows and blue shrinks with positive bias. Both are floored at
/// `MIN_CHROMATIC_SCALE` so a large bias never collapses a channel.
pub fn chromatic_scale(channel: Channel, bias: f64, step: f64) -> f64 {
    match channel {
        Channel::Red => (1.0 + bias * step).max(MIN_CHROMATIC_SCALE),
        Channel::Blue => (1.0 - bias * step).max(MIN_CHROMATIC_SCALE),
        Channel::Green | Channel::Gray => 1.0,
    }
}

/// Add one light source and its artifacts to a plane.
///
/// `scale` multiplies the core radius (and with it every derived length);
/// `frame_center` anchors the ghost reflections.
pub fn composite_light(
    plane: &mut Array2<f64>,
    light: &LightSourceSpec,
    scale: f64,
    shape: &FlareShape,
    frame_center: (f64, f64),
) {
    let radius = light.core_radius * scale;
    let (row, col) = (light.center_row, light.center_col);

    add_core_and_halo(plane, row, col, radius, light.intensity, shape);

    if light.pattern.diffraction_cross {
        add_cross(plane, row, col, radius, light.intensity, shape);
    }

    if light.pattern.ghosting {
        let (center_row, center_col) = frame_center;
        let count = shape.ghost_count as f64;
        for i in 1..=shape.ghost_count {
            let t = i as f64 / count;
            let ghost_row = center_row + (center_row - row) * t;
            let ghost_col = center_col + (center_col - col) * t;
            let intensity = light.intensity * shape.ghost_attenuation.powi(i as i32);
            add_core_and_halo(plane, ghost_row, ghost_col, radius, intensity, shape);
        }
    }
}

/// Saturated disk plus exponential halo out to `halo_extent_factor x radius`.
fn add_core_and_halo(
    plane: &mut Array2<f64>,
    row: f64,
    col: f64,
    radius: f64,
    intensity: f64,
    shape: &FlareShape,
) {
    let extent = shape.halo_extent_factor * radius;
    let length = shape.halo_length_factor * radius;
    let (h, w) = plane.dim();

    let (Some(rows), Some(cols)) = (span(row, extent, h), span(col, extent, w)) else {
        return;
    };

    for r in rows {
        let dr = r as f64 - row;
        for c in cols.clone() {
            let dc = c as f64 - col;
            let distance = (dr * dr + dc * dc).sqrt();
            if distance <= radius {
                plane[[r, c]] += intensity;
            } else if distance <= extent {
                plane[[r, c]] += intensity * (-distance / length).exp();
            }
        }
    }
}

/// Four spikes along the row and column through the source center.
fn add_cross(
    plane: &mut Array2<f64>,
    row: f64,
    col: f64,
    radius: f64,
    intensity: f64,
    shape: &FlareShape,
) {
    let extent = shape.cross_extent_factor * radius;
    let length = shape.cross_length_factor * radius;
    let amplitude = intensity * shape.cross_gain;
    let (h, w) = plane.dim();

    let spike = |offset: f64| -> Option<f64> {
        let offset = offset.abs();
        (offset > radius).then(|| amplitude * (-offset / length).exp())
    };

    let center_row = row.round();
    if center_row >= 0.0 && (center_row as usize) < h {
        if let Some(cols) = span(col, extent, w) {
            let r = center_row as usize;
            for c in cols {
                if let Some(v) = spike(c as f64 - col) {
                    plane[[r, c]] += v;
                }
            }
        }
    }

    let center_col = col.round();
    if center_col >= 0.0 && (center_col as usize) < w {
        if let Some(rows) = span(row, extent, h) {
            let c = center_col as usize;
            for r in rows {
                if let Some(v) = spike(r as f64 - row) {
                    plane[[r, c]] += v;
                }
            }
        }
    }
}

/// Index range within `[0, len)` covered by `center +/- extent`, if any.
fn span(center: f64, extent: f64, len: usize) -> Option<Range<usize>> {
    if len == 0 {
        return None;
    }
    let lo = (center - extent).ceil().max(0.0);
    let hi = (center + extent).floor().min((len - 1) as f64);
    if hi < lo {
        return None;
    }
    Some(lo as usize..hi as usize + 1)
}
