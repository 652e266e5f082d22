//! Backward warping with bilinear sampling and reflective borders.

use ndarray::{Array2, Array3, ArrayView2, ArrayViewMut1, ArrayViewMut2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{DenoiseError, Result};
use crate::frame::DisplacementField;

/// Map an out-of-range coordinate back inside `[0, size)` by mirroring with
/// the edge sample repeated (`cba|abc...xyz|zyx`).
#[inline]
pub fn reflect_index(idx: i64, size: usize) -> usize {
    let n = size as i64;
    if n <= 1 {
        return 0;
    }
    let period = 2 * n;
    let m = idx.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Bilinear sample of `data` at fractional `(y, x)` with reflective borders.
#[inline]
pub fn sample_reflect(data: &ArrayView2<f32>, y: f32, x: f32) -> f32 {
    let (h, w) = data.dim();
    let y0f = y.floor();
    let x0f = x.floor();
    let fy = y - y0f;
    let fx = x - x0f;
    let y0 = y0f as i64;
    let x0 = x0f as i64;

    let r0 = reflect_index(y0, h);
    let r1 = reflect_index(y0.saturating_add(1), h);
    let c0 = reflect_index(x0, w);
    let c1 = reflect_index(x0.saturating_add(1), w);

    let top = data[[r0, c0]] * (1.0 - fx) + data[[r0, c1]] * fx;
    let bottom = data[[r1, c0]] * (1.0 - fx) + data[[r1, c1]] * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Warp every channel of `color` through `field`:
/// `out(y, x, c) = color(y + dy, x + dx, c)`.
///
/// Fields with non-finite offsets, or offsets larger than twice the longer
/// image side, are rejected before any sampling.
pub fn warp_color(color: &Array3<f32>, field: &DisplacementField) -> Result<Array3<f32>> {
    let (h, w, channels) = color.dim();
    if field.dim() != (h, w) {
        return Err(DenoiseError::DimensionMismatch {
            expected: (h, w),
            found: field.dim(),
        });
    }
    check_field(field, h, w)?;

    let mut out = Array3::<f32>::zeros((h, w, channels));
    for ch in 0..channels {
        let src = color.index_axis(Axis(2), ch);
        let dst = out.index_axis_mut(Axis(2), ch);
        remap_plane(&src, dst, |row, col| {
            (row as f32 + field.dy(row, col), col as f32 + field.dx(row, col))
        });
    }

    if out.iter().any(|v| !v.is_finite()) {
        return Err(DenoiseError::Estimation(
            "warp produced non-finite samples".into(),
        ));
    }
    Ok(out)
}

fn check_field(field: &DisplacementField, h: usize, w: usize) -> Result<()> {
    let limit = 2.0 * h.max(w) as f32;
    match field.as_array().iter().find(|d| !d.is_finite() || d.abs() > limit) {
        Some(d) => Err(DenoiseError::Estimation(format!(
            "displacement {d} outside the {w}x{h} frame"
        ))),
        None => Ok(()),
    }
}

/// Translate a single plane: `out(y, x) = data(y + dy, x + dx)`.
pub fn translate_plane(data: &Array2<f32>, dx: f32, dy: f32) -> Array2<f32> {
    let mut out = Array2::<f32>::zeros(data.dim());
    remap_plane(&data.view(), out.view_mut(), |row, col| {
        (row as f32 + dy, col as f32 + dx)
    });
    out
}

/// Fill `dst` by sampling `src` at the coordinates returned by `coord`.
fn remap_plane<F>(src: &ArrayView2<f32>, mut dst: ArrayViewMut2<f32>, coord: F)
where
    F: Fn(usize, usize) -> (f32, f32) + Sync,
{
    let (h, w) = dst.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        dst.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, line)| remap_row(src, row, line, &coord));
    } else {
        for (row, line) in dst.axis_iter_mut(Axis(0)).enumerate() {
            remap_row(src, row, line, &coord);
        }
    }
}

#[inline]
fn remap_row<F>(src: &ArrayView2<f32>, row: usize, mut line: ArrayViewMut1<f32>, coord: &F)
where
    F: Fn(usize, usize) -> (f32, f32),
{
    for (col, out) in line.iter_mut().enumerate() {
        let (y, x) = coord(row, col);
        *out = sample_reflect(src, y, x);
    }
}
