//! FFT phase correlation for the global translation between two planes.

use std::f64::consts::TAU;

use ndarray::Array2;
use num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

use crate::error::{DenoiseError, Result};

/// Global shift such that `reference(y, x) ≈ source(y + dy, x + dx)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl std::ops::Add for Translation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

/// Estimate the translation of `source` relative to `reference`.
///
/// Both planes are mean-centred and Hann-windowed, correlated through the normalized
/// cross-power spectrum, and the integer peak is refined to sub-pixel
/// precision with a parabola fit along each axis.
pub fn estimate_translation(reference: &Array2<f32>, source: &Array2<f32>) -> Result<Translation> {
    let (h, w) = reference.dim();
    if source.dim() != (h, w) {
        return Err(DenoiseError::DimensionMismatch {
            expected: (h, w),
            found: source.dim(),
        });
    }
    if h < 2 || w < 2 {
        return Err(DenoiseError::Estimation(format!(
            "plane too small for phase correlation: {w}x{h}"
        )));
    }
    if reference.iter().chain(source.iter()).any(|v| !v.is_finite()) {
        return Err(DenoiseError::Estimation("non-finite luminance".into()));
    }

    let mut planner = FftPlanner::<f64>::new();
    let ref_spec = spectrum(&hann(reference), &mut planner);
    let src_spec = spectrum(&hann(source), &mut planner);

    let mut cross = ref_spec;
    cross.zip_mut_with(&src_spec, |r, s| {
        let c = *r * s.conj();
        let mag = c.norm();
        *r = if mag > 1e-12 { c / mag } else { Complex::default() };
    });
    transform(&mut cross, &mut planner, FftDirection::Inverse);
    let surface = cross.mapv(|c| c.re);

    let (peak_row, peak_col) = argmax(&surface);
    let (sub_row, sub_col) = refine_peak(&surface, peak_row, peak_col);

    // The correlation peaks at minus the content shift; unwrap the
    // circular index to a signed one first.
    let signed = |peak: usize, n: usize| {
        if peak > n / 2 {
            peak as f64 - n as f64
        } else {
            peak as f64
        }
    };
    Ok(Translation::new(
        -(signed(peak_col, w) + sub_col),
        -(signed(peak_row, h) + sub_row),
    ))
}

/// Remove the mean, then taper to zero at the borders with a Hann window.
fn hann(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mean = data.mean().unwrap_or(0.0);
    Array2::from_shape_fn((h, w), |(row, col)| {
        let wy = 0.5 * (1.0 - (TAU * row as f64 / h as f64).cos());
        let wx = 0.5 * (1.0 - (TAU * col as f64 / w as f64).cos());
        (data[[row, col]] - mean) * (wy * wx) as f32
    })
}

fn spectrum(data: &Array2<f32>, planner: &mut FftPlanner<f64>) -> Array2<Complex<f64>> {
    let mut out = data.mapv(|v| Complex::new(v as f64, 0.0));
    transform(&mut out, planner, FftDirection::Forward);
    out
}

/// Separable 2-D FFT in place: rows, then columns. The inverse is scaled
/// by `1 / (h * w)`.
fn transform(
    data: &mut Array2<Complex<f64>>,
    planner: &mut FftPlanner<f64>,
    direction: FftDirection,
) {
    let (h, w) = data.dim();
    let row_fft = planner.plan_fft(w, direction);
    let col_fft = planner.plan_fft(h, direction);
    let mut buf = vec![Complex::default(); h.max(w)];

    for mut row in data.rows_mut() {
        buf[..w].iter_mut().zip(row.iter()).for_each(|(b, v)| *b = *v);
        row_fft.process(&mut buf[..w]);
        row.iter_mut().zip(buf.iter()).for_each(|(v, b)| *v = *b);
    }
    for mut col in data.columns_mut() {
        buf[..h].iter_mut().zip(col.iter()).for_each(|(b, v)| *b = *v);
        col_fft.process(&mut buf[..h]);
        col.iter_mut().zip(buf.iter()).for_each(|(v, b)| *v = *b);
    }

    if direction == FftDirection::Inverse {
        let scale = 1.0 / (h * w) as f64;
        data.mapv_inplace(|c| c * scale);
    }
}

fn argmax(data: &Array2<f64>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((row, col), &v) in data.indexed_iter() {
        if v > best_val {
            best_val = v;
            best = (row, col);
        }
    }
    best
}

/// Sub-pixel peak offset `(d_row, d_col)` in `[-0.5, 0.5]` from a parabola
/// through the peak and its two circular neighbours on each axis.
fn refine_peak(surface: &Array2<f64>, row: usize, col: usize) -> (f64, f64) {
    let (h, w) = surface.dim();
    let vertex = |prev: f64, curr: f64, next: f64| {
        let denom = prev - 2.0 * curr + next;
        if denom.abs() > 1e-12 {
            ((prev - next) / (2.0 * denom)).clamp(-0.5, 0.5)
        } else {
            0.0
        }
    };

    let c = surface[[row, col]];
    (
        vertex(surface[[(row + h - 1) % h, col]], c, surface[[(row + 1) % h, col]]),
        vertex(surface[[row, (col + w - 1) % w]], c, surface[[row, (col + 1) % w]]),
    )
}
