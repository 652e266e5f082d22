use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Separable Gaussian blur with clamped borders. `sigma <= 0` returns a copy.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma <= 0.0 || data.is_empty() {
        return data.clone();
    }
    let kernel = make_gaussian_kernel(sigma);
    let horizontal = convolve(data.view(), &kernel);
    // Columns of the input are rows of its transpose.
    let vertical = convolve(horizontal.t(), &kernel);
    vertical.reversed_axes()
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as isize;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-(x * x) as f32 / s2).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Convolve every row of `data` with `kernel`, clamping at the row ends.
fn convolve(data: ArrayView2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut out = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, line)| convolve_row(&data, row, line, kernel));
    } else {
        for (row, line) in out.axis_iter_mut(Axis(0)).enumerate() {
            convolve_row(&data, row, line, kernel);
        }
    }
    out
}

#[inline]
fn convolve_row(data: &ArrayView2<f32>, row: usize, mut line: ArrayViewMut1<f32>, kernel: &[f32]) {
    let w = data.ncols() as isize;
    let radius = (kernel.len() / 2) as isize;
    let src = data.row(row);
    for (col, out) in line.iter_mut().enumerate() {
        let col = col as isize;
        *out = kernel
            .iter()
            .enumerate()
            .map(|(k, &weight)| {
                let c = (col + k as isize - radius).clamp(0, w - 1) as usize;
                src[c] * weight
            })
            .sum();
    }
}
