//! Square median filter applied independently to each color channel.

use ndarray::{Array2, Array3, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Kernel size actually used for a requested size: `0` and `1` disable the
/// filter, even sizes are rounded up to the next odd value.
pub fn effective_kernel_size(requested: usize) -> Option<usize> {
    match requested {
        0 | 1 => None,
        k if k % 2 == 0 => Some(k + 1),
        k => Some(k),
    }
}

/// Median-filter each channel of `image` with a `kernel_size`×`kernel_size`
/// window. Borders replicate the edge samples. Returns the input untouched
/// when the filter is disabled. The kernel radius is capped at the longer
/// image side.
pub fn apply_spatial_median(image: Array3<f32>, kernel_size: usize) -> Array3<f32> {
    let Some(k) = effective_kernel_size(kernel_size) else {
        return image;
    };

    let (h, w, channels) = image.dim();
    if h == 0 || w == 0 {
        return image;
    }
    let radius = (k / 2).min(h.max(w));
    let mut out = Array3::<f32>::zeros((h, w, channels));
    for ch in 0..channels {
        let plane = median_plane(image.index_axis(Axis(2), ch), radius);
        out.index_axis_mut(Axis(2), ch).assign(&plane);
    }
    out
}

fn median_plane(src: ArrayView2<f32>, radius: usize) -> Array2<f32> {
    let (h, w) = src.dim();
    let mut out = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, line)| median_row(&src, row, line, radius));
    } else {
        for (row, line) in out.axis_iter_mut(Axis(0)).enumerate() {
            median_row(&src, row, line, radius);
        }
    }
    out
}

fn median_row(src: &ArrayView2<f32>, row: usize, mut line: ArrayViewMut1<f32>, radius: usize) {
    let (h, w) = src.dim();
    let side = 2 * radius + 1;
    let mut window = Vec::with_capacity(side * side);

    for (col, out) in line.iter_mut().enumerate() {
        window.clear();
        for dy in 0..side {
            let r = (row + dy).saturating_sub(radius).min(h - 1);
            for dx in 0..side {
                let c = (col + dx).saturating_sub(radius).min(w - 1);
                window.push(src[[r, c]]);
            }
        }
        let mid = window.len() / 2;
        let (_, median, _) = window.select_nth_unstable_by(mid, f32::total_cmp);
        *out = *median;
    }
}
