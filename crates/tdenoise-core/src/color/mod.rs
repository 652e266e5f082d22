pub mod demosaic;

use ndarray::{Array2, Array3, ArrayView1, Axis, Zip};

use crate::consts::{
    COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, PARALLEL_PIXEL_THRESHOLD,
};

/// Compute luminance from an H×W×3 color image using ITU-R BT.601 weights.
pub fn luminance(color: &Array3<f32>) -> Array2<f32> {
    let (h, w, _) = color.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        Zip::from(color.lanes(Axis(2))).par_map_collect(weigh_pixel)
    } else {
        color.map_axis(Axis(2), weigh_pixel)
    }
}

#[inline]
fn weigh_pixel(px: ArrayView1<f32>) -> f32 {
    LUMINANCE_R * px[0] + LUMINANCE_G * px[1] + LUMINANCE_B * px[2]
}

/// Replicate a single plane into the three color channels.
pub fn gray_to_rgb(gray: &Array2<f32>) -> Array3<f32> {
    merge_channels(gray, gray, gray)
}

/// Interleave three equally sized planes into an H×W×3 image.
pub fn merge_channels(red: &Array2<f32>, green: &Array2<f32>, blue: &Array2<f32>) -> Array3<f32> {
    let (h, w) = red.dim();
    let mut out = Array3::<f32>::zeros((h, w, COLOR_CHANNEL_COUNT));
    out.index_axis_mut(Axis(2), 0).assign(red);
    out.index_axis_mut(Axis(2), 1).assign(green);
    out.index_axis_mut(Axis(2), 2).assign(blue);
    out
}
