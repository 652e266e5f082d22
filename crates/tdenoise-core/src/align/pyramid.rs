//! Coarse-to-fine translation estimator.
//!
//! Each luminance plane is smoothed by a blur whose scale follows the flow
//! window, then reduced into a Gaussian pyramid. Phase correlation runs
//! from the coarsest level down; every level refines the doubled estimate
//! of the level above with a few residual passes.

use ndarray::Array2;
use tracing::trace;

use crate::consts::{MIN_PYRAMID_SIDE, PYRAMID_BLUR_SIGMA};
use crate::error::{DenoiseError, Result};
use crate::filters::gaussian_blur::gaussian_blur_array;
use crate::frame::DisplacementField;
use crate::pipeline::config::FlowParams;

use super::phase_correlation::{estimate_translation, Translation};
use super::warp::translate_plane;
use super::MotionEstimator;

/// Residual passes stop early once the correction falls below this, in pixels.
const RESIDUAL_EPSILON: f64 = 0.01;

/// Global-translation estimator built on pyramidal phase correlation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseCorrelationEstimator;

impl MotionEstimator for PhaseCorrelationEstimator {
    fn name(&self) -> &str {
        "phase-correlation"
    }

    fn estimate(
        &self,
        reference: &Array2<f32>,
        source: &Array2<f32>,
        params: &FlowParams,
    ) -> Result<DisplacementField> {
        let (h, w) = reference.dim();
        if source.dim() != (h, w) {
            return Err(DenoiseError::DimensionMismatch {
                expected: (h, w),
                found: source.dim(),
            });
        }

        let params = params.normalized();
        let sigma = params.window_size as f32 / 6.0;
        let ref_pyramid = build_pyramid(&gaussian_blur_array(reference, sigma), params.levels);
        let src_pyramid = build_pyramid(&gaussian_blur_array(source, sigma), params.levels);

        let mut total = Translation::default();
        for (level, (ref_level, src_level)) in
            ref_pyramid.iter().zip(&src_pyramid).enumerate().rev()
        {
            if level + 1 < ref_pyramid.len() {
                total.dx *= 2.0;
                total.dy *= 2.0;
            }
            for _ in 0..params.iterations {
                let shifted = translate_plane(src_level, total.dx as f32, total.dy as f32);
                let residual = estimate_translation(ref_level, &shifted)?;
                total = total + residual;
                if residual.dx.abs().max(residual.dy.abs()) < RESIDUAL_EPSILON {
                    break;
                }
            }
            trace!(level, dx = total.dx, dy = total.dy, "pyramid level refined");
        }

        Ok(DisplacementField::uniform(
            h,
            w,
            total.dx as f32,
            total.dy as f32,
        ))
    }
}

/// Gaussian pyramid with at most `levels` entries, finest first. Reduction
/// stops early once a side would fall below `MIN_PYRAMID_SIDE`.
fn build_pyramid(data: &Array2<f32>, levels: usize) -> Vec<Array2<f32>> {
    let mut pyramid = vec![data.clone()];
    while pyramid.len() < levels {
        let Some(current) = pyramid.last() else { break };
        let (h, w) = current.dim();
        if h / 2 < MIN_PYRAMID_SIDE || w / 2 < MIN_PYRAMID_SIDE {
            break;
        }
        let reduced = downsample_2x(&gaussian_blur_array(current, PYRAMID_BLUR_SIGMA));
        pyramid.push(reduced);
    }
    pyramid
}

/// 2×2 box reduction; an odd trailing row or column is dropped.
fn downsample_2x(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h / 2, w / 2), |(row, col)| {
        let (r, c) = (row * 2, col * 2);
        (data[[r, c]] + data[[r, c + 1]] + data[[r + 1, c]] + data[[r + 1, c + 1]]) * 0.25
    })
}
