//! Motion-compensated temporal averaging.

use ndarray::Array3;
use tracing::debug;

use crate::align::{warp_color, MotionEstimator};
use crate::error::{DenoiseError, Result};
use crate::frame::Frame;
use crate::window::Window;

use super::cache::FrameCache;
use super::config::{AlignmentConfig, FlowParams};
use super::observer::PipelineObserver;

/// Average frame `center` with up to `radius` neighbors on each side.
///
/// The cache is moved to the window first. With alignment enabled, each
/// neighbor is warped onto the center frame through the estimator's field;
/// a neighbor whose estimation or warp fails is reported to `observer` and
/// averaged as is. All contributions carry equal weight. A window holding
/// only the center frame returns its color unchanged.
pub fn aggregate(
    cache: &mut FrameCache<'_>,
    center: usize,
    radius: usize,
    alignment: &AlignmentConfig,
    estimator: &dyn MotionEstimator,
    observer: &dyn PipelineObserver,
) -> Result<Array3<f32>> {
    let total = cache.sequence().len();
    if total == 0 {
        return Err(DenoiseError::EmptySequence);
    }
    if center >= total {
        return Err(DenoiseError::FrameIndexOutOfRange {
            index: center,
            total,
        });
    }

    let window = Window::around(center, radius, total);
    cache.ensure_window(window)?;
    let cache = &*cache;

    let reference = resident(cache, center)?;
    let mut sum = reference.color.clone();
    let mut count = 1usize;
    let mut fallbacks = 0usize;

    for index in window.neighbors(center) {
        let neighbor = resident(cache, index)?;
        if alignment.enabled {
            match compensate(reference, neighbor, &alignment.flow, estimator) {
                Ok(warped) => sum += &warped,
                Err(e) => {
                    observer.alignment_fallback(center, index, &e);
                    fallbacks += 1;
                    sum += &neighbor.color;
                }
            }
        } else {
            sum += &neighbor.color;
        }
        count += 1;
    }

    debug!(center, %window, frames = count, fallbacks, "aggregated");

    if count > 1 {
        let scale = count as f32;
        sum.mapv_inplace(|v| v / scale);
    }
    Ok(sum)
}

/// Warp `neighbor` onto `reference`. The estimator always sees normalized
/// flow parameters.
fn compensate(
    reference: &Frame,
    neighbor: &Frame,
    flow: &FlowParams,
    estimator: &dyn MotionEstimator,
) -> Result<Array3<f32>> {
    let flow = flow.normalized();
    let field = estimator.estimate(&reference.luminance, &neighbor.luminance, &flow)?;
    warp_color(&neighbor.color, &field)
}

fn resident<'c>(cache: &'c FrameCache<'_>, index: usize) -> Result<&'c Frame> {
    cache
        .frame(index)
        .ok_or(DenoiseError::FrameIndexOutOfRange {
            index,
            total: cache.sequence().len(),
        })
}
