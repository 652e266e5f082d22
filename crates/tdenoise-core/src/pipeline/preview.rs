use ndarray::Array3;
use tracing::info;

use crate::error::{DenoiseError, Result};
use crate::filters::apply_spatial_median;
use crate::frame::Sequence;

use super::aggregate::aggregate;
use super::cache::FrameCache;
use super::config::DenoiseParams;
use super::denoiser::Denoiser;

/// Before/after pair for one frame.
#[derive(Clone, Debug)]
pub struct PreviewOutput {
    /// Index actually previewed, after clamping.
    pub index: usize,
    pub original: Array3<f32>,
    pub denoised: Array3<f32>,
}

impl Denoiser {
    /// Denoise a single frame without touching disk.
    ///
    /// `index` is clamped into the sequence. Each call uses its own cache.
    pub fn preview(
        &self,
        sequence: &Sequence,
        index: usize,
        params: &DenoiseParams,
    ) -> Result<PreviewOutput> {
        if sequence.is_empty() {
            return Err(DenoiseError::EmptySequence);
        }
        let index = sequence.clamp_index(index);

        let mut cache = FrameCache::new(sequence, self.source(), self.observer.as_ref());
        let aggregated = aggregate(
            &mut cache,
            index,
            params.radius,
            &params.alignment,
            self.estimator(),
            self.observer.as_ref(),
        )?;
        let original = cache.get(index)?.color.clone();
        let denoised = apply_spatial_median(aggregated, params.spatial_kernel);

        info!(index, radius = params.radius, decodes = cache.decode_count(), "preview ready");
        Ok(PreviewOutput {
            index,
            original,
            denoised,
        })
    }
}
