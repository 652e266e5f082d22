use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{DenoiseError, Result};
use crate::filters::apply_spatial_median;
use crate::frame::{FrameId, Sequence};
use crate::io::output_path;

use super::aggregate::aggregate;
use super::cache::FrameCache;
use super::config::DenoiseParams;
use super::denoiser::{CancelToken, Denoiser};

/// Result of a completed export.
#[derive(Clone, Debug, Default)]
pub struct ExportSummary {
    /// Written files in frame order.
    pub written: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl Denoiser {
    /// Denoise every frame of `sequence` in order and write the results to
    /// `output_dir`.
    ///
    /// One cache serves the whole run, so each frame is decoded once while
    /// the window slides over it. `on_progress(done, total)` fires after
    /// every written frame. The first decode or encode failure stops the run;
    /// files already written stay on disk. A set `cancel` token stops the run
    /// before the next frame with [`DenoiseError::Cancelled`]. Two frames
    /// mapping to the same output file fail the run before anything is
    /// written.
    pub fn export<F>(
        &self,
        sequence: &Sequence,
        output_dir: &Path,
        params: &DenoiseParams,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<ExportSummary>
    where
        F: FnMut(usize, usize),
    {
        let start = Instant::now();
        let total = sequence.len();
        if total == 0 {
            return Ok(ExportSummary::default());
        }
        let paths = output_paths(sequence, output_dir)?;
        std::fs::create_dir_all(output_dir).map_err(|e| DenoiseError::Encode {
            path: output_dir.to_path_buf(),
            reason: format!("cannot create output directory: {e}"),
        })?;

        info!(
            frames = total,
            radius = params.radius,
            spatial = params.spatial_kernel,
            alignment = %params.alignment,
            output = %output_dir.display(),
            "export started"
        );

        let mut cache = FrameCache::new(sequence, self.source(), self.observer.as_ref());
        let mut written = Vec::with_capacity(total);

        for (index, path) in paths.into_iter().enumerate() {
            if cancel.is_cancelled() {
                cache.clear();
                info!(completed = index, total, "export cancelled");
                return Err(DenoiseError::Cancelled {
                    completed: index,
                    total,
                });
            }

            let aggregated = aggregate(
                &mut cache,
                index,
                params.radius,
                &params.alignment,
                self.estimator(),
                self.observer.as_ref(),
            )?;
            let denoised = apply_spatial_median(aggregated, params.spatial_kernel);

            self.source
                .encode(&path, &denoised)
                .map_err(|e| match e {
                    DenoiseError::Encode { .. } => e,
                    other => DenoiseError::Encode {
                        path: path.clone(),
                        reason: other.to_string(),
                    },
                })?;

            self.observer.frame_exported(index, &path);
            written.push(path);
            on_progress(index + 1, total);
        }

        let elapsed = start.elapsed();
        info!(frames = total, elapsed_ms = elapsed.as_millis() as u64, "export finished");
        Ok(ExportSummary { written, elapsed })
    }
}

/// Output path of every frame, in order. Fails on the first pair of frames
/// that share a path.
fn output_paths(sequence: &Sequence, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut seen: HashMap<PathBuf, &FrameId> = HashMap::with_capacity(sequence.len());
    let mut paths = Vec::with_capacity(sequence.len());
    for id in sequence.iter() {
        let path = output_path(output_dir, id);
        if let Some(first) = seen.insert(path.clone(), id) {
            return Err(DenoiseError::OutputCollision {
                path,
                first: first.to_string(),
                second: id.to_string(),
            });
        }
        paths.push(path);
    }
    Ok(paths)
}
