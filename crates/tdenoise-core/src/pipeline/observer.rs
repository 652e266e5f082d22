use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::error::DenoiseError;
use crate::frame::FrameId;

/// Lifecycle hooks fired by the cache, the aggregator and the exporter.
///
/// Every method has a no-op default; implementors override only the
/// events they care about.
pub trait PipelineObserver: Send + Sync {
    fn decode_started(&self, _index: usize, _id: &FrameId) {}

    fn decode_finished(&self, _index: usize, _elapsed: Duration) {}

    fn frame_evicted(&self, _index: usize) {}

    /// Motion compensation of `neighbor` against `center` failed; the
    /// neighbor is averaged unwarped.
    fn alignment_fallback(&self, _center: usize, _neighbor: usize, _error: &DenoiseError) {}

    fn frame_exported(&self, _index: usize, _path: &Path) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpObserver;

impl PipelineObserver for NoOpObserver {}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn decode_started(&self, index: usize, id: &FrameId) {
        trace!(index, %id, "decoding frame");
    }

    fn decode_finished(&self, index: usize, elapsed: Duration) {
        debug!(index, elapsed_ms = elapsed.as_millis() as u64, "frame decoded");
    }

    fn frame_evicted(&self, index: usize) {
        trace!(index, "frame evicted");
    }

    fn alignment_fallback(&self, center: usize, neighbor: usize, error: &DenoiseError) {
        warn!(center, neighbor, %error, "alignment failed, using unwarped neighbor");
    }

    fn frame_exported(&self, index: usize, path: &Path) {
        info!(index, path = %path.display(), "frame exported");
    }
}
