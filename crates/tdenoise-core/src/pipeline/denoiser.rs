use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::align::{MotionEstimator, PhaseCorrelationEstimator};
use crate::io::{FileFrameSource, FrameSource};

use super::observer::{PipelineObserver, TracingObserver};

/// Entry point for preview and export.
///
/// Holds the injected collaborators behind `Arc`s so a configured
/// denoiser can be cloned onto a worker thread.
#[derive(Clone)]
pub struct Denoiser {
    pub(super) source: Arc<dyn FrameSource>,
    pub(super) estimator: Arc<dyn MotionEstimator>,
    pub(super) observer: Arc<dyn PipelineObserver>,
}

impl Denoiser {
    pub fn new(source: Arc<dyn FrameSource>, estimator: Arc<dyn MotionEstimator>) -> Self {
        Self {
            source,
            estimator,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn source(&self) -> &dyn FrameSource {
        self.source.as_ref()
    }

    pub fn estimator(&self) -> &dyn MotionEstimator {
        self.estimator.as_ref()
    }
}

impl Default for Denoiser {
    /// Files on disk, phase-correlation alignment, tracing observer.
    fn default() -> Self {
        Self::new(
            Arc::new(FileFrameSource),
            Arc::new(PhaseCorrelationEstimator),
        )
    }
}

/// Shared flag that stops an export before its next frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
