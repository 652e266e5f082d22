pub mod aggregate;
pub mod cache;
pub mod config;
mod denoiser;
mod export;
pub mod observer;
mod preview;

pub use aggregate::aggregate;
pub use cache::FrameCache;
pub use config::{AlignmentConfig, DenoiseConfig, DenoiseParams, FlowParams};
pub use denoiser::{CancelToken, Denoiser};
pub use export::ExportSummary;
pub use observer::{NoOpObserver, PipelineObserver, TracingObserver};
pub use preview::PreviewOutput;
