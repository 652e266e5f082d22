pub mod phase_correlation;
pub mod pyramid;
pub mod warp;

use ndarray::Array2;

use crate::error::Result;
use crate::frame::DisplacementField;
use crate::pipeline::config::FlowParams;

pub use phase_correlation::{estimate_translation, Translation};
pub use pyramid::PhaseCorrelationEstimator;
pub use warp::{translate_plane, warp_color};

/// Dense motion estimation between two luminance planes.
///
/// The returned field maps every reference pixel to where its content sits
/// in `source`, so `warp_color(source_color, &field)` lines the source up
/// with the reference.
pub trait MotionEstimator: Send + Sync {
    fn name(&self) -> &str;

    fn estimate(
        &self,
        reference: &Array2<f32>,
        source: &Array2<f32>,
        params: &FlowParams,
    ) -> Result<DisplacementField>;
}
