#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use tdenoise_core::align::{estimate_translation, MotionEstimator, PhaseCorrelationEstimator};
use tdenoise_core::error::DenoiseError;
use tdenoise_core::pipeline::FlowParams;

use common::blob_plane;

#[test]
fn test_phase_correlation_integer_shift() {
    let reference = blob_plane(64, 64, 0.0, 0.0);
    let source = blob_plane(64, 64, 3.0, -2.0);

    let t = estimate_translation(&reference, &source).unwrap();

    assert_abs_diff_eq!(t.dx, 3.0, epsilon = 0.3);
    assert_abs_diff_eq!(t.dy, -2.0, epsilon = 0.3);
}

#[test]
fn test_phase_correlation_identical_is_zero() {
    let plane = blob_plane(48, 40, 0.0, 0.0);
    let t = estimate_translation(&plane, &plane).unwrap();
    assert_abs_diff_eq!(t.dx, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(t.dy, 0.0, epsilon = 1e-3);
}

#[test]
fn test_phase_correlation_rejects_tiny_planes() {
    let plane = Array2::from_elem((1, 8), 0.5f32);
    assert!(matches!(
        estimate_translation(&plane, &plane),
        Err(DenoiseError::Estimation(_))
    ));
}

#[test]
fn test_estimator_recovers_translation() {
    let reference = blob_plane(64, 64, 0.0, 0.0);
    let source = blob_plane(64, 64, 3.0, -2.0);

    let field = PhaseCorrelationEstimator
        .estimate(&reference, &source, &FlowParams::default())
        .unwrap();

    assert_eq!(field.dim(), (64, 64));
    let (dx, dy) = field.mean_motion();
    assert_abs_diff_eq!(dx, 3.0, epsilon = 0.5);
    assert_abs_diff_eq!(dy, -2.0, epsilon = 0.5);
    // Global translation: every pixel carries the same vector.
    assert_eq!(field.dx(0, 0), field.dx(63, 63));
}

#[test]
fn test_estimator_single_level() {
    let reference = blob_plane(64, 64, 0.0, 0.0);
    let source = blob_plane(64, 64, -4.0, 1.0);
    let params = FlowParams {
        window_size: 5,
        levels: 1,
        iterations: 1,
    };

    let (dx, dy) = PhaseCorrelationEstimator
        .estimate(&reference, &source, &params)
        .unwrap()
        .mean_motion();

    assert_abs_diff_eq!(dx, -4.0, epsilon = 0.5);
    assert_abs_diff_eq!(dy, 1.0, epsilon = 0.5);
}

#[test]
fn test_estimator_identical_frames_zero_motion() {
    let plane = blob_plane(32, 32, 0.0, 0.0);
    let (dx, dy) = PhaseCorrelationEstimator
        .estimate(&plane, &plane, &FlowParams::default())
        .unwrap()
        .mean_motion();
    assert_abs_diff_eq!(dx, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(dy, 0.0, epsilon = 1e-3);
}

#[test]
fn test_estimator_dimension_mismatch() {
    let a = blob_plane(32, 32, 0.0, 0.0);
    let b = blob_plane(32, 30, 0.0, 0.0);
    assert!(matches!(
        PhaseCorrelationEstimator.estimate(&a, &b, &FlowParams::default()),
        Err(DenoiseError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_flow_params_normalized() {
    let raw = FlowParams {
        window_size: 4,
        levels: 0,
        iterations: 0,
    };
    assert_eq!(
        raw.normalized(),
        FlowParams {
            window_size: 5,
            levels: 1,
            iterations: 1,
        }
    );

    let even = FlowParams {
        window_size: 16,
        ..Default::default()
    };
    assert_eq!(even.normalized().window_size, 17);
    assert_eq!(FlowParams::default().normalized(), FlowParams::default());
}
