#[allow(dead_code)]
mod common;

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::Array3;

use tdenoise_core::error::DenoiseError;
use tdenoise_core::frame::Sequence;
use tdenoise_core::pipeline::{DenoiseParams, Denoiser, NoOpObserver};

use common::{indexed_frames, value_for_index, MemorySource, ZeroMotion};

fn denoiser(source: Arc<MemorySource>) -> Denoiser {
    Denoiser::new(source, Arc::new(ZeroMotion)).with_observer(Arc::new(NoOpObserver))
}

fn params(radius: usize, spatial_kernel: usize) -> DenoiseParams {
    DenoiseParams {
        radius,
        spatial_kernel,
        ..Default::default()
    }
}

#[test]
fn test_preview_empty_sequence() {
    let source = Arc::new(MemorySource::new(Vec::new()));
    let result = denoiser(source).preview(&Sequence::default(), 0, &DenoiseParams::default());
    assert!(matches!(result, Err(DenoiseError::EmptySequence)));
}

#[test]
fn test_preview_clamps_index() {
    let source = Arc::new(MemorySource::new(indexed_frames(5, 4, 4)));
    let sequence = source.sequence();

    let preview = denoiser(source).preview(&sequence, 99, &params(2, 0)).unwrap();

    assert_eq!(preview.index, 4);
    assert!(preview.original.iter().all(|&v| v == value_for_index(4)));
    let expected = (value_for_index(2) + value_for_index(3) + value_for_index(4)) / 3.0;
    assert_abs_diff_eq!(preview.denoised[[2, 2, 0]], expected, epsilon = 1e-6);
}

#[test]
fn test_preview_radius_zero_matches_original() {
    let source = Arc::new(MemorySource::new(indexed_frames(3, 4, 4)));
    let sequence = source.sequence();

    let preview = denoiser(source).preview(&sequence, 1, &params(0, 0)).unwrap();

    assert_eq!(preview.denoised, preview.original);
}

#[test]
fn test_preview_applies_spatial_filter() {
    let mut frame = Array3::from_elem((9, 9, 3), 0.5f32);
    frame[[4, 4, 1]] = 1.0;
    let source = Arc::new(MemorySource::new(vec![frame; 3]));
    let sequence = source.sequence();
    let denoiser = denoiser(source);

    let unfiltered = denoiser.preview(&sequence, 1, &params(1, 0)).unwrap();
    let filtered = denoiser.preview(&sequence, 1, &params(1, 3)).unwrap();

    assert_eq!(filtered.original[[4, 4, 1]], 1.0);
    assert_abs_diff_eq!(unfiltered.denoised[[4, 4, 1]], 1.0, epsilon = 1e-6);
    assert_eq!(filtered.denoised[[4, 4, 1]], 0.5);
}

#[test]
fn test_preview_uses_fresh_cache_per_call() {
    let source = Arc::new(MemorySource::new(indexed_frames(5, 4, 4)));
    let sequence = source.sequence();
    let denoiser = denoiser(Arc::clone(&source));

    denoiser.preview(&sequence, 2, &params(1, 0)).unwrap();
    denoiser.preview(&sequence, 2, &params(1, 0)).unwrap();

    assert_eq!(source.total_decodes(), 6);
    assert_eq!(source.decodes_of(2), 2);
    assert_eq!(source.decodes_of(0), 0);
}

#[test]
fn test_preview_decode_failure_propagates() {
    let source = Arc::new(MemorySource::new(indexed_frames(5, 4, 4)).fail_decode(3));
    let sequence = source.sequence();

    let result = denoiser(source).preview(&sequence, 2, &params(1, 0));

    assert!(matches!(result, Err(DenoiseError::Decode { index: 3, .. })));
}
