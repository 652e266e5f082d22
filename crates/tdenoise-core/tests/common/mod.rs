use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ndarray::{Array2, Array3};

use tdenoise_core::align::MotionEstimator;
use tdenoise_core::error::{DenoiseError, Result};
use tdenoise_core::frame::{DisplacementField, FrameId, Sequence};
use tdenoise_core::io::ser::SER_HEADER_SIZE;
use tdenoise_core::io::FrameSource;
use tdenoise_core::pipeline::{FlowParams, PipelineObserver};

/// In-memory frame source keyed by `frame_NNN.<ext>` ids.
///
/// Counts decodes per frame, can be told to fail decoding or encoding of
/// given frames, and records every encoded image instead of touching disk.
pub struct MemorySource {
    ids: Vec<FrameId>,
    frames: Vec<Array3<f32>>,
    decodes: Vec<AtomicUsize>,
    failing_decodes: HashSet<usize>,
    failing_encodes: HashSet<String>,
    encoded: Mutex<Vec<(PathBuf, Array3<f32>)>>,
}

impl MemorySource {
    pub fn new(frames: Vec<Array3<f32>>) -> Self {
        Self::with_extension(frames, "png")
    }

    pub fn with_extension(frames: Vec<Array3<f32>>, ext: &str) -> Self {
        let ids = (0..frames.len())
            .map(|i| FrameId::File(PathBuf::from(format!("frame_{i:03}.{ext}"))))
            .collect();
        let decodes = (0..frames.len()).map(|_| AtomicUsize::new(0)).collect();
        Self {
            ids,
            frames,
            decodes,
            failing_decodes: HashSet::new(),
            failing_encodes: HashSet::new(),
            encoded: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_decode(mut self, index: usize) -> Self {
        self.failing_decodes.insert(index);
        self
    }

    /// Fail writing any output whose file name starts with the stem of `index`.
    pub fn fail_encode(mut self, index: usize) -> Self {
        self.failing_encodes.insert(format!("frame_{index:03}"));
        self
    }

    pub fn sequence(&self) -> Sequence {
        Sequence::new(self.ids.clone())
    }

    pub fn decodes_of(&self, index: usize) -> usize {
        self.decodes[index].load(Ordering::SeqCst)
    }

    pub fn total_decodes(&self) -> usize {
        self.decodes.iter().map(|d| d.load(Ordering::SeqCst)).sum()
    }

    pub fn encoded_paths(&self) -> Vec<PathBuf> {
        self.encoded
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn encoded_images(&self) -> Vec<Array3<f32>> {
        self.encoded
            .lock()
            .unwrap()
            .iter()
            .map(|(_, img)| img.clone())
            .collect()
    }
}

impl FrameSource for MemorySource {
    fn decode(&self, id: &FrameId) -> Result<Array3<f32>> {
        let index = self
            .ids
            .iter()
            .position(|candidate| candidate == id)
            .ok_or_else(|| DenoiseError::Unsupported(format!("unknown frame {id}")))?;
        self.decodes[index].fetch_add(1, Ordering::SeqCst);
        if self.failing_decodes.contains(&index) {
            return Err(DenoiseError::Unsupported("corrupt frame".into()));
        }
        Ok(self.frames[index].clone())
    }

    fn encode(&self, path: &Path, image: &Array3<f32>) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_encodes.iter().any(|stem| name.starts_with(stem)) {
            return Err(DenoiseError::Unsupported("disk full".into()));
        }
        self.encoded
            .lock()
            .unwrap()
            .push((path.to_path_buf(), image.clone()));
        Ok(())
    }
}

/// Estimator that always reports zero motion.
pub struct ZeroMotion;

impl MotionEstimator for ZeroMotion {
    fn name(&self) -> &str {
        "zero"
    }

    fn estimate(
        &self,
        reference: &Array2<f32>,
        _source: &Array2<f32>,
        _params: &FlowParams,
    ) -> Result<DisplacementField> {
        let (h, w) = reference.dim();
        Ok(DisplacementField::zeros(h, w))
    }
}

/// Estimator that reports the same translation for every pair.
pub struct FixedMotion {
    pub dx: f32,
    pub dy: f32,
}

impl MotionEstimator for FixedMotion {
    fn name(&self) -> &str {
        "fixed"
    }

    fn estimate(
        &self,
        reference: &Array2<f32>,
        _source: &Array2<f32>,
        _params: &FlowParams,
    ) -> Result<DisplacementField> {
        let (h, w) = reference.dim();
        Ok(DisplacementField::uniform(h, w, self.dx, self.dy))
    }
}

/// Estimator that always fails.
pub struct FailingMotion;

impl MotionEstimator for FailingMotion {
    fn name(&self) -> &str {
        "failing"
    }

    fn estimate(
        &self,
        _reference: &Array2<f32>,
        _source: &Array2<f32>,
        _params: &FlowParams,
    ) -> Result<DisplacementField> {
        Err(DenoiseError::Estimation("no texture".into()))
    }
}

/// Zero-motion estimator that remembers which frames it was asked about.
///
/// Works with [`indexed_frames`]: every frame is flat with a value that
/// encodes its index, so the top-left luminance identifies the frame.
#[derive(Default)]
pub struct RecordingMotion {
    pairs: Mutex<Vec<(usize, usize)>>,
}

impl RecordingMotion {
    /// `(reference, source)` frame indices, in call order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.pairs.lock().unwrap().clone()
    }

    pub fn sources_for(&self, reference: usize) -> Vec<usize> {
        let mut sources: Vec<usize> = self
            .pairs()
            .into_iter()
            .filter(|&(r, _)| r == reference)
            .map(|(_, s)| s)
            .collect();
        sources.sort_unstable();
        sources
    }
}

impl MotionEstimator for RecordingMotion {
    fn name(&self) -> &str {
        "recording"
    }

    fn estimate(
        &self,
        reference: &Array2<f32>,
        source: &Array2<f32>,
        _params: &FlowParams,
    ) -> Result<DisplacementField> {
        let pair = (
            index_from_value(reference[[0, 0]]),
            index_from_value(source[[0, 0]]),
        );
        self.pairs.lock().unwrap().push(pair);
        let (h, w) = reference.dim();
        Ok(DisplacementField::zeros(h, w))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    DecodeStarted(usize),
    DecodeFinished(usize),
    Evicted(usize),
    Fallback { center: usize, neighbor: usize },
    Exported(usize, PathBuf),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl PipelineObserver for RecordingObserver {
    fn decode_started(&self, index: usize, _id: &FrameId) {
        self.push(Event::DecodeStarted(index));
    }

    fn decode_finished(&self, index: usize, _elapsed: std::time::Duration) {
        self.push(Event::DecodeFinished(index));
    }

    fn frame_evicted(&self, index: usize) {
        self.push(Event::Evicted(index));
    }

    fn alignment_fallback(&self, center: usize, neighbor: usize, _error: &DenoiseError) {
        self.push(Event::Fallback { center, neighbor });
    }

    fn frame_exported(&self, index: usize, path: &Path) {
        self.push(Event::Exported(index, path.to_path_buf()));
    }
}

/// Flat value used for frame `index` by [`indexed_frames`].
pub fn value_for_index(index: usize) -> f32 {
    (index + 1) as f32 * 0.1
}

fn index_from_value(value: f32) -> usize {
    ((value / 0.1).round() as usize).saturating_sub(1)
}

pub fn constant_frame(height: usize, width: usize, value: f32) -> Array3<f32> {
    Array3::from_elem((height, width, 3), value)
}

/// `count` flat frames whose value identifies their index.
pub fn indexed_frames(count: usize, height: usize, width: usize) -> Vec<Array3<f32>> {
    (0..count)
        .map(|i| constant_frame(height, width, value_for_index(i)))
        .collect()
}

/// Smooth blob pattern shifted by `(dx, dy)`: content at `(y, x)` in the
/// unshifted image appears at `(y + dy, x + dx)`.
pub fn blob_plane(height: usize, width: usize, dx: f32, dy: f32) -> Array2<f32> {
    let blobs = [
        (0.30f32, 0.35f32, 3.0f32, 1.0f32),
        (0.60, 0.55, 4.0, 0.8),
        (0.45, 0.70, 2.5, 0.6),
        (0.70, 0.30, 3.5, 0.7),
    ];
    Array2::from_shape_fn((height, width), |(row, col)| {
        let y = row as f32 - dy;
        let x = col as f32 - dx;
        let v: f32 = blobs
            .iter()
            .map(|&(cy, cx, sigma, amp)| {
                let by = cy * height as f32;
                let bx = cx * width as f32;
                let d2 = (y - by).powi(2) + (x - bx).powi(2);
                amp * (-d2 / (2.0 * sigma * sigma)).exp()
            })
            .sum();
        0.1 + 0.8 * v.min(1.0)
    })
}

/// Color frame whose three channels scale the shifted blob pattern.
pub fn blob_frame(height: usize, width: usize, dx: f32, dy: f32) -> Array3<f32> {
    let plane = blob_plane(height, width, dx, dy);
    Array3::from_shape_fn((height, width, 3), |(row, col, ch)| {
        plane[[row, col]] * [1.0, 0.8, 0.6][ch]
    })
}

/// SER header with the given geometry, bit depth and ColorID.
///
/// `color_id`: 0 = mono, 8..=11 = Bayer RGGB/GRBG/GBRG/BGGR,
/// 100 = RGB, 101 = BGR.
pub fn build_ser_header(
    width: u32,
    height: u32,
    bit_depth: u32,
    frame_count: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);
    buf.extend_from_slice(b"LUCAM-RECORDER");
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&color_id.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(frame_count as i32).to_le_bytes());
    buf.extend_from_slice(&fixed_field("observer"));
    buf.extend_from_slice(&fixed_field("camera"));
    buf.extend_from_slice(&fixed_field("scope"));
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());
    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

fn fixed_field(text: &str) -> [u8; 40] {
    let mut field = [0u8; 40];
    field[..text.len()].copy_from_slice(text.as_bytes());
    field
}

/// Complete 8-bit mono SER file holding `frames` (row-major bytes).
pub fn build_mono_ser(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, 8, frames.len(), 0);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}
