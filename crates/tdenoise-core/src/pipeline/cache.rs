//! Rolling cache holding the decoded frames of one temporal window.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{DenoiseError, Result};
use crate::frame::{Frame, Sequence};
use crate::io::FrameSource;
use crate::window::Window;

use super::observer::PipelineObserver;

/// Decoded frames keyed by sequence index.
///
/// Frames are decoded on first access and stay resident until a call to
/// [`FrameCache::ensure_window`] moves the window past them. Every frame of
/// a sequence must share the geometry of the first one decoded.
pub struct FrameCache<'a> {
    sequence: &'a Sequence,
    source: &'a dyn FrameSource,
    observer: &'a dyn PipelineObserver,
    frames: BTreeMap<usize, Frame>,
    dims: Option<(usize, usize)>,
    decode_count: usize,
}

impl<'a> FrameCache<'a> {
    pub fn new(
        sequence: &'a Sequence,
        source: &'a dyn FrameSource,
        observer: &'a dyn PipelineObserver,
    ) -> Self {
        Self {
            sequence,
            source,
            observer,
            frames: BTreeMap::new(),
            dims: None,
            decode_count: 0,
        }
    }

    pub fn sequence(&self) -> &'a Sequence {
        self.sequence
    }

    /// Frame at `index`, decoding it if it is not resident.
    pub fn get(&mut self, index: usize) -> Result<&Frame> {
        if !self.frames.contains_key(&index) {
            let frame = self.decode(index)?;
            self.frames.insert(index, frame);
        }
        self.frames
            .get(&index)
            .ok_or(DenoiseError::FrameIndexOutOfRange {
                index,
                total: self.sequence.len(),
            })
    }

    /// Make the resident set exactly `window`: evict everything outside it,
    /// then decode whatever inside it is missing.
    pub fn ensure_window(&mut self, window: Window) -> Result<()> {
        let evicted: Vec<usize> = self
            .frames
            .keys()
            .copied()
            .filter(|&index| !window.contains(index))
            .collect();
        for index in evicted {
            self.frames.remove(&index);
            self.observer.frame_evicted(index);
        }

        for index in window.indices() {
            if !self.frames.contains_key(&index) {
                let frame = self.decode(index)?;
                self.frames.insert(index, frame);
            }
        }
        Ok(())
    }

    /// Resident frame at `index`, without decoding.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.frames.contains_key(&index)
    }

    /// Resident indices in ascending order.
    pub fn resident_indices(&self) -> Vec<usize> {
        self.frames.keys().copied().collect()
    }

    /// Decodes performed since the cache was created.
    pub fn decode_count(&self) -> usize {
        self.decode_count
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every resident frame.
    pub fn clear(&mut self) {
        let indices = self.resident_indices();
        self.frames.clear();
        for index in indices {
            self.observer.frame_evicted(index);
        }
    }

    fn decode(&mut self, index: usize) -> Result<Frame> {
        let sequence = self.sequence;
        let id = sequence
            .get(index)
            .ok_or(DenoiseError::FrameIndexOutOfRange {
                index,
                total: sequence.len(),
            })?;

        self.observer.decode_started(index, id);
        let start = Instant::now();
        let color = self
            .source
            .decode(id)
            .map_err(|e| DenoiseError::Decode {
                index,
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        self.decode_count += 1;

        let (h, w, channels) = color.dim();
        if channels != COLOR_CHANNEL_COUNT {
            return Err(DenoiseError::Decode {
                index,
                id: id.to_string(),
                reason: format!("expected {COLOR_CHANNEL_COUNT} channels, got {channels}"),
            });
        }
        match self.dims {
            None => self.dims = Some((h, w)),
            Some(expected) if expected != (h, w) => {
                return Err(DenoiseError::Decode {
                    index,
                    id: id.to_string(),
                    reason: format!(
                        "frame is {w}x{h}, sequence is {}x{}",
                        expected.1, expected.0
                    ),
                });
            }
            Some(_) => {}
        }

        let frame = Frame::new(index, color);
        self.observer.decode_finished(index, start.elapsed());
        Ok(frame)
    }
}
