use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3, Axis};

use crate::color::luminance;
use crate::error::{DenoiseError, Result};
use crate::window::Window;

/// Identifies one frame of a sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameId {
    /// One image per file (conventional image or camera raw).
    File(PathBuf),
    /// One frame inside a SER video container.
    SerFrame { path: PathBuf, frame: usize },
}

impl FrameId {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::SerFrame { path, .. } => path,
        }
    }

    /// File stem used to derive output names. SER frames get a zero-padded
    /// frame number so every frame of a container maps to a distinct name.
    pub fn stem(&self) -> String {
        let base = self
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        match self {
            Self::File(_) => base,
            Self::SerFrame { frame, .. } => format!("{base}_{frame:05}"),
        }
    }

    /// Extension of the underlying file, as written on disk.
    pub fn extension(&self) -> Option<&str> {
        self.path().extension().and_then(|e| e.to_str())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::SerFrame { path, frame } => write!(f, "{}#{}", path.display(), frame),
        }
    }
}

impl From<PathBuf> for FrameId {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// Ordered, immutable list of frames. Order defines temporal adjacency.
#[derive(Clone, Debug, Default)]
pub struct Sequence {
    ids: Vec<FrameId>,
}

impl Sequence {
    pub fn new(ids: Vec<FrameId>) -> Self {
        Self { ids }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(paths.into_iter().map(|p| FrameId::File(p.into())).collect())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FrameId> {
        self.ids.get(index)
    }

    pub fn ids(&self) -> &[FrameId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameId> {
        self.ids.iter()
    }

    /// Clamp an index into `[0, len - 1]`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.len().saturating_sub(1))
    }

    /// Temporal window of `radius` frames around `center`, clamped to the sequence.
    pub fn window(&self, center: usize, radius: usize) -> Window {
        Window::around(center, radius, self.len())
    }
}

impl From<Vec<FrameId>> for Sequence {
    fn from(ids: Vec<FrameId>) -> Self {
        Self::new(ids)
    }
}

/// One decoded frame: H×W×3 color plus its H×W luminance.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    pub index: usize,
    pub color: Array3<f32>,
    pub luminance: Array2<f32>,
}

impl Frame {
    /// Wrap a decoded color image, deriving its luminance.
    pub fn new(index: usize, color: Array3<f32>) -> Self {
        let luminance = luminance(&color);
        Self {
            index,
            color,
            luminance,
        }
    }

    pub fn height(&self) -> usize {
        self.color.len_of(Axis(0))
    }

    pub fn width(&self) -> usize {
        self.color.len_of(Axis(1))
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        (self.height(), self.width())
    }
}

/// Dense per-pixel displacement, shape = (height, width, 2).
///
/// Channel 0 holds the x offset, channel 1 the y offset. Reference pixel
/// `(y, x)` samples the source at `(y + dy, x + dx)`.
#[derive(Clone, Debug)]
pub struct DisplacementField {
    data: Array3<f32>,
}

impl DisplacementField {
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, 2)),
        }
    }

    /// A field where every pixel moves by the same amount.
    pub fn uniform(height: usize, width: usize, dx: f32, dy: f32) -> Self {
        let mut data = Array3::zeros((height, width, 2));
        data.index_axis_mut(Axis(2), 0).fill(dx);
        data.index_axis_mut(Axis(2), 1).fill(dy);
        Self { data }
    }

    pub fn from_array(data: Array3<f32>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != 2 {
            return Err(DenoiseError::Estimation(format!(
                "displacement field must have 2 channels, got {c} ({w}x{h})"
            )));
        }
        Ok(Self { data })
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        let (h, w, _) = self.data.dim();
        (h, w)
    }

    #[inline]
    pub fn dx(&self, row: usize, col: usize) -> f32 {
        self.data[[row, col, 0]]
    }

    #[inline]
    pub fn dy(&self, row: usize, col: usize) -> f32 {
        self.data[[row, col, 1]]
    }

    pub fn as_array(&self) -> &Array3<f32> {
        &self.data
    }

    /// Mean `(dx, dy)` over the whole field.
    pub fn mean_motion(&self) -> (f32, f32) {
        let dx = self.data.index_axis(Axis(2), 0).mean().unwrap_or(0.0);
        let dy = self.data.index_axis(Axis(2), 1).mean().unwrap_or(0.0);
        (dx, dy)
    }
}
