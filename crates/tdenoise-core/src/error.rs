use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DenoiseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Failed to decode frame {index} ({id}): {reason}")]
    Decode {
        index: usize,
        id: String,
        reason: String,
    },

    #[error("Failed to write {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    #[error(
        "Frames {first} and {second} would both be written to {}",
        path.display()
    )]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Motion estimation failed: {0}")]
    Estimation(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Raw decode error: {0}")]
    RawDecode(String),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Unsupported input: {0}")]
    Unsupported(String),

    #[error("Export cancelled after {completed} of {total} frames")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, DenoiseError>;
