use std::path::Path;

use ndarray::Array3;

use crate::error::{DenoiseError, Result};
use crate::frame::FrameId;

use super::image_io::{load_color_image, save_color_image};
use super::raw::{is_raw_extension, load_raw};
use super::ser::SerReader;

/// Decodes frames into H×W×3 float images in [0, 1] and persists results.
///
/// Implementations must be shareable across threads so a pipeline can be
/// moved onto a worker.
pub trait FrameSource: Send + Sync {
    fn decode(&self, id: &FrameId) -> Result<Array3<f32>>;

    fn encode(&self, path: &Path, image: &Array3<f32>) -> Result<()>;
}

/// Filesystem-backed source: conventional images through `image`, camera
/// raws through `rawloader`, and frames of SER containers.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileFrameSource;

impl FrameSource for FileFrameSource {
    fn decode(&self, id: &FrameId) -> Result<Array3<f32>> {
        match id {
            FrameId::SerFrame { path, frame } => SerReader::open(path)?.read_color(*frame),
            FrameId::File(path) => match id.extension() {
                Some(ext) if is_raw_extension(ext) => load_raw(path),
                Some(ext) if ext.eq_ignore_ascii_case("ser") => Err(DenoiseError::Unsupported(
                    format!("{} is a SER container; address its frames individually", path.display()),
                )),
                _ => load_color_image(path),
            },
        }
    }

    fn encode(&self, path: &Path, image: &Array3<f32>) -> Result<()> {
        save_color_image(image, path)
    }
}
