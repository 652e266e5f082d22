use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_EXTENSION, FALLBACK_EXTENSION, OUTPUT_SUFFIX};
use crate::frame::FrameId;

/// Extensions the file source can write back in their own container.
const ENCODABLE_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "jpg", "jpeg", "bmp"];

pub fn is_encodable_extension(ext: &str) -> bool {
    ENCODABLE_EXTENSIONS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// Extension for the exported copy of `id`.
///
/// Keeps the input extension when it can be encoded, `png` when there is
/// none, and falls back to 16-bit TIFF for raw containers (DNG, SER, ...).
pub fn output_extension(id: &FrameId) -> String {
    match id {
        FrameId::SerFrame { .. } => FALLBACK_EXTENSION.to_string(),
        FrameId::File(_) => match id.extension() {
            None => DEFAULT_EXTENSION.to_string(),
            Some(ext) if is_encodable_extension(ext) => ext.to_string(),
            Some(_) => FALLBACK_EXTENSION.to_string(),
        },
    }
}

/// `<stem>_denoised.<ext>`
pub fn output_file_name(id: &FrameId) -> String {
    format!("{}{}.{}", id.stem(), OUTPUT_SUFFIX, output_extension(id))
}

pub fn output_path(output_dir: &Path, id: &FrameId) -> PathBuf {
    output_dir.join(output_file_name(id))
}
