pub mod image_io;
pub mod naming;
pub mod raw;
pub mod ser;
mod source;

use std::path::Path;

pub use naming::{output_file_name, output_path};
pub use source::{FileFrameSource, FrameSource};

/// Conventional image extensions accepted as single-frame inputs.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "jpg", "jpeg", "bmp"];

/// Whether `path` looks like something the file source can decode as one
/// frame (conventional image or camera raw).
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
                || raw::is_raw_extension(ext)
        })
}

pub fn is_ser_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ser"))
}
