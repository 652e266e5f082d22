//! Camera raw decoding through `rawloader`.

use std::path::Path;
use std::time::Instant;

use ndarray::{s, Array2, Array3};
use tracing::debug;

use crate::color::demosaic::{demosaic_bilinear, CfaPattern};
use crate::error::{DenoiseError, Result};

/// Extensions routed to the raw decoder (compared case-insensitively).
pub const RAW_EXTENSIONS: &[&str] = &[
    "dng", "nef", "nrw", "cr2", "crw", "arw", "srf", "sr2", "orf", "rw2", "raf", "pef", "srw",
    "mrw", "3fr", "erf", "kdc", "dcr", "mef", "mos", "iiq",
];

pub fn is_raw_extension(ext: &str) -> bool {
    RAW_EXTENSIONS.iter().any(|r| r.eq_ignore_ascii_case(ext))
}

/// Decode a camera raw file into an H×W×3 image in [0, 1].
///
/// Sensor values are black/white-level normalized, Bayer mosaics are
/// demosaiced bilinearly and the result is cropped to the camera's active
/// area. No white balance or color matrix is applied.
pub fn load_raw(path: &Path) -> Result<Array3<f32>> {
    let start = Instant::now();
    let raw = rawloader::decode_file(path)
        .map_err(|e| DenoiseError::RawDecode(format!("{}: {e}", path.display())))?;

    let (w, h, cpp) = (raw.width, raw.height, raw.cpp);
    let black = raw.blacklevels[0] as f32;
    let white = raw.whitelevels[0] as f32;
    if white <= black {
        return Err(DenoiseError::RawDecode(format!(
            "{}: white level {white} not above black level {black}",
            path.display()
        )));
    }
    let range = white - black;

    let samples: Vec<f32> = match &raw.data {
        rawloader::RawImageData::Integer(data) => data
            .iter()
            .map(|&v| ((v as f32 - black) / range).clamp(0.0, 1.0))
            .collect(),
        rawloader::RawImageData::Float(data) => data
            .iter()
            .map(|&v| ((v - black) / range).clamp(0.0, 1.0))
            .collect(),
    };

    let shape_error = |e: ndarray::ShapeError| {
        DenoiseError::RawDecode(format!("{}: {e}", path.display()))
    };

    let full = match cpp {
        1 => {
            let pattern = CfaPattern::from_top_row(raw.cfa.color_at(0, 0), raw.cfa.color_at(0, 1))
                .ok_or_else(|| {
                    DenoiseError::RawDecode(format!(
                        "{}: unsupported CFA layout {}",
                        path.display(),
                        raw.cfa.name
                    ))
                })?;
            let mosaic = Array2::from_shape_vec((h, w), samples).map_err(shape_error)?;
            demosaic_bilinear(&mosaic, pattern)
        }
        3 => Array3::from_shape_vec((h, w, 3), samples).map_err(shape_error)?,
        other => {
            return Err(DenoiseError::RawDecode(format!(
                "{}: {other} components per pixel not supported",
                path.display()
            )))
        }
    };

    // crops are [top, right, bottom, left]
    let [top, right, bottom, left] = raw.crops;
    let cropped = if top + bottom < h && left + right < w {
        full.slice(s![top..h - bottom, left..w - right, ..]).to_owned()
    } else {
        full
    };

    debug!(
        path = %path.display(),
        width = cropped.dim().1,
        height = cropped.dim().0,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Decoded raw frame"
    );
    Ok(cropped)
}
