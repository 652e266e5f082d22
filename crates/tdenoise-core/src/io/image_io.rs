use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use ndarray::Array3;

use crate::error::{DenoiseError, Result};

/// Load a conventional image (PNG, TIFF, JPEG, ...) as H×W×3 in [0, 1].
///
/// Grayscale sources are replicated into all channels; alpha is dropped.
pub fn load_color_image(path: &Path) -> Result<Array3<f32>> {
    let rgb = image::open(path)?.to_rgb16();
    let (w, h) = rgb.dimensions();

    Ok(Array3::from_shape_fn(
        (h as usize, w as usize, 3),
        |(row, col, ch)| rgb.get_pixel(col as u32, row as u32).0[ch] as f32 / 65535.0,
    ))
}

/// Save an H×W×3 image as 16-bit RGB TIFF.
pub fn save_color_tiff(image: &Array3<f32>, path: &Path) -> Result<()> {
    let (h, w, _) = image.dim();
    let pixels: Vec<u16> = image
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect();

    let buf = ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| encode_error(path, "pixel buffer does not match dimensions"))?;
    buf.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save an H×W×3 image as 8-bit RGB in `format`.
pub fn save_color_8bit(image: &Array3<f32>, path: &Path, format: ImageFormat) -> Result<()> {
    let (h, w, _) = image.dim();
    let mut buf = RgbImage::new(w as u32, h as u32);
    for (col, row, px) in buf.enumerate_pixels_mut() {
        for ch in 0..3 {
            let v = image[[row as usize, col as usize, ch]];
            px.0[ch] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
    buf.save_with_format(path, format)?;
    Ok(())
}

/// Save an image, choosing the encoder from the file extension.
///
/// Anything that is not PNG, JPEG or BMP is written as 16-bit TIFF.
pub fn save_color_image(image: &Array3<f32>, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => save_color_8bit(image, path, ImageFormat::Png),
        Some("jpg" | "jpeg") => save_color_8bit(image, path, ImageFormat::Jpeg),
        Some("bmp") => save_color_8bit(image, path, ImageFormat::Bmp),
        _ => save_color_tiff(image, path),
    }
}

fn encode_error(path: &Path, reason: &str) -> DenoiseError {
    DenoiseError::Encode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
