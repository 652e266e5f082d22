//! Memory-mapped reader for SER raw video containers.
//!
//! A SER file is a 178-byte header followed by `frame_count` fixed-size
//! frames (mono, Bayer mosaic, or interleaved RGB/BGR, 8 or 16 bits per
//! sample) and an optional timestamp trailer.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::{Array2, Array3};

use crate::color::demosaic::{demosaic_bilinear, CfaPattern};
use crate::color::{gray_to_rgb, merge_channels};
use crate::error::{DenoiseError, Result};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// Pixel layout declared by the SER `ColorID` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerLayout {
    Mono,
    Bayer(CfaPattern),
    Rgb,
    Bgr,
}

impl SerLayout {
    fn from_color_id(color_id: i32) -> Result<Self> {
        Ok(match color_id {
            0 => Self::Mono,
            8 => Self::Bayer(CfaPattern::Rggb),
            9 => Self::Bayer(CfaPattern::Grbg),
            10 => Self::Bayer(CfaPattern::Gbrg),
            11 => Self::Bayer(CfaPattern::Bggr),
            100 => Self::Rgb,
            101 => Self::Bgr,
            other => {
                return Err(DenoiseError::InvalidSer(format!(
                    "unsupported ColorID {other}"
                )))
            }
        })
    }

    fn planes(self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            Self::Mono | Self::Bayer(_) => 1,
        }
    }
}

impl std::fmt::Display for SerLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mono => write!(f, "Mono"),
            Self::Bayer(p) => write!(f, "Bayer {p}"),
            Self::Rgb => write!(f, "RGB"),
            Self::Bgr => write!(f, "BGR"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SerHeader {
    pub layout: SerLayout,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
}

impl SerHeader {
    fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    /// Bytes per frame, or `None` when the header's geometry overflows.
    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.layout.planes())?
            .checked_mul(self.bytes_per_sample())
    }
}

pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the map is read-only and lives as long as the reader.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(DenoiseError::InvalidSer("file too small for header".into()));
        }
        if &mmap[..14] != SER_MAGIC {
            return Err(DenoiseError::InvalidSer("missing LUCAM-RECORDER magic".into()));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let needed = header
            .frame_byte_size()
            .and_then(|size| size.checked_mul(header.frame_count as usize))
            .and_then(|data| data.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| {
                DenoiseError::InvalidSer(format!(
                    "frame geometry {}x{} x {} frames overflows",
                    header.width, header.height, header.frame_count
                ))
            })?;
        if mmap.len() < needed {
            return Err(DenoiseError::InvalidSer(format!(
                "truncated: expected at least {needed} bytes, got {}",
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    fn frame_bytes(&self, index: usize) -> Result<&[u8]> {
        let total = self.frame_count();
        if index >= total {
            return Err(DenoiseError::FrameIndexOutOfRange { index, total });
        }
        // `open` checked that every frame fits inside the map.
        let size = self.header.frame_byte_size().unwrap_or(0);
        let start = SER_HEADER_SIZE + index * size;
        self.mmap
            .get(start..start + size)
            .ok_or_else(|| DenoiseError::InvalidSer(format!("frame {index} past end of file")))
    }

    /// Decode one frame to an H×W×3 image in [0, 1].
    ///
    /// Mono frames are replicated into all channels; Bayer mosaics are
    /// demosaiced bilinearly.
    pub fn read_color(&self, index: usize) -> Result<Array3<f32>> {
        let raw = self.frame_bytes(index)?;
        let header = &self.header;
        let plane = |p: usize| decode_plane(raw, header, p);

        Ok(match header.layout {
            SerLayout::Mono => gray_to_rgb(&plane(0)),
            SerLayout::Bayer(pattern) => demosaic_bilinear(&plane(0), pattern),
            SerLayout::Rgb => merge_channels(&plane(0), &plane(1), &plane(2)),
            SerLayout::Bgr => merge_channels(&plane(2), &plane(1), &plane(0)),
        })
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = Cursor::new(&buf[14..]);
    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let endian_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let height = cursor.read_i32::<LittleEndian>()?;
    let pixel_depth = cursor.read_i32::<LittleEndian>()?;
    let frame_count = cursor.read_i32::<LittleEndian>()?;

    if width <= 0 || height <= 0 {
        return Err(DenoiseError::InvalidSer(format!(
            "invalid dimensions {width}x{height}"
        )));
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(DenoiseError::InvalidSer(format!(
            "unsupported pixel depth {pixel_depth}"
        )));
    }
    if frame_count < 0 {
        return Err(DenoiseError::InvalidSer(format!(
            "negative frame count {frame_count}"
        )));
    }

    Ok(SerHeader {
        layout: SerLayout::from_color_id(color_id)?,
        // Writers disagree on this flag; like Siril, only 1 means big-endian.
        little_endian: endian_flag != 1,
        width: width as u32,
        height: height as u32,
        pixel_depth: pixel_depth as u32,
        frame_count: frame_count as u32,
        observer: fixed_string(&buf[42..82]),
        instrument: fixed_string(&buf[82..122]),
        telescope: fixed_string(&buf[122..162]),
    })
}

fn fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Extract plane `plane` of an interleaved frame, normalized by the bit depth.
fn decode_plane(raw: &[u8], header: &SerHeader, plane: usize) -> Array2<f32> {
    let h = header.height as usize;
    let w = header.width as usize;
    let bps = header.bytes_per_sample();
    let stride = header.layout.planes() * bps;
    let max_val = ((1u32 << header.pixel_depth) - 1) as f32;

    Array2::from_shape_fn((h, w), |(row, col)| {
        let idx = (row * w + col) * stride + plane * bps;
        let value = if bps == 1 {
            raw[idx] as f32
        } else {
            let pair = [raw[idx], raw[idx + 1]];
            if header.little_endian {
                u16::from_le_bytes(pair) as f32
            } else {
                u16::from_be_bytes(pair) as f32
            }
        };
        (value / max_val).min(1.0)
    })
}
