use ndarray::{Array2, Array3};

/// 2x2 color filter array layout, named by the top-left cell row by row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CfaPattern {
    Rggb,
    Grbg,
    Gbrg,
    Bggr,
}

impl CfaPattern {
    /// Build a pattern from the color index (0=R, 1=G, 2=B) of the two
    /// top-row cells. Returns `None` for layouts that are not 2x2 Bayer.
    pub fn from_top_row(c00: usize, c01: usize) -> Option<Self> {
        match (c00, c01) {
            (0, 1) => Some(Self::Rggb),
            (1, 0) => Some(Self::Grbg),
            (1, 2) => Some(Self::Gbrg),
            (2, 1) => Some(Self::Bggr),
            _ => None,
        }
    }

    /// `(row_parity, col_parity)` of the red sample within the 2x2 cell.
    fn red_position(self) -> (usize, usize) {
        match self {
            Self::Rggb => (0, 0),
            Self::Grbg => (0, 1),
            Self::Gbrg => (1, 0),
            Self::Bggr => (1, 1),
        }
    }
}

impl std::fmt::Display for CfaPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rggb => write!(f, "RGGB"),
            Self::Grbg => write!(f, "GRBG"),
            Self::Gbrg => write!(f, "GBRG"),
            Self::Bggr => write!(f, "BGGR"),
        }
    }
}

/// Bilinear demosaic of a Bayer mosaic into an H×W×3 image.
///
/// Missing samples are the mean of the nearest same-color neighbours; the
/// mosaic is edge-clamped at the borders.
pub fn demosaic_bilinear(mosaic: &Array2<f32>, pattern: CfaPattern) -> Array3<f32> {
    let (h, w) = mosaic.dim();
    let (r_row, r_col) = pattern.red_position();
    let mut out = Array3::<f32>::zeros((h, w, 3));

    for row in 0..h {
        let r = row as isize;
        let on_red_row = row % 2 == r_row;
        for col in 0..w {
            let c = col as isize;
            let on_red_col = col % 2 == r_col;
            let here = mosaic[[row, col]];

            let rgb = match (on_red_row, on_red_col) {
                (true, true) => [here, cross(mosaic, r, c), diagonal(mosaic, r, c)],
                (true, false) => [horizontal(mosaic, r, c), here, vertical(mosaic, r, c)],
                (false, true) => [vertical(mosaic, r, c), here, horizontal(mosaic, r, c)],
                (false, false) => [diagonal(mosaic, r, c), cross(mosaic, r, c), here],
            };
            for (ch, v) in rgb.into_iter().enumerate() {
                out[[row, col, ch]] = v;
            }
        }
    }

    out
}

#[inline]
fn at(mosaic: &Array2<f32>, row: isize, col: isize) -> f32 {
    let (h, w) = mosaic.dim();
    mosaic[[
        row.clamp(0, h as isize - 1) as usize,
        col.clamp(0, w as isize - 1) as usize,
    ]]
}

#[inline]
fn cross(m: &Array2<f32>, r: isize, c: isize) -> f32 {
    (at(m, r - 1, c) + at(m, r + 1, c) + at(m, r, c - 1) + at(m, r, c + 1)) * 0.25
}

#[inline]
fn diagonal(m: &Array2<f32>, r: isize, c: isize) -> f32 {
    (at(m, r - 1, c - 1) + at(m, r - 1, c + 1) + at(m, r + 1, c - 1) + at(m, r + 1, c + 1)) * 0.25
}

#[inline]
fn horizontal(m: &Array2<f32>, r: isize, c: isize) -> f32 {
    (at(m, r, c - 1) + at(m, r, c + 1)) * 0.5
}

#[inline]
fn vertical(m: &Array2<f32>, r: isize, c: isize) -> f32 {
    (at(m, r - 1, c) + at(m, r + 1, c)) * 0.5
}
