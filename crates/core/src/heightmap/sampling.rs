//! Resampling a heightmap onto a terrain grid
//!
//! Grid vertex `(col, row)` maps to the normalized coordinate
//! `(col / (resolution - 1), row / (resolution - 1))`, so the first and last
//! vertices of each row and column always land on the image edges.

use super::PixelSource;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Sampling policy used when the grid resolution differs from the image size
///
/// The two policies produce different output bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Nearest pixel, rounding half away from the origin
    #[default]
    Nearest,
    /// Bilinear interpolation of the four surrounding pixels
    Bilinear,
}

impl SamplingPolicy {
    /// Sample `source` for grid vertex `(col, row)` of a `resolution`-wide grid
    ///
    /// `resolution` must be at least 2 and `source` must not be empty.
    pub fn sample_grid<S: PixelSource + ?Sized>(
        self,
        source: &S,
        col: usize,
        row: usize,
        resolution: usize,
    ) -> f32 {
        match self {
            Self::Nearest => {
                let x = nearest_index(col, resolution, source.width());
                let y = nearest_index(row, resolution, source.height());
                source.sample(x, y)
            }
            Self::Bilinear => {
                let (x0, x1, tx) = bilinear_span(col, resolution, source.width());
                let (y0, y1, ty) = bilinear_span(row, resolution, source.height());

                let h00 = source.sample(x0, y0);
                let h10 = source.sample(x1, y0);
                let h01 = source.sample(x0, y1);
                let h11 = source.sample(x1, y1);

                let h0 = h00 * (1.0 - tx) + h10 * tx;
                let h1 = h01 * (1.0 - tx) + h11 * tx;
                h0 * (1.0 - ty) + h1 * ty
            }
        }
    }
}

/// Pixel index nearest to grid step `i` of `resolution`, in integer arithmetic
#[inline]
fn nearest_index(i: usize, resolution: usize, pixels: u32) -> u32 {
    let last = u64::from(pixels - 1);
    let steps = (resolution - 1) as u64;
    // round(i * last / steps) without going through floats
    let idx = (2 * i as u64 * last + steps) / (2 * steps);
    idx.min(last) as u32
}

/// Lower pixel, upper pixel and blend weight for grid step `i`
#[inline]
fn bilinear_span(i: usize, resolution: usize, pixels: u32) -> (u32, u32, f32) {
    let last = pixels - 1;
    let pos = i as f32 * last as f32 / (resolution - 1) as f32;
    let lo = (pos.floor() as u32).min(last);
    let hi = (lo + 1).min(last);
    (lo, hi, pos - lo as f32)
}

/// Resample `source` onto a `resolution × resolution` grid
///
/// Output is row-major with `resolution²` entries. Rows are sampled in
/// parallel; the result is identical to a sequential loop.
pub fn resample<S: PixelSource + ?Sized>(
    source: &S,
    resolution: usize,
    policy: SamplingPolicy,
) -> Vec<f32> {
    let mut out = vec![0.0; resolution * resolution];
    out.par_chunks_mut(resolution)
        .enumerate()
        .for_each(|(row, chunk)| {
            for (col, h) in chunk.iter_mut().enumerate() {
                *h = policy.sample_grid(source, col, row, resolution);
            }
        });
    out
}
