//! Heightmap pixel sources
//!
//! A heightmap is a 2D grid of brightness samples normalized to [0,1]. The
//! terrain builder only reads through the [`PixelSource`] trait, so any decoded
//! image can drive it; [`Heightmap`] is the owned, normalized form produced by
//! the loader.

pub mod loader;
pub mod sampling;

pub use loader::{decode_heightmap, load_heightmap};
pub use sampling::{resample, SamplingPolicy};

use crate::error::TerrainError;
use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};

/// Read-only access to per-pixel brightness
///
/// Implementors must return samples in [0,1] for every `x < width()` and
/// `y < height()`. Sampling happens from multiple threads, hence `Sync`.
pub trait PixelSource: Sync {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Brightness at pixel `(x, y)` in [0,1]
    fn sample(&self, x: u32, y: u32) -> f32;

    /// True when the source has no pixels to sample
    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// How RGB pixels are reduced to a single brightness value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessMode {
    /// Red channel only
    Red,
    /// Mean of the red, green and blue channels
    #[default]
    Average,
    /// Rec. 709 luminance weights
    Luminance,
}

impl BrightnessMode {
    /// Reduce an 8-bit RGB triple to brightness in [0,1]
    #[inline]
    pub fn brightness(self, rgb: [u8; 3]) -> f32 {
        let [r, g, b] = rgb.map(f32::from);
        let value = match self {
            Self::Red => r,
            Self::Average => (r + g + b) / 3.0,
            Self::Luminance => 0.2126 * r + 0.7152 * g + 0.0722 * b,
        };
        (value / 255.0).clamp(0.0, 1.0)
    }
}

/// Owned grayscale heightmap with samples normalized to [0,1]
///
/// Deserialization goes through [`Heightmap::from_samples`], so loaded data is
/// validated and clamped like any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightmap")]
pub struct Heightmap {
    width: u32,
    height: u32,
    /// Row-major samples: `[y * width + x]`
    samples: Vec<f32>,
}

/// Unchecked serde form of [`Heightmap`]
#[derive(Deserialize)]
struct RawHeightmap {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl TryFrom<RawHeightmap> for Heightmap {
    type Error = TerrainError;

    fn try_from(raw: RawHeightmap) -> Result<Self, Self::Error> {
        Self::from_samples(raw.width, raw.height, raw.samples)
    }
}

impl Heightmap {
    /// Create a heightmap from row-major samples
    ///
    /// Samples are clamped to [0,1].
    ///
    /// # Errors
    /// Returns `InvalidInput` for zero dimensions, a length mismatch, or
    /// non-finite samples.
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::invalid_input(
                "heightmap",
                format!("dimensions must be non-zero, got {width}x{height}"),
            ));
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(TerrainError::invalid_input(
                "heightmap",
                format!("expected {expected} samples, got {}", samples.len()),
            ));
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(TerrainError::invalid_input(
                "heightmap",
                "samples must be finite",
            ));
        }

        let samples = samples.into_iter().map(|s| s.clamp(0.0, 1.0)).collect();
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create a heightmap with every sample set to `value`
    ///
    /// # Errors
    /// Same conditions as [`Heightmap::from_samples`].
    pub fn uniform(width: u32, height: u32, value: f32) -> Result<Self, TerrainError> {
        Self::from_samples(width, height, vec![value; width as usize * height as usize])
    }

    /// Convert a decoded image into a heightmap
    ///
    /// # Errors
    /// Returns `InvalidInput` if the image has zero width or height.
    pub fn from_image(image: &DynamicImage, mode: BrightnessMode) -> Result<Self, TerrainError> {
        let rgb = image.to_rgb8();
        let samples = rgb.pixels().map(|p| mode.brightness(p.0)).collect();
        Self::from_samples(rgb.width(), rgb.height(), samples)
    }

    /// Row-major samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Smallest sample value
    pub fn min_sample(&self) -> f32 {
        self.samples.iter().copied().fold(f32::MAX, f32::min)
    }

    /// Largest sample value
    pub fn max_sample(&self) -> f32 {
        self.samples.iter().copied().fold(f32::MIN, f32::max)
    }
}

impl PixelSource for Heightmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> f32 {
        self.samples[y as usize * self.width as usize + x as usize]
    }
}

impl PixelSource for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> f32 {
        f32::from(self.get_pixel(x, y).0[0]) / 255.0
    }
}
