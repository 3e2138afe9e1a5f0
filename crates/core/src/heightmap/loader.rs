//! Heightmap decoding
//!
//! Decoding is the first of two phases: it must complete before the terrain
//! builder runs, and it is the only place image formats are touched.

use super::{BrightnessMode, Heightmap};
use crate::error::DecodeError;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Decode PNG/JPEG (or any format `image` recognizes) bytes into a heightmap
///
/// # Errors
/// Returns `DecodeError::Format` for unrecognized or corrupt data and
/// `DecodeError::Empty` for a zero-sized image.
pub fn decode_heightmap(bytes: &[u8], mode: BrightnessMode) -> Result<Heightmap, DecodeError> {
    let image = image::load_from_memory(bytes).map_err(|e| DecodeError::Format(e.to_string()))?;
    into_heightmap(&image, mode)
}

/// Read and decode a heightmap image from disk
///
/// # Errors
/// Returns `DecodeError::Io` if the file cannot be read, otherwise the same
/// errors as [`decode_heightmap`].
pub fn load_heightmap<P: AsRef<Path>>(
    path: P,
    mode: BrightnessMode,
) -> Result<Heightmap, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| DecodeError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let heightmap = decode_heightmap(&bytes, mode)?;
    debug!(
        "Loaded heightmap '{}' ({} bytes, mode {:?})",
        path.display(),
        bytes.len(),
        mode
    );
    Ok(heightmap)
}

fn into_heightmap(image: &DynamicImage, mode: BrightnessMode) -> Result<Heightmap, DecodeError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::Empty);
    }
    Heightmap::from_image(image, mode).map_err(|_| DecodeError::Empty)
}
