//! Heightmap-driven terrain construction
//!
//! Building is a pure two-step transform: a flat [`PlaneGrid`] is created and
//! then displaced along +Y by resampled heightmap brightness times
//! `height_scale`. Planar coordinates are never touched, so the result lines
//! up exactly with the flat grid.

use super::TerrainMesh;
use crate::error::TerrainError;
use crate::grid::{validate_grid, PlaneGrid};
use crate::heightmap::{resample, PixelSource, SamplingPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for building one terrain patch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainBuilder {
    /// World-space width and depth of the patch
    pub size: f32,
    /// Vertices per side (at least 2)
    pub resolution: usize,
    /// Multiplier from normalized brightness to world elevation; negative inverts
    pub height_scale: f32,
    /// How the heightmap is resampled to the grid
    #[serde(default)]
    pub sampling: SamplingPolicy,
}

impl TerrainBuilder {
    /// Create a builder using nearest-pixel sampling
    pub fn new(size: f32, resolution: usize, height_scale: f32) -> Self {
        Self {
            size,
            resolution,
            height_scale,
            sampling: SamplingPolicy::Nearest,
        }
    }

    /// Use a different sampling policy
    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    /// Check the grid parameters and the height scale
    ///
    /// # Errors
    /// Returns `InvalidInput` for a non-positive or non-finite size,
    /// resolution below 2, or a non-finite height scale.
    pub fn validate(&self) -> Result<(), TerrainError> {
        validate_grid(self.size, self.resolution)?;
        if !self.height_scale.is_finite() {
            return Err(TerrainError::invalid_input(
                "height_scale",
                format!("must be finite, got {}", self.height_scale),
            ));
        }
        Ok(())
    }

    /// Build the displaced mesh from `heightmap`
    ///
    /// # Errors
    /// Returns `InvalidInput` if the parameters fail [`TerrainBuilder::validate`]
    /// or the heightmap has zero width or height. No partial mesh is produced.
    pub fn build<S: PixelSource + ?Sized>(
        &self,
        heightmap: &S,
    ) -> Result<TerrainMesh, TerrainError> {
        self.validate()?;
        if heightmap.is_empty() {
            return Err(TerrainError::invalid_input(
                "heightmap",
                format!(
                    "dimensions must be non-zero, got {}x{}",
                    heightmap.width(),
                    heightmap.height()
                ),
            ));
        }

        let grid = PlaneGrid::new(self.size, self.resolution)?;
        let samples = resample(heightmap, self.resolution, self.sampling);
        let mesh = displace(grid, &samples, self.height_scale)?;

        debug!(
            "Built terrain: size {}, {}x{} vertices from {}x{} heightmap ({:?}), elevation {:.3}..{:.3}",
            self.size,
            self.resolution,
            self.resolution,
            heightmap.width(),
            heightmap.height(),
            self.sampling,
            mesh.min_elevation(),
            mesh.max_elevation()
        );

        Ok(mesh)
    }
}

/// Build a terrain mesh with nearest-pixel sampling
///
/// # Errors
/// Returns `InvalidInput` if `resolution < 2`, `size <= 0`, or the heightmap
/// has zero width or height.
pub fn build<S: PixelSource + ?Sized>(
    size: f32,
    resolution: usize,
    height_scale: f32,
    heightmap: &S,
) -> Result<TerrainMesh, TerrainError> {
    TerrainBuilder::new(size, resolution, height_scale).build(heightmap)
}

/// Set each grid vertex's elevation to `samples[i] * height_scale`
///
/// `samples` is row-major with one entry per vertex.
///
/// # Errors
/// Returns `InvalidInput` if `samples` does not match the grid's vertex count.
pub fn displace(
    grid: PlaneGrid,
    samples: &[f32],
    height_scale: f32,
) -> Result<TerrainMesh, TerrainError> {
    let vertex_count = grid.positions().len();
    if samples.len() != vertex_count {
        return Err(TerrainError::invalid_input(
            "samples",
            format!("expected {vertex_count} samples, got {}", samples.len()),
        ));
    }

    let size = grid.size();
    let resolution = grid.resolution();
    let (mut positions, uvs, indices) = grid.into_buffers();
    for (p, h) in positions.iter_mut().zip(samples) {
        p.y = h * height_scale;
    }

    Ok(TerrainMesh::from_parts(size, resolution, positions, uvs, indices))
}
