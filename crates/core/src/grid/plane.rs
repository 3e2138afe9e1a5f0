//! Flat square grid lying in the XZ plane
//!
//! The grid is the undisplaced starting point for terrain: `resolution`
//! vertices per side spanning `[-size/2, size/2]` on X and Z with Y = 0.
//! Columns advance along +X and rows along +Z.

use crate::core_types::Vec3;
use crate::error::TerrainError;
use crate::terrain::TerrainMesh;

/// Validate grid parameters shared by the plane and the terrain builder
///
/// # Errors
/// Returns `InvalidInput` if `size` is not finite and positive,
/// `resolution < 2`, or `resolution²` vertices cannot be addressed by `u32`
/// indices.
pub fn validate_grid(size: f32, resolution: usize) -> Result<(), TerrainError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(TerrainError::invalid_input(
            "size",
            format!("must be finite and positive, got {size}"),
        ));
    }
    if resolution < 2 {
        return Err(TerrainError::invalid_input(
            "resolution",
            format!("must be at least 2, got {resolution}"),
        ));
    }
    let addressable = resolution
        .checked_mul(resolution)
        .is_some_and(|count| u32::try_from(count).is_ok());
    if !addressable {
        return Err(TerrainError::invalid_input(
            "resolution",
            format!("{resolution}² vertices exceed the u32 index range"),
        ));
    }
    Ok(())
}

/// World coordinate of grid step `i` along one axis, in `[-size/2, size/2]`
///
/// Both ends are exact; the last step is pinned so rounding never leaves the patch.
#[inline]
fn axis_coordinate(i: usize, segments: usize, size: f32) -> f32 {
    let half = size / 2.0;
    if i == segments {
        half
    } else {
        -half + size * (i as f32 / segments as f32)
    }
}

/// Flat `resolution × resolution` vertex grid with UVs and triangle indices
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneGrid {
    size: f32,
    resolution: usize,
    /// Row-major vertex positions, Y = 0
    positions: Vec<Vec3>,
    /// Texture coordinates, `v` flipped so row 0 is the top of the image
    uvs: Vec<[f32; 2]>,
    /// Two counter-clockwise triangles per cell, seen from +Y
    indices: Vec<u32>,
}

impl PlaneGrid {
    /// Build a flat grid of `resolution²` vertices covering `size × size`
    ///
    /// # Errors
    /// Returns `InvalidInput` for the conditions in [`validate_grid`].
    pub fn new(size: f32, resolution: usize) -> Result<Self, TerrainError> {
        validate_grid(size, resolution)?;

        let segments = resolution - 1;
        let vertex_count = resolution * resolution;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        for row in 0..resolution {
            let z = axis_coordinate(row, segments, size);
            for col in 0..resolution {
                let x = axis_coordinate(col, segments, size);
                positions.push(Vec3::new(x, 0.0, z));
                uvs.push([
                    col as f32 / segments as f32,
                    1.0 - row as f32 / segments as f32,
                ]);
            }
        }

        let mut indices = Vec::with_capacity(segments * segments * 6);
        let stride = resolution as u32;
        for row in 0..segments as u32 {
            for col in 0..segments as u32 {
                let a = row * stride + col;
                let b = (row + 1) * stride + col;
                let c = (row + 1) * stride + col + 1;
                let d = row * stride + col + 1;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Ok(Self {
            size,
            resolution,
            positions,
            uvs,
            indices,
        })
    }

    /// Side length in world units
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Vertices per side
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Distance between neighbouring vertices
    pub fn spacing(&self) -> f32 {
        self.size / (self.resolution - 1) as f32
    }

    /// Row-major vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex texture coordinates
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Triangle index list
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Split into position, UV and index buffers
    pub(crate) fn into_buffers(self) -> (Vec<Vec3>, Vec<[f32; 2]>, Vec<u32>) {
        (self.positions, self.uvs, self.indices)
    }

    /// Turn the flat grid into a mesh with upward normals
    pub fn into_mesh(self) -> TerrainMesh {
        let (size, resolution) = (self.size, self.resolution);
        let (positions, uvs, indices) = self.into_buffers();
        TerrainMesh::from_parts(size, resolution, positions, uvs, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_layout() {
        let grid = PlaneGrid::new(10.0, 3).unwrap();
        let p = grid.positions();

        assert_eq!(p.len(), 9);
        assert_eq!(p[0], Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(p[2], Vec3::new(5.0, 0.0, -5.0));
        assert_eq!(p[4], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(p[6], Vec3::new(-5.0, 0.0, 5.0));
        assert_eq!(p[8], Vec3::new(5.0, 0.0, 5.0));
        assert_relative_eq!(grid.spacing(), 5.0);
    }

    #[test]
    fn test_uvs() {
        let grid = PlaneGrid::new(1.0, 2).unwrap();
        assert_eq!(grid.uvs(), &[[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_indices_single_cell() {
        let grid = PlaneGrid::new(1.0, 2).unwrap();
        assert_eq!(grid.indices(), &[0, 2, 1, 2, 3, 1]);
    }

    #[test]
    fn test_triangles_face_up() {
        let grid = PlaneGrid::new(4.0, 5).unwrap();
        let p = grid.positions();
        for tri in grid.indices().chunks(3) {
            let (a, b, c) = (p[tri[0] as usize], p[tri[1] as usize], p[tri[2] as usize]);
            let n = (b - a).cross(&(c - a));
            assert!(n.y > 0.0, "triangle {tri:?} faces down");
        }
    }

    #[test]
    fn test_index_count_and_bounds() {
        let grid = PlaneGrid::new(8.0, 9).unwrap();
        assert_eq!(grid.indices().len(), 8 * 8 * 6);
        assert!(grid.indices().iter().all(|&i| (i as usize) < 81));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(PlaneGrid::new(0.0, 4).unwrap_err().is_invalid_input());
        assert!(PlaneGrid::new(-1.0, 4).unwrap_err().is_invalid_input());
        assert!(PlaneGrid::new(f32::NAN, 4).unwrap_err().is_invalid_input());
        assert!(PlaneGrid::new(1.0, 1).unwrap_err().is_invalid_input());
        assert!(PlaneGrid::new(1.0, 0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_rejects_unaddressable_resolution() {
        assert!(validate_grid(1.0, 65_535).is_ok());
        assert!(validate_grid(1.0, 65_536).unwrap_err().is_invalid_input());
        assert!(PlaneGrid::new(1.0, 100_000).unwrap_err().is_invalid_input());
        assert!(validate_grid(1.0, usize::MAX).is_err());
    }

    #[test]
    fn test_edges_stay_inside_patch() {
        let sizes = [0.3, 0.7, 1.0, 2.9, 10.0, 12.5, 33.3, 50.0, 77.7, 123.4, 500.0, 1001.1];
        for size in sizes {
            let half = size / 2.0;
            for resolution in 2..200 {
                let grid = PlaneGrid::new(size, resolution).unwrap();
                for p in grid.positions() {
                    assert!(
                        p.x.abs() <= half && p.z.abs() <= half,
                        "size {size} resolution {resolution}: ({}, {}) outside ±{half}",
                        p.x,
                        p.z
                    );
                }
                let last = grid.positions()[resolution * resolution - 1];
                assert_eq!((last.x, last.z), (half, half));
                assert_eq!(grid.positions()[0].x, -half);
            }
        }
    }
}
