//! Terrain mesh produced by the heightmap builder
//!
//! Vertices sit on a regular grid in the XZ plane (row-major, columns along
//! +X, rows along +Z) with elevation on Y. The mesh is immutable once built.

use crate::core_types::Vec3;
use crate::error::TerrainError;
use crate::grid::validate_grid;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Displaced grid mesh ready for upload as vertex/index buffers
///
/// Deserializing checks the grid shape and rebuilds normals and the elevation
/// range from the stored positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTerrainMesh")]
pub struct TerrainMesh {
    /// Side length in world units
    size: f32,
    /// Vertices per side
    resolution: usize,
    /// Row-major positions: `[row * resolution + col]`
    positions: Vec<Vec3>,
    /// Unit normals derived from the displaced surface
    normals: Vec<Vec3>,
    /// Texture coordinates
    uvs: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise seen from +Y
    indices: Vec<u32>,
    /// Lowest vertex elevation
    min_elevation: f32,
    /// Highest vertex elevation
    max_elevation: f32,
}

/// Serde form of [`TerrainMesh`]; derived fields are recomputed
#[derive(Deserialize)]
struct RawTerrainMesh {
    size: f32,
    resolution: usize,
    positions: Vec<Vec3>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl TryFrom<RawTerrainMesh> for TerrainMesh {
    type Error = TerrainError;

    fn try_from(raw: RawTerrainMesh) -> Result<Self, Self::Error> {
        validate_grid(raw.size, raw.resolution)?;

        let vertex_count = raw.resolution * raw.resolution;
        let segments = raw.resolution - 1;
        if raw.positions.len() != vertex_count || raw.uvs.len() != vertex_count {
            return Err(TerrainError::invalid_input(
                "mesh",
                format!(
                    "expected {vertex_count} vertices, got {} positions and {} uvs",
                    raw.positions.len(),
                    raw.uvs.len()
                ),
            ));
        }
        if raw.indices.len() != segments * segments * 6
            || raw.indices.iter().any(|&i| i as usize >= vertex_count)
        {
            return Err(TerrainError::invalid_input(
                "mesh",
                format!(
                    "index list does not match a {}x{} grid",
                    raw.resolution, raw.resolution
                ),
            ));
        }
        if raw
            .positions
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(TerrainError::invalid_input(
                "mesh",
                "positions must be finite",
            ));
        }

        Ok(Self::from_parts(
            raw.size,
            raw.resolution,
            raw.positions,
            raw.uvs,
            raw.indices,
        ))
    }
}

impl TerrainMesh {
    /// Assemble a mesh from grid buffers, deriving normals and elevation range
    pub(crate) fn from_parts(
        size: f32,
        resolution: usize,
        positions: Vec<Vec3>,
        uvs: Vec<[f32; 2]>,
        indices: Vec<u32>,
    ) -> Self {
        let spacing = size / (resolution - 1) as f32;
        let normals = grid_normals(&positions, resolution, spacing);

        let (min_elevation, max_elevation) = positions
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        Self {
            size,
            resolution,
            positions,
            normals,
            uvs,
            indices,
            min_elevation,
            max_elevation,
        }
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

    /// Total number of vertices (`resolution²`)
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the index list
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Row-major vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Unit normals, one per vertex
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates, one per vertex
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Triangle list, three indices per triangle
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Lowest vertex elevation (Y)
    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    /// Highest vertex elevation (Y)
    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    /// Position at grid coordinate `(col, row)`
    #[inline]
    pub fn vertex(&self, col: usize, row: usize) -> Vec3 {
        self.positions[row * self.resolution + col]
    }

    /// Flat `x, y, z` triples for a position attribute
    pub fn position_buffer(&self) -> Vec<f32> {
        flatten(&self.positions)
    }

    /// Flat `x, y, z` triples for a normal attribute
    pub fn normal_buffer(&self) -> Vec<f32> {
        flatten(&self.normals)
    }

    /// Flat `u, v` pairs for a texture coordinate attribute
    pub fn uv_buffer(&self) -> Vec<f32> {
        self.uvs.iter().flatten().copied().collect()
    }

    /// Elevation at world position `(x, z)` using bilinear interpolation
    ///
    /// Returns `None` outside the terrain patch.
    pub fn elevation_at(&self, x: f32, z: f32) -> Option<f32> {
        let (ix0, iz0, fx, fz) = self.cell_at(x, z)?;

        let e00 = self.vertex(ix0, iz0).y;
        let e10 = self.vertex(ix0 + 1, iz0).y;
        let e01 = self.vertex(ix0, iz0 + 1).y;
        let e11 = self.vertex(ix0 + 1, iz0 + 1).y;

        let e0 = e00 * (1.0 - fx) + e10 * fx;
        let e1 = e01 * (1.0 - fx) + e11 * fx;
        Some(e0 * (1.0 - fz) + e1 * fz)
    }

    /// Interpolated unit normal at world position `(x, z)`
    ///
    /// Returns `None` outside the terrain patch.
    pub fn normal_at(&self, x: f32, z: f32) -> Option<Vec3> {
        let (ix0, iz0, fx, fz) = self.cell_at(x, z)?;
        let n = |col: usize, row: usize| self.normals[row * self.resolution + col];

        let n0 = n(ix0, iz0) * (1.0 - fx) + n(ix0 + 1, iz0) * fx;
        let n1 = n(ix0, iz0 + 1) * (1.0 - fx) + n(ix0 + 1, iz0 + 1) * fx;
        Some((n0 * (1.0 - fz) + n1 * fz).normalize())
    }

    /// Lower-left grid cell containing `(x, z)` and the fractional offsets in it
    fn cell_at(&self, x: f32, z: f32) -> Option<(usize, usize, f32, f32)> {
        let half = self.size / 2.0;
        if !(-half..=half).contains(&x) || !(-half..=half).contains(&z) {
            return None;
        }

        let spacing = self.spacing();
        let gx = (x + half) / spacing;
        let gz = (z + half) / spacing;

        let last_cell = self.resolution - 2;
        let ix0 = (gx.floor() as usize).min(last_cell);
        let iz0 = (gz.floor() as usize).min(last_cell);

        Some((ix0, iz0, gx - ix0 as f32, gz - iz0 as f32))
    }
}

fn flatten(vectors: &[Vec3]) -> Vec<f32> {
    vectors.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
}

/// Per-vertex normals from central differences (one-sided at the edges)
fn grid_normals(positions: &[Vec3], resolution: usize, spacing: f32) -> Vec<Vec3> {
    let height = |col: usize, row: usize| positions[row * resolution + col].y;
    let mut normals = vec![Vec3::y(); positions.len()];

    normals
        .par_chunks_mut(resolution)
        .enumerate()
        .for_each(|(row, chunk)| {
            let (up, down) = (row.saturating_sub(1), (row + 1).min(resolution - 1));
            for (col, normal) in chunk.iter_mut().enumerate() {
                let (left, right) = (col.saturating_sub(1), (col + 1).min(resolution - 1));

                let dh_dx =
                    (height(right, row) - height(left, row)) / ((right - left) as f32 * spacing);
                let dh_dz =
                    (height(col, down) - height(col, up)) / ((down - up) as f32 * spacing);

                *normal = Vec3::new(-dh_dx, 1.0, -dh_dz).normalize();
            }
        });

    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PlaneGrid;
    use approx::assert_relative_eq;

    fn ramp(size: f32, resolution: usize, slope: f32) -> TerrainMesh {
        let grid = PlaneGrid::new(size, resolution).unwrap();
        let positions = grid
            .positions()
            .iter()
            .map(|p| Vec3::new(p.x, p.x * slope, p.z))
            .collect();
        TerrainMesh::from_parts(
            size,
            resolution,
            positions,
            grid.uvs().to_vec(),
            grid.indices().to_vec(),
        )
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mesh = PlaneGrid::new(10.0, 6).unwrap().into_mesh();
        assert!(mesh.normals().iter().all(|n| *n == Vec3::y()));
        assert_eq!(mesh.min_elevation(), 0.0);
        assert_eq!(mesh.max_elevation(), 0.0);
    }

    #[test]
    fn test_ramp_normals_lean_downhill() {
        let mesh = ramp(10.0, 11, 1.0);
        for n in mesh.normals() {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(n.x, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
            assert_relative_eq!(n.z, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_elevation_at_vertices_and_between() {
        let mesh = ramp(10.0, 11, 0.5);
        assert_relative_eq!(mesh.elevation_at(-5.0, 0.0).unwrap(), -2.5, epsilon = 1e-5);
        assert_relative_eq!(mesh.elevation_at(5.0, 5.0).unwrap(), 2.5, epsilon = 1e-5);
        assert_relative_eq!(mesh.elevation_at(0.25, -3.3).unwrap(), 0.125, epsilon = 1e-5);
    }

    #[test]
    fn test_elevation_outside_is_none() {
        let mesh = ramp(10.0, 5, 1.0);
        assert!(mesh.elevation_at(5.01, 0.0).is_none());
        assert!(mesh.elevation_at(0.0, -6.0).is_none());
        assert!(mesh.normal_at(f32::NAN, 0.0).is_none());
    }

    #[test]
    fn test_normal_at_matches_vertices() {
        let mesh = PlaneGrid::new(4.0, 3).unwrap().into_mesh();
        let n = mesh.normal_at(0.7, -1.2).unwrap();
        assert_relative_eq!(n, Vec3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_serde_round_trip_rebuilds_mesh() {
        let mesh = ramp(8.0, 9, 0.3);
        let json = serde_json::to_string(&mesh).unwrap();
        assert_eq!(serde_json::from_str::<TerrainMesh>(&json).unwrap(), mesh);
    }

    #[test]
    fn test_deserialize_rejects_bad_grid() {
        let mut value = serde_json::to_value(ramp(4.0, 3, 1.0)).unwrap();
        value["resolution"] = serde_json::json!(1);
        assert!(serde_json::from_value::<TerrainMesh>(value).is_err());

        let mut value = serde_json::to_value(ramp(4.0, 3, 1.0)).unwrap();
        value["resolution"] = serde_json::json!(4);
        assert!(serde_json::from_value::<TerrainMesh>(value).is_err());

        let mut value = serde_json::to_value(ramp(4.0, 3, 1.0)).unwrap();
        value["indices"][0] = serde_json::json!(9);
        assert!(serde_json::from_value::<TerrainMesh>(value).is_err());
    }

    #[test]
    fn test_buffers() {
        let mesh = PlaneGrid::new(2.0, 2).unwrap().into_mesh();
        assert_eq!(
            mesh.position_buffer(),
            vec![-1.0, 0.0, -1.0, 1.0, 0.0, -1.0, -1.0, 0.0, 1.0, 1.0, 0.0, 1.0]
        );
        assert_eq!(mesh.normal_buffer().len(), 12);
        assert_eq!(mesh.uv_buffer(), vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(mesh.triangle_count(), 2);
    }
}
