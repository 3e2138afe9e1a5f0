//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, normals, and directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the crate for vertex positions, surface normals, and camera directions.
/// Y is up.
pub type Vec3 = Vector3<f32>;
