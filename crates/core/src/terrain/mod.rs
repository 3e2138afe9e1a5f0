//! Terrain mesh generation from heightmaps

pub mod builder;
pub mod mesh;

pub use builder::{build, displace, TerrainBuilder};
pub use mesh::TerrainMesh;
