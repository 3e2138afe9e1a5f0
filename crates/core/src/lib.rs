//! Heightmap Terrain Core Library
//!
//! Turns a grayscale heightmap into a displaced terrain mesh and assembles the
//! small scene around it: a water plane, a texture-splatted material
//! description, decorative trees and a camera that follows the viewport.
//!
//! ## Two-phase flow
//!
//! 1. Decode the heightmap image ([`heightmap::load_heightmap`]); this is the
//!    only step that touches image formats and can fail with a `DecodeError`.
//! 2. Build terrain ([`terrain::build`]); pure and deterministic, failing only
//!    with `InvalidInput`.

// Core types and utilities
pub mod core_types;
pub mod error;

// Geometry
pub mod grid;
pub mod heightmap;
pub mod terrain;

// Scene assembly
pub mod scene;

// Re-export core types
pub use core_types::Vec3;
pub use error::{DecodeError, TerrainError};

// Re-export geometry types
pub use grid::PlaneGrid;
pub use heightmap::{BrightnessMode, Heightmap, PixelSource, SamplingPolicy};
pub use terrain::{build, TerrainBuilder, TerrainMesh};

// Re-export scene types
pub use scene::{SceneConfig, SceneContext, SceneStats, Viewport};
