//! Decorative tree placement on terrain
//!
//! Trees are planted on terrain vertices whose elevation falls inside a band
//! (above the waterline, below bare rock) and which keep a margin from the
//! patch edges. Placement is seeded so a scene always looks the same.

use crate::core_types::Vec3;
use crate::error::TerrainError;
use crate::terrain::TerrainMesh;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Tree scatter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum number of trees to place
    pub count: usize,
    /// RNG seed
    pub seed: u64,
    /// Lowest terrain elevation a tree may stand on
    pub min_elevation: f32,
    /// Highest terrain elevation a tree may stand on
    pub max_elevation: f32,
    /// Distance kept from the patch edges
    pub margin: f32,
    /// Uniform scale range (inclusive)
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            count: 24,
            seed: 42,
            min_elevation: 1.0,
            max_elevation: 6.0,
            margin: 2.0,
            min_scale: 0.8,
            max_scale: 1.2,
        }
    }
}

impl TreeConfig {
    /// # Errors
    /// Returns `InvalidInput` for an inverted elevation band or scale range,
    /// a negative margin, or non-positive scales.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.min_elevation.is_nan()
            || self.max_elevation.is_nan()
            || self.min_elevation > self.max_elevation
        {
            return Err(TerrainError::invalid_input(
                "trees.min_elevation",
                format!(
                    "band is empty: {} > {}",
                    self.min_elevation, self.max_elevation
                ),
            ));
        }
        if self.margin.is_nan() || self.margin < 0.0 {
            return Err(TerrainError::invalid_input(
                "trees.margin",
                format!("must be non-negative, got {}", self.margin),
            ));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale && self.max_scale.is_finite())
        {
            return Err(TerrainError::invalid_input(
                "trees.min_scale",
                format!(
                    "need 0 < min_scale <= max_scale, got {}..{}",
                    self.min_scale, self.max_scale
                ),
            ));
        }
        Ok(())
    }
}

/// A placed tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeInstance {
    /// Base of the trunk, on the terrain surface
    pub position: Vec3,
    pub scale: f32,
    /// Rotation about +Y in radians
    pub yaw: f32,
}

/// Place up to `config.count` trees on `mesh`
///
/// Each vertex hosts at most one tree. Fewer trees are returned when not
/// enough vertices qualify.
///
/// # Errors
/// Returns `InvalidInput` if `config` fails [`TreeConfig::validate`].
pub fn scatter_trees(
    mesh: &TerrainMesh,
    config: &TreeConfig,
) -> Result<Vec<TreeInstance>, TerrainError> {
    config.validate()?;

    let limit = mesh.size() / 2.0 - config.margin;
    let candidates: Vec<Vec3> = mesh
        .positions()
        .iter()
        .filter(|p| {
            p.x.abs() <= limit
                && p.z.abs() <= limit
                && (config.min_elevation..=config.max_elevation).contains(&p.y)
        })
        .copied()
        .collect();

    let amount = config.count.min(candidates.len());
    if amount == 0 {
        return Ok(Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let trees = rand::seq::index::sample(&mut rng, candidates.len(), amount)
        .into_iter()
        .map(|i| TreeInstance {
            position: candidates[i],
            scale: rng.random_range(config.min_scale..=config.max_scale),
            yaw: rng.random_range(0.0..TAU),
        })
        .collect();
    Ok(trees)
}
