//! Application context with an explicit lifecycle
//!
//! `init` builds every piece of geometry up front, `frame` is the per-frame
//! callback the host's render loop drives, and `teardown` consumes the
//! context and reports what ran.

use super::camera::{CameraRig, Viewport};
use super::config::SceneConfig;
use super::trees::{scatter_trees, TreeInstance};
use crate::error::TerrainError;
use crate::heightmap::{load_heightmap, PixelSource};
use crate::terrain::TerrainMesh;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of one frame callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Zero-based frame counter
    pub frame: u64,
    /// True when the viewport differed from the previous frame's
    pub resized: bool,
    /// Camera aspect after this frame
    pub aspect: f32,
}

/// Summary returned by [`SceneContext::teardown`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneStats {
    pub frames: u64,
    pub resizes: u64,
    pub terrain_vertices: usize,
    pub terrain_triangles: usize,
    pub water_vertices: usize,
    pub trees: usize,
    pub min_elevation: f32,
    pub max_elevation: f32,
}

/// Everything the renderer needs to draw the scene
#[derive(Debug)]
pub struct SceneContext {
    config: SceneConfig,
    terrain: TerrainMesh,
    water: TerrainMesh,
    trees: Vec<TreeInstance>,
    camera: CameraRig,
    viewport: Option<Viewport>,
    frames: u64,
    resizes: u64,
}

impl SceneContext {
    /// Build terrain, water and trees from an already decoded heightmap
    ///
    /// # Errors
    /// Returns `InvalidInput` if the configuration is invalid or the
    /// heightmap is empty.
    pub fn init<S: PixelSource + ?Sized>(
        config: SceneConfig,
        heightmap: &S,
    ) -> Result<Self, TerrainError> {
        config.validate()?;

        let terrain = config.terrain.build(heightmap)?;
        let water = config.water.layer.build(heightmap)?;
        let trees = scatter_trees(&terrain, &config.trees)?;
        let camera = CameraRig::from_config(&config.camera);

        info!(
            "Scene initialized: terrain {}x{} ({:.1}..{:.1} m), water {}x{}, {} trees",
            terrain.resolution(),
            terrain.resolution(),
            terrain.min_elevation(),
            terrain.max_elevation(),
            water.resolution(),
            water.resolution(),
            trees.len()
        );

        Ok(Self {
            config,
            terrain,
            water,
            trees,
            camera,
            viewport: None,
            frames: 0,
            resizes: 0,
        })
    }

    /// Decode the configured heightmap, then build the scene
    ///
    /// # Errors
    /// Returns `Decode` if the heightmap cannot be loaded, otherwise the same
    /// errors as [`SceneContext::init`].
    pub fn load(config: SceneConfig) -> Result<Self, TerrainError> {
        let heightmap = load_heightmap(&config.heightmap_path, config.brightness)?;
        Self::init(config, &heightmap)
    }

    /// Per-frame callback: track the viewport and keep the camera aspect in step
    pub fn frame(&mut self, viewport: Viewport) -> FrameInfo {
        let resized = self.viewport != Some(viewport);
        if resized {
            self.viewport = Some(viewport);
            self.resizes += 1;
            if self.camera.set_viewport(viewport) {
                debug!(
                    "Viewport resized to {}x{}, aspect {:.3}",
                    viewport.width,
                    viewport.height,
                    self.camera.aspect()
                );
            }
        }

        let info = FrameInfo {
            frame: self.frames,
            resized,
            aspect: self.camera.aspect(),
        };
        self.frames += 1;
        info
    }

    /// Totals so far
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            frames: self.frames,
            resizes: self.resizes,
            terrain_vertices: self.terrain.vertex_count(),
            terrain_triangles: self.terrain.triangle_count(),
            water_vertices: self.water.vertex_count(),
            trees: self.trees.len(),
            min_elevation: self.terrain.min_elevation(),
            max_elevation: self.terrain.max_elevation(),
        }
    }

    /// End the session, releasing all geometry, and report totals
    pub fn teardown(self) -> SceneStats {
        let stats = self.stats();
        info!("Scene torn down after {} frames", stats.frames);
        stats
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainMesh {
        &self.terrain
    }

    pub fn water(&self) -> &TerrainMesh {
        &self.water
    }

    pub fn trees(&self) -> &[TreeInstance] {
        &self.trees
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Last viewport seen by [`SceneContext::frame`]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}
