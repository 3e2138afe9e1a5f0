//! Scene configuration
//!
//! Defaults reproduce the stock demo: a 50 m terrain patch at 128 vertices
//! per side raised up to 8 m, a 500 m water plane driven by the same
//! heightmap at 0.1 m, grass/rock splatting and a camera at (-20, 10, 20)
//! looking at the origin.

use super::trees::TreeConfig;
use crate::error::TerrainError;
use crate::heightmap::BrightnessMode;
use crate::terrain::TerrainBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Linear RGB colour in [0,1]
pub type Rgb = [f32; 3];

/// White, used for the clear colour and the splat base colour
pub const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Tiling reference size: colour maps repeat `TILE_REFERENCE / 8` times
const TILE_REFERENCE: f32 = 128.0;

/// Everything needed to assemble the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Heightmap image driving both the terrain and the water plane
    pub heightmap_path: PathBuf,
    /// How heightmap pixels are reduced to brightness
    pub brightness: BrightnessMode,
    /// Terrain patch
    pub terrain: TerrainBuilder,
    /// Water plane
    pub water: WaterConfig,
    /// Texture-splatted terrain material
    pub material: SplatMaterial,
    /// Camera placement and projection parameters
    pub camera: CameraConfig,
    /// Renderer clear colour
    pub clear_color: Rgb,
    /// Decorative tree placement
    pub trees: TreeConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            heightmap_path: PathBuf::from("images/terrain.png"),
            brightness: BrightnessMode::default(),
            terrain: TerrainBuilder::new(50.0, 128, 8.0),
            water: WaterConfig::default(),
            material: SplatMaterial::default(),
            camera: CameraConfig::default(),
            clear_color: WHITE,
            trees: TreeConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the file cannot be read, parsed, or fails
    /// [`SceneConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TerrainError::invalid_input(
                "config",
                format!("failed to read '{}': {e}", path.display()),
            )
        })?;
        Self::from_json(&contents)
    }

    /// Parse a configuration from a JSON string
    ///
    /// # Errors
    /// Returns `InvalidInput` on malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self, TerrainError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TerrainError::invalid_input("config", format!("failed to parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for values the scene cannot be built from
    ///
    /// # Errors
    /// Returns the first `InvalidInput` found.
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.terrain.validate()?;
        self.water.layer.validate()?;
        self.material.validate()?;
        self.camera.validate()?;
        self.trees.validate()?;
        Ok(())
    }
}

/// Water plane built from the terrain heightmap with a small height scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub layer: TerrainBuilder,
    pub texture: PathBuf,
    pub transparent: bool,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            layer: TerrainBuilder::new(500.0, 128, 0.1),
            texture: PathBuf::from("images/water.jpg"),
            transparent: true,
        }
    }
}

/// Texture splatting material description
///
/// `color_maps[0]` is the base layer; `color_maps[i]` is blended over it
/// using `alpha_maps[i - 1]`. Blending itself happens in the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatMaterial {
    pub color: Rgb,
    pub color_maps: Vec<PathBuf>,
    pub alpha_maps: Vec<PathBuf>,
    /// How many times colour maps tile across the terrain (repeat wrapping)
    pub texture_repeat: f32,
}

impl Default for SplatMaterial {
    fn default() -> Self {
        Self {
            color: WHITE,
            color_maps: vec![
                PathBuf::from("images/grass.png"),
                PathBuf::from("images/rock.png"),
            ],
            alpha_maps: vec![PathBuf::from("images/terrain.png")],
            texture_repeat: TILE_REFERENCE / 8.0,
        }
    }
}

/// One colour map together with the mask that blends it in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplatLayer<'a> {
    pub color_map: &'a Path,
    /// `None` for the base layer
    pub alpha_map: Option<&'a Path>,
}

impl SplatMaterial {
    /// Layers in blend order, base first
    pub fn layers(&self) -> impl Iterator<Item = SplatLayer<'_>> {
        self.color_maps.iter().enumerate().map(|(i, color_map)| SplatLayer {
            color_map,
            alpha_map: i
                .checked_sub(1)
                .and_then(|a| self.alpha_maps.get(a))
                .map(PathBuf::as_path),
        })
    }

    /// # Errors
    /// Returns `InvalidInput` unless there is at least one colour map, exactly
    /// one alpha map per extra colour map, and a positive repeat.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.color_maps.is_empty() {
            return Err(TerrainError::invalid_input(
                "material.color_maps",
                "at least one colour map is required",
            ));
        }
        if self.alpha_maps.len() + 1 != self.color_maps.len() {
            return Err(TerrainError::invalid_input(
                "material.alpha_maps",
                format!(
                    "expected {} alpha maps for {} colour maps, got {}",
                    self.color_maps.len() - 1,
                    self.color_maps.len(),
                    self.alpha_maps.len()
                ),
            ));
        }
        if !(self.texture_repeat.is_finite() && self.texture_repeat > 0.0) {
            return Err(TerrainError::invalid_input(
                "material.texture_repeat",
                format!("must be finite and positive, got {}", self.texture_repeat),
            ));
        }
        Ok(())
    }
}

/// Perspective camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [-20.0, 10.0, 20.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl CameraConfig {
    /// # Errors
    /// Returns `InvalidInput` for a field of view outside (0, 180), a
    /// non-positive near plane, a far plane not beyond near, or a camera
    /// positioned on its own target.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(TerrainError::invalid_input(
                "camera.fov_degrees",
                format!("must be in (0, 180), got {}", self.fov_degrees),
            ));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(TerrainError::invalid_input(
                "camera.near",
                format!(
                    "need 0 < near < far, got near {} far {}",
                    self.near, self.far
                ),
            ));
        }
        if self.position == self.target {
            return Err(TerrainError::invalid_input(
                "camera.target",
                "must differ from camera position",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.terrain.resolution, 128);
        assert_eq!(config.water.layer.size, 500.0);
        assert_eq!(config.material.texture_repeat, 16.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "terrain": { "size": 20.0, "resolution": 33, "height_scale": 2.5 } }"#,
        )
        .unwrap();

        assert_eq!(config.terrain.size, 20.0);
        assert_eq!(config.terrain.resolution, 33);
        assert_eq!(config.water, WaterConfig::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_invalid_terrain_in_json() {
        let err = SceneConfig::from_json(
            r#"{ "terrain": { "size": 20.0, "resolution": 1, "height_scale": 2.5 } }"#,
        )
        .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneConfig::from_json("{ terrain").unwrap_err();
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn test_splat_layers() {
        let material = SplatMaterial::default();
        let layers: Vec<_> = material.layers().collect();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].color_map, Path::new("images/grass.png"));
        assert_eq!(layers[0].alpha_map, None);
        assert_eq!(layers[1].alpha_map, Some(Path::new("images/terrain.png")));
    }

    #[test]
    fn test_splat_alpha_count_mismatch() {
        let material = SplatMaterial {
            alpha_maps: Vec::new(),
            ..SplatMaterial::default()
        };
        assert!(material.validate().is_err());
    }

    #[test]
    fn test_camera_validation() {
        let camera = CameraConfig {
            near: 0.0,
            ..CameraConfig::default()
        };
        assert!(camera.validate().is_err());

        let camera = CameraConfig {
            target: [-20.0, 10.0, 20.0],
            ..CameraConfig::default()
        };
        assert!(camera.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneConfig::load("/nonexistent/scene.json").unwrap_err();
        assert!(err.is_invalid_input());
    }
}
