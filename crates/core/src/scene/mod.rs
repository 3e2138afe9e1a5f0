//! Scene assembly around the terrain builder
//!
//! The scene owns the terrain and water meshes, the splat material
//! description, decorative trees and the camera. Drawing them is the host
//! renderer's job.

pub mod camera;
pub mod config;
pub mod context;
pub mod trees;

pub use camera::{CameraRig, Viewport};
pub use config::{CameraConfig, SceneConfig, SplatLayer, SplatMaterial, WaterConfig};
pub use context::{FrameInfo, SceneContext, SceneStats};
pub use trees::{scatter_trees, TreeConfig, TreeInstance};
