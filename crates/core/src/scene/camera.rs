//! Camera rig and viewport tracking
//!
//! Projection matrices belong to the renderer; the rig only keeps the
//! parameters it needs and follows the viewport's aspect ratio.

use super::config::CameraConfig;
use crate::core_types::Vec3;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Drawable area size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`, or `None` for a collapsed viewport
    pub fn aspect(self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// Perspective camera placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height of the last viewport applied
    aspect: f32,
}

impl CameraRig {
    /// Place the camera as configured, with a square aspect until the first viewport arrives
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Point3::from(config.position),
            target: Point3::from(config.target),
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            aspect: 1.0,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Distance from the camera to its target
    pub fn distance_to_target(&self) -> f32 {
        nalgebra::distance(&self.position, &self.target)
    }

    /// Apply a viewport, returning true when the aspect ratio changed
    ///
    /// Collapsed viewports (zero width or height) leave the camera untouched.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        match viewport.aspect() {
            Some(aspect) if aspect != self.aspect => {
                self.aspect = aspect;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_rig_looks_at_origin() {
        let rig = CameraRig::from_config(&CameraConfig::default());
        let forward = rig.forward();

        assert_eq!(rig.aspect(), 1.0);
        assert_relative_eq!(forward.norm(), 1.0, epsilon = 1e-6);
        assert!(forward.x > 0.0 && forward.y < 0.0 && forward.z < 0.0);
        assert_relative_eq!(rig.distance_to_target(), 30.0);
    }

    #[test]
    fn test_viewport_aspect() {
        assert_eq!(Viewport::new(1920, 1080).aspect(), Some(1920.0 / 1080.0));
        assert_eq!(Viewport::new(0, 1080).aspect(), None);
    }

    #[test]
    fn test_set_viewport_reports_changes() {
        let mut rig = CameraRig::from_config(&CameraConfig::default());

        assert!(rig.set_viewport(Viewport::new(800, 600)));
        assert!(!rig.set_viewport(Viewport::new(800, 600)));
        assert!(!rig.set_viewport(Viewport::new(400, 300)));
        assert!(!rig.set_viewport(Viewport::new(800, 0)));
        assert_relative_eq!(rig.aspect(), 800.0 / 600.0);
    }
}
