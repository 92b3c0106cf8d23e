//! Render-side state shared with the native host.
//!
//! Nothing here touches a GPU API; the host turns these values into uniform
//! and instance buffers.

use crate::constants::{camera_eye, CAMERA_FOVY_DEG};
use glam::{Mat4, Vec3};

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera on the +z axis looking at the entity ring.
    pub fn companion_default(aspect: f32) -> Self {
        Self {
            eye: camera_eye(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Everything the renderer needs to draw one entity this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityFrame {
    pub position: Vec3,
    pub scale: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    pub rotation: Vec3,
}
