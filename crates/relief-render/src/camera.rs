//! First-person perspective camera

use glam::{Mat4, Vec3};

/// A perspective camera positioned by the player controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: 60.0,
            near: 0.5,
            far: 5000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn with_fov(fov: f32) -> Self {
        Self {
            fov,
            ..Self::default()
        }
    }

    /// Place the camera at `position` looking at `target`
    pub fn update_first_person(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Perspective projection with wgpu's [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get camera forward direction (world space)
    pub fn forward_vector(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}
