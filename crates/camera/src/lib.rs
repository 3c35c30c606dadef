#![warn(missing_docs)]
//! Perspective camera for the portfolio scene.

use glam::{Mat4, Vec2, Vec3};
use portfolio_scene::{Ray, Viewpoint};

/// How far the camera travels per pixel of page scroll.
pub const SCROLL_FACTOR: f32 = 0.01;

/// Perspective camera with position, look direction and projection.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Normalised look direction.
    pub direction: Vec3,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            fov: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Point the camera at `target`. Ignored when the target is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.direction = dir;
        }
    }

    /// Get the forward direction vector (where camera is looking).
    pub fn forward(&self) -> Vec3 {
        self.direction
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.direction, Vec3::Y)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio (call when the viewport resizes). Zero-sized viewports
    /// are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Slide the camera diagonally with the page. `top` is the document's top edge
    /// relative to the viewport in pixels, negative once scrolled down.
    pub fn follow_scroll(&mut self, top: f32) {
        self.position.z = top * -SCROLL_FACTOR;
        self.position.y = top * SCROLL_FACTOR;
        self.position.x = top * SCROLL_FACTOR;
    }
}

impl Viewpoint for Camera {
    fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        let target = inverse.project_point3(ndc.extend(0.5));
        Ray::new(self.position, target - self.position)
    }
}
