//! Camera types consumed by the billboard positioner.
//!
//! These types avoid platform-specific APIs. The web frontend owns a
//! [`Camera`], moves it along an orbit every frame and hands it to the panel
//! set through the [`CameraView`] trait.

use glam::{Mat4, Vec3, Vec4};

/// What the billboard positioner needs from a camera.
pub trait CameraView {
    fn position(&self) -> Vec3;

    fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Project a world-space point to normalized device coordinates.
    /// `None` when the point is behind the camera or cannot be projected.
    fn project(&self, world: Vec3) -> Option<Vec3>;
}

/// Simple right-handed camera description with perspective projection.
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
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Place the eye on a horizontal circle around `target`.
    pub fn set_orbit(&mut self, angle_radians: f32, distance: f32, height: f32) {
        self.eye = self.target
            + Vec3::new(
                distance * angle_radians.sin(),
                height,
                distance * angle_radians.cos(),
            );
    }

    /// Map NDC to pixel coordinates (origin top-left).
    #[inline]
    pub fn ndc_to_screen(ndc: Vec3, width: f32, height: f32) -> (f32, f32) {
        ((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
    }
}

impl CameraView for Camera {
    fn position(&self) -> Vec3 {
        self.eye
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn project(&self, world: Vec3) -> Option<Vec3> {
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return None;
        }
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }
}
