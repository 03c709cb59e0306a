//! Perspective camera looking down -Z at the visualizer.

use glam::{Mat4, Vec3};

use crate::params::RenderConfig;

/// Perspective camera with a cached projection matrix
///
/// Changing `fov_degrees`, `aspect`, `near` or `far` takes effect after
/// [`PerspectiveCamera::update_projection_matrix`].
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    /// Width / height of the viewport
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Camera placed on +Z as described by the render configuration
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut camera = Self::new(
            config.fov_degrees,
            config.aspect_ratio(),
            config.near_plane,
            config.far_plane,
        );
        camera.position = Vec3::new(0.0, 0.0, config.camera_distance);
        camera
    }

    /// Recompute the projection from the current lens parameters
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view transform (camera never rotates, Y stays up)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_from_config() {
        let config = RenderConfig::default();
        let camera = PerspectiveCamera::from_config(&config);

        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 175.0));
        assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(camera.fov_degrees, 75.0);
    }

    #[test]
    fn test_projection_waits_for_update() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 1.0, 1000.0);
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_origin_projects_to_screen_centre() {
        let camera = PerspectiveCamera::from_config(&RenderConfig::default());
        let clip = camera.view_proj_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_ring_fits_in_view() {
        // A cube on the 100-unit ring stays inside the frustum vertically
        let camera = PerspectiveCamera::from_config(&RenderConfig::default());
        let clip = camera.view_proj_matrix() * glam::Vec4::new(0.0, 100.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.y > 0.0 && ndc.y < 1.0);
    }
}
