use gallery_common::{Screen, Viewport};
use glam::{Mat4, Vec3};

/// Fixed perspective camera on the +Z axis looking at the plane row.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub distance: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            distance: 20.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, distance: f32) -> Self {
        Self {
            fov_degrees,
            distance,
            ..Self::default()
        }
    }

    pub fn set_aspect_from(&mut self, screen: Screen) {
        self.aspect = screen.aspect();
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Visible world extent of the z = 0 plane.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_perspective(self.fov_radians(), self.distance, self.aspect)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 20.0));
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn viewport_follows_aspect() {
        let mut cam = PerspectiveCamera::new(45.0, 20.0);
        cam.set_aspect_from(Screen::new(2000.0, 1000.0));
        let vp = cam.viewport();
        let expected_height = 2.0 * 22.5_f32.to_radians().tan() * 20.0;
        assert!((vp.height - expected_height).abs() < 1e-4);
        assert!((vp.width - expected_height * 2.0).abs() < 1e-4);
    }

    #[test]
    fn viewport_edge_projects_to_clip_edge() {
        let mut cam = PerspectiveCamera::default();
        cam.set_aspect_from(Screen::new(1600.0, 900.0));
        let vp = cam.viewport();
        let clip = cam.view_projection() * glam::Vec4::new(vp.width / 2.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w - 1.0).abs() < 1e-4);
    }
}
