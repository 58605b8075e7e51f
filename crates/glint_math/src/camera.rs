use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Pose, Ray};

/// Perspective pinhole camera.
///
/// Generates rays the way a compute-shader camera does: film coordinates are
/// mapped to normalized device coordinates, unprojected through the inverse
/// projection and rotated into world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 60.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn with_fov_degrees(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y.to_radians();
        self
    }

    /// World → camera space.
    pub fn view_matrix(&self) -> Mat4 {
        self.pose().to_matrix().inverse()
    }

    /// Camera → clip space for a film of the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn pose(&self) -> Pose {
        Pose::looking_at(self.position, self.target, self.up)
    }

    /// Ray through continuous film coordinates.
    ///
    /// `x` grows to the right and `y` grows downward; pixel `(i, j)` covers
    /// `[i, i + 1) x [j, j + 1)`, so its center is at `(i + 0.5, j + 0.5)`.
    pub fn ray(&self, x: f32, y: f32, width: u32, height: u32) -> Ray {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        let aspect = width / height;

        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;

        // perspective_rh inverted for a point on the z = -1 plane
        let tan_half = (self.fov_y * 0.5).tan();
        let view_dir = Vec3::new(ndc_x * tan_half * aspect, ndc_y * tan_half, -1.0);

        let pose = self.pose();
        Ray::new(self.position, pose.rotation * view_dir)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let ray = camera.ray(50.0, 50.0, 100, 100);
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.origin(), camera.position);
    }

    #[test]
    fn test_film_orientation() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let left = camera.ray(0.0, 50.0, 100, 100);
        let right = camera.ray(100.0, 50.0, 100, 100);
        let top = camera.ray(50.0, 0.0, 100, 100);
        let bottom = camera.ray(50.0, 100.0, 100, 100);

        assert!(left.direction().x < 0.0);
        assert!(right.direction().x > 0.0);
        assert!(top.direction().y > 0.0);
        assert!(bottom.direction().y < 0.0);
    }

    #[test]
    fn test_edge_ray_matches_field_of_view() {
        let camera = Camera::new(Vec3::ZERO, Vec3::NEG_Z).with_fov_degrees(90.0);
        let top = camera.ray(50.0, 0.0, 100, 100);
        // 45 degrees above the axis
        assert!((top.direction().y - top.direction().z.abs()).abs() < 1e-5);
    }

    #[test]
    fn test_rays_agree_with_projection_matrix() {
        let camera = Camera::new(Vec3::new(2.0, 1.0, 4.0), Vec3::new(0.0, 0.5, 0.0));
        let (width, height) = (160, 90);
        let view_proj = camera.projection_matrix(width as f32 / height as f32) * camera.view_matrix();

        for &(x, y) in &[(10.0, 20.0), (80.0, 45.0), (150.5, 3.25)] {
            let ray = camera.ray(x, y, width, height);
            let ndc = view_proj.project_point3(ray.at(7.0));
            let expected_x = 2.0 * x / width as f32 - 1.0;
            let expected_y = 1.0 - 2.0 * y / height as f32;
            assert!((ndc.x - expected_x).abs() < 1e-3, "x: {} vs {}", ndc.x, expected_x);
            assert!((ndc.y - expected_y).abs() < 1e-3, "y: {} vs {}", ndc.y, expected_y);
        }
    }

    #[test]
    fn test_top_down_camera() {
        let camera = Camera::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        let center = camera.ray(10.0, 10.0, 20, 20);
        assert!((center.direction() - Vec3::NEG_Y).length() < 1e-5);

        // Film top leans toward -Z, film right toward +X
        let top = camera.ray(10.0, 0.0, 20, 20);
        let right = camera.ray(20.0, 10.0, 20, 20);
        assert!(top.direction().z < 0.0);
        assert!(right.direction().x > 0.0);
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn test_pose_follows_target() {
        let camera = Camera::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        assert!((camera.pose().forward() - Vec3::NEG_X).length() < 1e-5);

        let mut moved = camera;
        moved.position.y += 0.1;
        assert_ne!(camera.pose(), moved.pose());
    }
}
