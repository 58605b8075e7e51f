//! Camera capability used by the renderers.

use glint_math::{Camera, Pose, Ray};

/// Anything that can generate primary rays and report where it is.
///
/// Film coordinates are continuous: pixel `(i, j)` spans `[i, i + 1)` by
/// `[j, j + 1)` with `y` growing downward.
pub trait RayCamera: Sync {
    fn ray(&self, x: f32, y: f32, width: u32, height: u32) -> Ray;

    /// Current pose; accumulation restarts when it changes.
    fn pose(&self) -> Pose;
}

impl RayCamera for Camera {
    fn ray(&self, x: f32, y: f32, width: u32, height: u32) -> Ray {
        Camera::ray(self, x, y, width, height)
    }

    fn pose(&self) -> Pose {
        Camera::pose(self)
    }
}
