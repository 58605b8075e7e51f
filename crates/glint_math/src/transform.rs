//! Poses and matrix helpers.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World placement of a camera or light: position plus orientation.
///
/// Forward is the local -Z axis, matching glam's right-handed `look_at_rh`
/// convention, so an identity pose looks down (0, 0, -1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Pose at `position` whose forward axis points at `target`.
    ///
    /// When `up` is parallel to the view direction (a camera looking straight
    /// down, say) another up axis is substituted. A target at the position
    /// itself keeps the identity orientation.
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return Self::from_position(position);
        }
        let up = if forward.cross(up.normalize_or_zero()).length_squared() < 1e-6 {
            fallback_up(forward)
        } else {
            up
        };

        let view = Mat4::look_at_rh(position, target, up);
        // The view matrix rotates world into camera space; its transpose undoes that.
        let rotation = Quat::from_mat3(&Mat3::from_mat4(view).transpose()).normalize();
        Self { position, rotation }
    }

    /// Pose from Euler angles in degrees: pitch about X, yaw about Y, roll about Z.
    pub fn from_euler_degrees(position: Vec3, pitch: f32, yaw: f32, roll: f32) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            yaw.to_radians(),
            pitch.to_radians(),
            roll.to_radians(),
        );
        Self { position, rotation }
    }

    /// Same position, pointing the forward axis along `forward`.
    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward.normalize());
        self
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Up axis for views along +-Y; screen top then faces -Z.
fn fallback_up(forward: Vec3) -> Vec3 {
    if forward.z.abs() < 0.9 {
        Vec3::NEG_Z
    } else {
        Vec3::Y
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Extension trait for Mat4 with transforms glam does not provide.
pub trait Mat4Ext {
    /// Transform a surface normal: inverse-transpose, then renormalize.
    ///
    /// Keeps normals perpendicular to surfaces under non-uniform scale.
    fn transform_normal3(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_normal3(&self, normal: Vec3) -> Vec3 {
        let normal_matrix = Mat3::from_mat4(*self).inverse().transpose();
        (normal_matrix * normal).normalize_or_zero()
    }
}
