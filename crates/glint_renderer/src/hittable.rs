//! Hit records and the ray query seam between shading and geometry.

use glint_core::Material;
use glint_math::{Ray, Vec2, Vec3};

/// Record of a ray-surface intersection.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Interpolated texture coordinate
    pub uv: Vec2,
    /// Material of the primitive that was hit
    pub material: &'a Material,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, uv: Vec2, material: &'a Material) -> Self {
        let mut rec = Self {
            point: ray.at(t),
            normal: outward_normal,
            uv,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Geometry queries used while shading.
///
/// [`crate::Intersector`] is the production implementation; tests substitute
/// doubles to observe which queries the shader issues.
pub trait RayQuery: Sync {
    /// Nearest hit in `(0, inf)`, or `None`.
    fn trace(&self, ray: &Ray) -> Option<HitRecord<'_>>;

    /// Whether anything lies along `ray` in `(SHADOW_EPSILON, max_distance)`.
    fn occluded(&self, ray: &Ray, max_distance: f32) -> bool;
}
