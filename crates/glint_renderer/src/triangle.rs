//! World-space triangle for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use glint_core::Material;
use glint_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::HitRecord;

/// A triangle with per-vertex texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Texture coordinates at each vertex
    uvs: [Vec2; 3],
    /// Outward face normal (unit length)
    normal: Vec3,
}

impl Triangle {
    /// Create a triangle whose normal follows the counter-clockwise winding.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, uvs: [Vec2; 3]) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self::with_normal(v0, v1, v2, uvs, normal)
    }

    /// Create a triangle with a pre-computed outward normal.
    pub fn with_normal(v0: Vec3, v1: Vec3, v2: Vec3, uvs: [Vec2; 3], normal: Vec3) -> Self {
        Self {
            v0,
            v1,
            v2,
            uvs,
            normal: normal.normalize_or_zero(),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points_iter(self.vertices())
    }

    /// Möller-Trumbore intersection.
    ///
    /// Returns the ray parameter and barycentric `(u, v)` if the ray crosses
    /// the triangle strictly inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32, f32)> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some((t, u, v))
    }

    /// Intersect and build a hit record with the interpolated texture
    /// coordinate.
    pub fn hit<'a>(&self, ray: &Ray, ray_t: Interval, material: &'a Material) -> Option<HitRecord<'a>> {
        let (t, u, v) = self.intersect(ray, ray_t)?;
        let uv = self.uvs[0] * (1.0 - u - v) + self.uvs[1] * u + self.uvs[2] * v;
        Some(HitRecord::new(ray, t, self.normal, uv, material))
    }
}
