use crate::{Interval, Ray, Vec3};

/// Minimum extent per axis, so flat geometry (a single quad) still has a
/// box that rays can enter.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Contains nothing; growing it by a point yields that point's box.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Box spanned by two corners in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Tightest box around a point cloud. Empty input gives [`Aabb::EMPTY`].
    pub fn from_points_iter(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for point in points {
            aabb.grow(point);
        }
        if !aabb.is_empty() {
            aabb.pad_to_minimums();
        }
        aabb
    }

    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }

    /// Slab test: does the ray pass through the box anywhere inside `ray_t`?
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        if self.is_empty() {
            return false;
        }

        let inv_dir = ray.direction().recip();
        let t0 = (self.min - ray.origin()) * inv_dir;
        let t1 = (self.max - ray.origin()) * inv_dir;

        let near = t0.min(t1).max_element().max(ray_t.min);
        let far = t0.max(t1).min_element().min(ray_t.max);
        near <= far
    }

    fn pad_to_minimums(&mut self) {
        let thin = (self.max - self.min).cmplt(Vec3::splat(MIN_EXTENT));
        let pad = Vec3::select(thin, Vec3::splat(MIN_EXTENT * 0.5), Vec3::ZERO);
        self.min -= pad;
        self.max += pad;
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
