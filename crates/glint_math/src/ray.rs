use crate::Vec3;

/// A half-line with an origin and a unit direction.
///
/// The direction is normalized on construction; a zero direction stays zero
/// and such a ray hits nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// A ray leaving a surface point, nudged off the surface along `normal`.
    ///
    /// Without the nudge a ray cast from a hit point can immediately
    /// re-intersect the surface it started on.
    pub fn offset_from(point: Vec3, normal: Vec3, direction: Vec3, epsilon: f32) -> Self {
        Self::new(point + normal * epsilon, direction)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
