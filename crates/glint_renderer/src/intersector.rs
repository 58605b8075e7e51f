//! Nearest-hit and shadow queries over a flat primitive list.

use glint_math::{Interval, Ray};

use crate::geometry::{LayerMask, Primitive};
use crate::shader::SHADOW_EPSILON;
use crate::{HitRecord, RayQuery};

/// Brute-force intersector over prepared primitives.
///
/// Each primitive's bounds are slab-tested before its triangles. A later
/// candidate replaces the current best only when strictly closer, so ties
/// go to the earliest primitive and triangle in list order.
#[derive(Clone, Copy, Debug)]
pub struct Intersector<'a> {
    primitives: &'a [Primitive],
    mask: LayerMask,
}

impl<'a> Intersector<'a> {
    /// Intersector that sees only the traceable layer.
    pub fn new(primitives: &'a [Primitive]) -> Self {
        Self {
            primitives,
            mask: LayerMask::default(),
        }
    }

    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    fn visible(&self) -> impl Iterator<Item = &'a Primitive> + '_ {
        self.primitives
            .iter()
            .filter(move |primitive| self.mask.contains(primitive.layer))
    }

    /// Nearest hit strictly inside `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for primitive in self.visible() {
            let interval = ray_t.with_max(closest_so_far);
            if !primitive.bounds.hit(ray, interval) {
                continue;
            }
            for triangle in &primitive.triangles {
                let interval = ray_t.with_max(closest_so_far);
                if let Some(rec) = triangle.hit(ray, interval, &primitive.material) {
                    closest_so_far = rec.t;
                    closest = Some(rec);
                }
            }
        }

        closest
    }

    /// Whether any hit exists strictly inside `ray_t`; stops at the first.
    pub fn any_hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.visible().any(|primitive| {
            primitive.bounds.hit(ray, ray_t)
                && primitive
                    .triangles
                    .iter()
                    .any(|triangle| triangle.intersect(ray, ray_t).is_some())
        })
    }
}

impl RayQuery for Intersector<'_> {
    fn trace(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        self.hit(ray, Interval::FORWARD)
    }

    fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.any_hit(ray, Interval::new(SHADOW_EPSILON, max_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Layer;
    use crate::Triangle;
    use glint_core::Material;
    use glint_math::{Vec2, Vec3};
    use proptest::prelude::*;

    /// Square facing +Z at depth `z`, spanning [-1, 1] in x and y.
    fn quad(name: &str, z: f32, color: Vec3) -> Primitive {
        let corners = [
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(1.0, 1.0, z),
            Vec3::new(-1.0, 1.0, z),
        ];
        let uvs = [Vec2::ZERO; 3];
        let triangles = vec![
            Triangle::new(corners[0], corners[1], corners[2], uvs),
            Triangle::new(corners[0], corners[2], corners[3], uvs),
        ];
        Primitive::new(name, triangles, Material::flat(color))
    }

    fn color_of(hit: &HitRecord) -> Vec3 {
        hit.material.base_color(Vec2::ZERO)
    }

    #[test]
    fn test_empty_geometry_misses() {
        let intersector = Intersector::new(&[]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(intersector.trace(&ray).is_none());
        assert!(!intersector.occluded(&ray, f32::INFINITY));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let primitives = vec![quad("far", -5.0, Vec3::X), quad("near", -2.0, Vec3::Y)];
        let intersector = Intersector::new(&primitives);

        let hit = intersector.trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert_eq!(color_of(&hit), Vec3::Y);
    }

    #[test]
    fn test_ties_go_to_first_primitive() {
        let primitives = vec![quad("first", -3.0, Vec3::X), quad("second", -3.0, Vec3::Y)];
        let intersector = Intersector::new(&primitives);

        let hit = intersector.trace(&Ray::new(Vec3::new(0.3, 0.2, 0.0), Vec3::NEG_Z)).unwrap();
        assert_eq!(color_of(&hit), Vec3::X);
    }

    #[test]
    fn test_layer_mask_filters_primitives() {
        let primitives = vec![
            quad("helper", -1.0, Vec3::X).with_layer(Layer::DEFAULT),
            quad("visible", -4.0, Vec3::Y),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let traceable = Intersector::new(&primitives);
        let hit = traceable.trace(&ray).unwrap();
        assert_eq!(color_of(&hit), Vec3::Y);

        let everything = Intersector::new(&primitives).with_mask(LayerMask::ALL);
        assert_eq!(color_of(&everything.trace(&ray).unwrap()), Vec3::X);

        let nothing = Intersector::new(&primitives).with_mask(LayerMask::NONE);
        assert!(nothing.trace(&ray).is_none());
    }

    #[test]
    fn test_occluded_respects_max_distance() {
        let primitives = vec![quad("wall", -3.0, Vec3::ONE)];
        let intersector = Intersector::new(&primitives);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(intersector.occluded(&ray, 10.0));
        assert!(!intersector.occluded(&ray, 2.5));
        assert!(!intersector.occluded(&Ray::new(Vec3::ZERO, Vec3::Z), 10.0));
    }

    #[test]
    fn test_occluded_ignores_hits_within_epsilon() {
        let primitives = vec![quad("surface", 0.0, Vec3::ONE)];
        let intersector = Intersector::new(&primitives);

        // Starting half an epsilon above the surface, pointing into it
        let ray = Ray::new(Vec3::new(0.0, 0.0, SHADOW_EPSILON * 0.5), Vec3::NEG_Z);
        assert!(!intersector.occluded(&ray, 10.0));
    }

    /// Outcome of the plane-crossing check, kept independent of Möller-Trumbore.
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Crossing {
        Miss,
        Hit(f32),
        /// Too close to an edge, the plane or the origin to call either way
        Borderline,
    }

    /// Intersect the supporting plane, then test the point against each edge
    /// by its signed in-plane distance.
    fn plane_crossing(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Crossing {
        const MARGIN: f32 = 1e-3;

        let normal = (b - a).cross(c - a);
        let area = normal.length();
        if area < MARGIN {
            return Crossing::Borderline;
        }
        let denom = normal.dot(ray.direction());
        if denom.abs() < 1e-2 * area {
            return Crossing::Borderline;
        }

        let t = normal.dot(a - ray.origin()) / denom;
        if t.abs() < 1e-2 {
            return Crossing::Borderline;
        }
        if t < 0.0 {
            return Crossing::Miss;
        }

        let point = ray.at(t);
        let edge_distance = |from: Vec3, to: Vec3| {
            let edge = to - from;
            edge.cross(point - from).dot(normal) / (area * edge.length())
        };
        let inside = edge_distance(a, b)
            .min(edge_distance(b, c))
            .min(edge_distance(c, a));

        if inside > MARGIN {
            Crossing::Hit(t)
        } else if inside < -MARGIN {
            Crossing::Miss
        } else {
            Crossing::Borderline
        }
    }

    fn point_in(extent: f32) -> impl Strategy<Value = Vec3> {
        (-extent..extent, -extent..extent, -extent..extent).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_trace_returns_nearest_hit(
            corners in prop::collection::vec((point_in(3.0), point_in(3.0), point_in(3.0)), 1..8),
            duplicate in prop::option::of(0usize..8),
            origin in point_in(8.0),
            aim in point_in(2.0),
        ) {
            prop_assume!((aim - origin).length() > 0.1);
            let ray = Ray::new(origin, aim - origin);

            let mut shapes: Vec<[Vec3; 3]> = corners.iter().map(|&(a, b, c)| [a, b, c]).collect();
            // Same triangle again later in the list: an exact tie
            if let Some(index) = duplicate.filter(|&i| i < shapes.len()) {
                shapes.push(shapes[index]);
            }
            let primitives: Vec<Primitive> = shapes
                .iter()
                .enumerate()
                .map(|(i, &[a, b, c])| {
                    let triangle = Triangle::new(a, b, c, [Vec2::ZERO; 3]);
                    Primitive::new(format!("t{i}"), vec![triangle], Material::flat(Vec3::splat(i as f32)))
                })
                .collect();

            let crossings: Vec<Crossing> = shapes.iter().map(|&shape| plane_crossing(&ray, shape)).collect();
            prop_assume!(!crossings.contains(&Crossing::Borderline));

            let hits: Vec<(usize, f32)> = crossings
                .iter()
                .enumerate()
                .filter_map(|(i, crossing)| match crossing {
                    Crossing::Hit(t) => Some((i, *t)),
                    _ => None,
                })
                .collect();

            let intersector = Intersector::new(&primitives);
            let traced = intersector.trace(&ray);

            let Some(nearest) = hits.iter().map(|&(_, t)| t).reduce(f32::min) else {
                prop_assert!(traced.is_none(), "expected a miss, got {:?}", traced.map(|h| h.t));
                return Ok(());
            };
            // Distinct surfaces must not be near-ties; exact duplicates are fine
            prop_assume!(hits.iter().all(|&(_, t)| t == nearest || t - nearest > 1e-2));

            prop_assert!(traced.is_some(), "missed a crossing at t = {}", nearest);
            let hit = traced.unwrap();
            prop_assert!(
                (hit.t - nearest).abs() <= 1e-3 * nearest.max(1.0),
                "t = {} but nearest crossing is {}", hit.t, nearest
            );

            // Earliest primitive among the nearest wins
            let winner = hits.iter().find(|&&(_, t)| t == nearest).map(|&(i, _)| i).unwrap();
            prop_assert_eq!(color_of(&hit), Vec3::splat(winner as f32));
        }
    }
}
