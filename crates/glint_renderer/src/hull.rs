//! Incremental 3D convex hull.
//!
//! Hull faces reference the input points by index, so callers can keep
//! per-vertex attributes (texture coordinates) attached to the hull.

use std::collections::HashSet;

use glint_math::{Aabb, Vec3};

/// Relative tolerance for coplanarity, scaled by the point cloud's extent.
const HULL_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug)]
struct Face {
    indices: [usize; 3],
    normal: Vec3,
    offset: f32,
}

impl Face {
    fn new(points: &[Vec3], indices: [usize; 3]) -> Self {
        let [a, b, c] = indices.map(|i| points[i]);
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self {
            indices,
            normal,
            offset: normal.dot(a),
        }
    }

    /// Signed distance of a point above the face plane.
    fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }

    fn flipped(&self, points: &[Vec3]) -> Self {
        let [a, b, c] = self.indices;
        Self::new(points, [a, c, b])
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Convex hull of `points` as counter-clockwise, outward-facing index
/// triplets.
///
/// Returns `None` when the points are degenerate (fewer than four, all
/// coincident, collinear or coplanar), since such a set has no volume.
pub fn convex_hull(points: &[Vec3]) -> Option<Vec<[u32; 3]>> {
    if points.len() < 4 {
        return None;
    }

    let extent = Aabb::from_points_iter(points.iter().copied()).diagonal();
    let eps = HULL_EPSILON * extent.max(1e-3);

    let [i0, i1, i2, i3] = initial_simplex(points, eps)?;

    let interior = (points[i0] + points[i1] + points[i2] + points[i3]) * 0.25;
    let mut faces: Vec<Face> = [[i0, i1, i2], [i0, i1, i3], [i0, i2, i3], [i1, i2, i3]]
        .into_iter()
        .map(|indices| {
            let face = Face::new(points, indices);
            if face.distance(interior) > 0.0 {
                face.flipped(points)
            } else {
                face
            }
        })
        .collect();

    for (index, &point) in points.iter().enumerate() {
        if [i0, i1, i2, i3].contains(&index) {
            continue;
        }

        let (visible, hidden): (Vec<Face>, Vec<Face>) = std::mem::take(&mut faces)
            .into_iter()
            .partition(|face| face.distance(point) > eps);
        faces = hidden;
        if visible.is_empty() {
            continue;
        }

        let visible_edges: HashSet<(usize, usize)> =
            visible.iter().flat_map(|face| face.edges()).collect();

        for face in &visible {
            for (a, b) in face.edges() {
                // Horizon edges border exactly one visible face.
                if !visible_edges.contains(&(b, a)) {
                    faces.push(Face::new(points, [a, b, index]));
                }
            }
        }
    }

    Some(
        faces
            .iter()
            .map(|face| face.indices.map(|i| i as u32))
            .collect(),
    )
}

/// Four affinely independent points, or `None` if there are none.
fn initial_simplex(points: &[Vec3], eps: f32) -> Option<[usize; 4]> {
    let (i0, _) = best_by(points, |p| -p.x);
    let p0 = points[i0];

    let (i1, d1) = best_by(points, |p| p.distance(p0));
    if d1 <= eps {
        return None;
    }
    let axis = (points[i1] - p0).normalize();

    let (i2, d2) = best_by(points, |p| axis.cross(p - p0).length());
    if d2 <= eps {
        return None;
    }
    let normal = axis.cross(points[i2] - p0).normalize();

    let (i3, d3) = best_by(points, |p| normal.dot(p - p0).abs());
    if d3 <= eps {
        return None;
    }

    Some([i0, i1, i2, i3])
}

/// Index and score of the highest-scoring point; the first wins ties.
fn best_by(points: &[Vec3], score: impl Fn(Vec3) -> f32) -> (usize, f32) {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (i, score(p)))
        .fold((0, f32::NEG_INFINITY), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}
