//! Triangle mesh geometry.
//!
//! Meshes are stored in object space with counter-clockwise winding, so
//! `(v1 - v0) x (v2 - v0)` points out of the surface. World placement comes
//! from the owning scene object's transform.

use std::f32::consts::PI;

use glint_math::{Aabb, Vec2, Vec3};

/// A mesh consisting of vertex positions, optional UVs, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// UV coordinates (optional - one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Object-space bounding box
    pub bounds: Aabb,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points_iter(positions.iter().copied());
        Self {
            positions,
            uvs: None,
            indices,
            bounds,
        }
    }

    /// Attach per-vertex UVs. Ignored (with a warning) if the count does not
    /// match the vertex count.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        if uvs.len() == self.positions.len() {
            self.uvs = Some(uvs);
        } else {
            log::warn!(
                "UV count ({}) doesn't match vertex count ({}), dropping UVs",
                uvs.len(),
                self.positions.len()
            );
        }
        self
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// UV of a vertex, or zero for meshes without UVs.
    pub fn uv(&self, index: u32) -> Vec2 {
        self.uvs
            .as_ref()
            .and_then(|uvs| uvs.get(index as usize))
            .copied()
            .unwrap_or(Vec2::ZERO)
    }

    /// Index triplets of every well-formed triangle.
    ///
    /// Triangles referencing missing vertices are skipped with a warning.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let vertex_count = self.positions.len();
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let triangle = [chunk[0], chunk[1], chunk[2]];
            if triangle.iter().any(|&i| i as usize >= vertex_count) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    triangle,
                    vertex_count
                );
                continue;
            }
            triangles.push(triangle);
        }

        triangles
    }

    /// First out-of-range index, if any.
    pub fn find_invalid_index(&self) -> Option<u32> {
        self.indices
            .iter()
            .copied()
            .find(|&i| i as usize >= self.positions.len())
    }

    /// Square in the XZ plane centered at the origin, facing +Y.
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, h),
            Vec3::new(h, 0.0, -h),
            Vec3::new(-h, 0.0, -h),
        ];
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        Mesh::new(positions, vec![0, 1, 2, 0, 2, 3]).with_uvs(uvs)
    }

    /// Axis-aligned cube centered at the origin, each face with its own UVs.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, u axis, v axis) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let base = positions.len() as u32;
            let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
            for (su, sv) in corners {
                positions.push((normal + u * su + v * sv) * h);
                uvs.push(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Mesh::new(positions, indices).with_uvs(uvs)
    }

    /// Latitude/longitude sphere centered at the origin.
    ///
    /// `segments` counts longitude steps, `rings` latitude steps; both are
    /// raised to sensible minimums.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
        let mut uvs = Vec::with_capacity(positions.capacity());

        for i in 0..=rings {
            let theta = PI * i as f32 / rings as f32;
            for j in 0..=segments {
                let phi = 2.0 * PI * j as f32 / segments as f32;
                let direction = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                positions.push(direction * radius);
                uvs.push(Vec2::new(
                    j as f32 / segments as f32,
                    1.0 - i as f32 / rings as f32,
                ));
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::new();
        for i in 0..rings {
            for j in 0..segments {
                let a = i * stride + j;
                let b = a + stride;
                // The pole rows collapse one triangle of each quad.
                if i != rings - 1 {
                    indices.extend_from_slice(&[a, b + 1, b]);
                }
                if i != 0 {
                    indices.extend_from_slice(&[a, a + 1, b + 1]);
                }
            }
        }

        Mesh::new(positions, indices).with_uvs(uvs)
    }
}
