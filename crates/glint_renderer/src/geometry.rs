//! Ray-traceable proxy geometry.
//!
//! Scene objects are turned into world-space [`Primitive`]s once, before
//! rendering. Each primitive belongs to one [`Layer`]; intersectors only see
//! primitives whose layer is in their [`LayerMask`], which keeps helper
//! geometry out of camera and shadow rays.

use std::time::Instant;

use glint_core::{Material, Mesh, Scene, SceneObject};
use glint_math::{Aabb, Mat4, Mat4Ext, Vec3};
use serde::{Deserialize, Serialize};

use crate::hull::convex_hull;
use crate::Triangle;

/// Collision layer a primitive belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layer(u8);

impl Layer {
    /// Geometry that takes no part in ray tracing.
    pub const DEFAULT: Layer = Layer(0);
    /// Proxies generated for renderable objects.
    pub const TRACEABLE: Layer = Layer(8);

    /// Layers are numbered 0..32.
    pub fn new(index: u8) -> Option<Self> {
        (index < 32).then_some(Layer(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// Set of layers, one bit per layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn only(layer: Layer) -> Self {
        LayerMask(1 << layer.0)
    }

    pub fn with(self, layer: Layer) -> Self {
        LayerMask(self.0 | (1 << layer.0))
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & (1 << layer.0) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::only(Layer::TRACEABLE)
    }
}

/// Shape used for the proxy of each renderable object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyShape {
    /// Convex hull of the mesh vertices. Flat or collinear meshes fall back
    /// to their exact triangles.
    #[default]
    ConvexHull,
    /// The mesh's own triangles.
    Mesh,
}

/// A world-space group of triangles sharing one material.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub name: String,
    pub triangles: Vec<Triangle>,
    pub bounds: Aabb,
    pub material: Material,
    pub layer: Layer,
    /// Proxies never take part in physical collisions.
    pub is_trigger: bool,
}

impl Primitive {
    /// A traceable primitive; bounds are computed from the triangles.
    pub fn new(name: impl Into<String>, triangles: Vec<Triangle>, material: Material) -> Self {
        let bounds = triangles
            .iter()
            .map(Triangle::bounding_box)
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b));
        Self {
            name: name.into(),
            triangles,
            bounds,
            material,
            layer: Layer::TRACEABLE,
            is_trigger: true,
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    /// Proxy for a scene object, in world space.
    ///
    /// Returns the primitive and whether a requested hull had to fall back
    /// to the exact mesh.
    pub fn from_object(object: &SceneObject, shape: ProxyShape) -> (Self, bool) {
        let mesh = &object.mesh;
        let (indices, fell_back) = match shape {
            ProxyShape::Mesh => (mesh.triangles(), false),
            ProxyShape::ConvexHull => match convex_hull(&mesh.positions) {
                Some(hull) => (hull, false),
                None => (mesh.triangles(), true),
            },
        };

        let matrix = object.model_matrix();
        let triangles = indices
            .into_iter()
            .map(|triangle| world_triangle(mesh, triangle, &matrix))
            .collect();

        (
            Self::new(object.name.clone(), triangles, object.material.clone()),
            fell_back,
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Transform a mesh triangle to world space, carrying its UVs.
///
/// The face normal is taken in object space and mapped by the
/// inverse-transpose, so mirrored transforms keep outward normals.
fn world_triangle(mesh: &Mesh, triangle: [u32; 3], matrix: &Mat4) -> Triangle {
    let [a, b, c] = triangle.map(|i| mesh.positions[i as usize]);
    let object_normal = (b - a).cross(c - a);
    let normal = if object_normal == Vec3::ZERO {
        Vec3::ZERO
    } else {
        matrix.transform_normal3(object_normal)
    };

    Triangle::with_normal(
        matrix.transform_point3(a),
        matrix.transform_point3(b),
        matrix.transform_point3(c),
        triangle.map(|i| mesh.uv(i)),
        normal,
    )
}

/// Build traceable proxies for every renderable object in the scene.
///
/// Objects not flagged renderable get no proxy.
pub fn prepare_geometry(scene: &Scene, shape: ProxyShape) -> Vec<Primitive> {
    let start = Instant::now();
    let mut fallbacks = 0;

    let primitives: Vec<Primitive> = scene
        .objects
        .iter()
        .filter(|object| object.renderable)
        .map(|object| {
            let (primitive, fell_back) = Primitive::from_object(object, shape);
            if fell_back {
                log::debug!("'{}' is flat, using its triangles as the proxy", object.name);
                fallbacks += 1;
            }
            primitive
        })
        .collect();

    let triangles: usize = primitives.iter().map(Primitive::triangle_count).sum();
    log::info!(
        "Prepared {} proxies ({:?}, {} triangles, {} mesh fallbacks) from {} objects in {:.2?}",
        primitives.len(),
        shape,
        triangles,
        fallbacks,
        scene.object_count(),
        start.elapsed()
    );

    primitives
}
