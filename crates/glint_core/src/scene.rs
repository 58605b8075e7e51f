//! Scene graph types.
//!
//! A scene is a flat list of objects (mesh + transform + material) and a list
//! of lights. Renderers never mutate it; hosts edit lights between frames.

use std::sync::Arc;

use glint_math::{Aabb, Mat4, Quat, Vec3};

use crate::{Color, Light, Material, Mesh, Texture};

/// Ambient term used when a scene does not specify one.
pub const DEFAULT_AMBIENT: Color = Color::splat(0.2);

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A mesh placed in the world.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub transform: Transform,
    pub material: Material,
    /// Only renderable objects get a ray-traceable proxy.
    pub renderable: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: Arc<Mesh>, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform::default(),
            material,
            renderable: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_renderable(mut self, renderable: bool) -> Self {
        self.renderable = renderable;
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// World-space bounding box of the transformed mesh vertices.
    pub fn world_bounds(&self) -> Aabb {
        let matrix = self.model_matrix();
        Aabb::from_points_iter(self.mesh.positions.iter().map(|&p| matrix.transform_point3(p)))
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub name: String,
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    /// Directionless light added to every shaded point, never occluded.
    pub ambient: Color,
    /// Equirectangular sky seen by rays that hit nothing.
    pub environment: Option<Arc<Texture>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: String::new(),
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: DEFAULT_AMBIENT,
            environment: None,
        }
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_environment(mut self, environment: Arc<Texture>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Add an object and return its index.
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Add a light and return its index.
    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Triangles across all renderable objects.
    pub fn total_triangle_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|object| object.renderable)
            .map(|object| object.mesh.triangle_count())
            .sum()
    }

    /// World-space bounding box of every object.
    pub fn world_bounds(&self) -> Aabb {
        self.objects
            .iter()
            .map(SceneObject::world_bounds)
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b))
    }
}
