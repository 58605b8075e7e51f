//! JSON scene descriptions.
//!
//! A description names a camera, an ambient term, objects built from simple
//! shapes or inline meshes, and lights:
//!
//! ```json
//! {
//!   "camera": { "position": [0, 2, 6], "target": [0, 0.5, 0], "fov_degrees": 50 },
//!   "environment": "sky.png",
//!   "objects": [
//!     { "name": "floor", "shape": { "type": "plane", "size": 10 },
//!       "material": { "type": "checker", "cells": 8 } },
//!     { "name": "box", "shape": { "type": "cube", "size": 1 },
//!       "transform": { "translation": [0, 0.5, 0] },
//!       "material": { "type": "flat", "color": [0.8, 0.2, 0.2] } }
//!   ],
//!   "lights": [
//!     { "type": "spot", "range": 12, "cone_half_angle": 30,
//!       "position": [0, 5, 0], "rotation_degrees": [-90, 0, 0] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::{Camera, EulerRot, Pose, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::DEFAULT_AMBIENT;
use crate::{
    Color, Light, LightKind, Material, Mesh, Scene, SceneObject, Texture, TextureCache,
    TextureError, Transform,
};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("Object '{object}': {reason}")]
    InvalidObject { object: String, reason: String },

    #[error("Light {index}: {reason}")]
    InvalidLight { index: usize, reason: String },

    #[error("Camera: {0}")]
    InvalidCamera(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,
    pub camera: CameraDescription,
    #[serde(default = "default_ambient")]
    pub ambient: Vec3,
    /// Equirectangular sky image, relative to the scene file
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDescription {
    pub position: Vec3,
    pub target: Vec3,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    pub shape: ShapeDescription,
    #[serde(default)]
    pub transform: TransformDescription,
    #[serde(default)]
    pub material: MaterialDescription,
    #[serde(default = "default_true")]
    pub renderable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Plane {
        size: f32,
    },
    Cube {
        size: f32,
    },
    Sphere {
        radius: f32,
        #[serde(default = "default_segments")]
        segments: u32,
        #[serde(default = "default_rings")]
        rings: u32,
    },
    Mesh {
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        #[serde(default)]
        uvs: Option<Vec<Vec2>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDescription {
    pub translation: Vec3,
    /// Euler angles in degrees: pitch (X), yaw (Y), roll (Z)
    pub rotation_degrees: Vec3,
    pub scale: Vec3,
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Flat {
        color: Color,
    },
    /// Image file, relative to the scene file
    Texture {
        path: String,
    },
    Checker {
        #[serde(default = "default_cells")]
        cells: u32,
        #[serde(default = "default_checker_a")]
        a: Color,
        #[serde(default = "default_checker_b")]
        b: Color,
    },
}

impl Default for MaterialDescription {
    fn default() -> Self {
        MaterialDescription::Flat {
            color: Color::splat(0.5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightDescription {
    #[serde(flatten)]
    pub kind: LightKind,
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in degrees; zero rotation shines down -Z
    #[serde(default)]
    pub rotation_degrees: Vec3,
    #[serde(default = "default_white")]
    pub color: Color,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_ambient() -> Vec3 {
    DEFAULT_AMBIENT
}
fn default_fov() -> f32 {
    60.0
}
fn default_true() -> bool {
    true
}
fn default_segments() -> u32 {
    24
}
fn default_rings() -> u32 {
    16
}
fn default_cells() -> u32 {
    8
}
fn default_checker_a() -> Color {
    Color::splat(0.9)
}
fn default_checker_b() -> Color {
    Color::splat(0.2)
}
fn default_white() -> Color {
    Color::ONE
}
fn default_intensity() -> f32 {
    1.0
}

/// Resolution of the procedural checker texture.
const CHECKER_SIZE: u32 = 256;

impl SceneDescription {
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Build the scene and camera, loading textures through `textures`.
    pub fn build(&self, textures: &mut TextureCache) -> SceneResult<(Scene, Camera)> {
        if (self.camera.target - self.camera.position).length_squared() == 0.0 {
            return Err(SceneError::InvalidCamera(
                "position and target coincide".to_string(),
            ));
        }

        let mut scene = Scene::new(self.name.clone()).with_ambient(self.ambient);
        if let Some(path) = &self.environment {
            scene.environment = Some(textures.load(path)?);
        }

        for object in &self.objects {
            scene.add_object(object.build(textures)?);
        }
        for (index, light) in self.lights.iter().enumerate() {
            scene.add_light(light.build(index)?);
        }

        let camera = Camera::new(self.camera.position, self.camera.target)
            .with_fov_degrees(self.camera.fov_degrees);

        log::info!(
            "Built scene '{}': {} objects, {} triangles, {} lights",
            scene.name,
            scene.object_count(),
            scene.total_triangle_count(),
            scene.light_count()
        );

        Ok((scene, camera))
    }
}

impl ObjectDescription {
    fn build(&self, textures: &mut TextureCache) -> SceneResult<SceneObject> {
        let invalid = |reason: String| SceneError::InvalidObject {
            object: self.name.clone(),
            reason,
        };

        let mesh = match &self.shape {
            ShapeDescription::Plane { size } => Mesh::plane(*size),
            ShapeDescription::Cube { size } => Mesh::cube(*size),
            ShapeDescription::Sphere {
                radius,
                segments,
                rings,
            } => Mesh::uv_sphere(*radius, *segments, *rings),
            ShapeDescription::Mesh {
                positions,
                indices,
                uvs,
            } => {
                if indices.len() % 3 != 0 {
                    return Err(invalid(format!(
                        "index count {} is not a multiple of 3",
                        indices.len()
                    )));
                }
                let mut mesh = Mesh::new(positions.clone(), indices.clone());
                if let Some(index) = mesh.find_invalid_index() {
                    return Err(invalid(format!(
                        "index {index} out of range for {} vertices",
                        positions.len()
                    )));
                }
                if let Some(uvs) = uvs {
                    if uvs.len() != positions.len() {
                        return Err(invalid(format!(
                            "{} UVs for {} vertices",
                            uvs.len(),
                            positions.len()
                        )));
                    }
                    mesh = mesh.with_uvs(uvs.clone());
                }
                mesh
            }
        };

        let material = match &self.material {
            MaterialDescription::Flat { color } => Material::flat(*color),
            MaterialDescription::Texture { path } => Material::textured(textures.load(path)?),
            MaterialDescription::Checker { cells, a, b } => {
                Material::textured(Arc::new(Texture::checkerboard(CHECKER_SIZE, *cells, *a, *b)))
            }
        };

        let transform = Transform {
            translation: self.transform.translation,
            rotation: euler_degrees(self.transform.rotation_degrees),
            scale: self.transform.scale,
        };

        Ok(SceneObject::new(self.name.clone(), Arc::new(mesh), material)
            .with_transform(transform)
            .with_renderable(self.renderable))
    }
}

impl LightDescription {
    fn build(&self, index: usize) -> SceneResult<Light> {
        let invalid = |reason: &str| SceneError::InvalidLight {
            index,
            reason: reason.to_string(),
        };

        match self.kind {
            LightKind::Directional => {}
            LightKind::Point { range } => {
                if range <= 0.0 {
                    return Err(invalid("range must be positive"));
                }
            }
            LightKind::Spot {
                range,
                cone_half_angle,
            } => {
                if range <= 0.0 {
                    return Err(invalid("range must be positive"));
                }
                if !(cone_half_angle > 0.0 && cone_half_angle <= 180.0) {
                    return Err(invalid("cone_half_angle must be in (0, 180]"));
                }
            }
        }

        let pose = Pose::new(self.position, euler_degrees(self.rotation_degrees));
        Ok(Light::new(self.kind, pose, self.color, self.intensity).with_enabled(self.enabled))
    }
}

/// Same convention as [`Pose::from_euler_degrees`].
fn euler_degrees(degrees: Vec3) -> Quat {
    let radians = degrees * std::f32::consts::PI / 180.0;
    Quat::from_euler(EulerRot::YXZ, radians.y, radians.x, radians.z)
}

/// Load a scene file, resolving texture paths relative to it.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<(Scene, Camera)> {
    let path = path.as_ref();
    let description = SceneDescription::load(path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    description.build(&mut TextureCache::with_base_dir(base_dir))
}
