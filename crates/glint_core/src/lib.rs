//! Glint Core - scene model for the Glint ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: [`Mesh`] with generators for planes, cubes and UV spheres
//! - **Materials**: flat colors or bilinearly sampled [`Texture`]s
//! - **Lights**: directional, point and spot [`Light`]s with poses
//! - **Scenes**: [`Scene`] plus a JSON description format for loading them
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let (scene, camera) = load_scene("scenes/room.json")?;
//! println!("{} objects, {} lights", scene.object_count(), scene.light_count());
//! ```

pub mod description;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use description::{load_scene, SceneDescription, SceneError, SceneResult};
pub use light::{Light, LightKind};
pub use material::{Color, Material};
pub use mesh::Mesh;
pub use scene::{Scene, SceneObject, Transform};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
