//! Glint math types.
//!
//! Re-exports glam and adds the small set of ray-tracing types shared by the
//! scene model and the renderer: rays, parameter intervals, bounding boxes,
//! poses and the perspective camera.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod camera;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Mat4Ext, Pose};
