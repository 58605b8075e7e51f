//! Glint Renderer - direct-lighting ray tracing
//!
//! One ray per pixel against a flat list of proxy primitives, shaded with
//! directional, point and spot lights and hard shadows. Two paths share the
//! per-pixel routine:
//!
//! - [`render_frame`]: synchronous, single-threaded, one frame per call
//! - [`ProgressiveAccumulator`]: jittered passes on a parallel
//!   [`KernelLaunch`], averaged until the camera or a light moves
//!
//! # Example
//!
//! ```ignore
//! use glint_renderer::{prepare_geometry, Intersector, ProxyShape, RenderConfig, SceneSnapshot};
//!
//! let primitives = prepare_geometry(&scene, ProxyShape::ConvexHull);
//! let intersector = Intersector::new(&primitives);
//! let snapshot = SceneSnapshot::new(&intersector, &scene);
//! let frame = glint_renderer::render_frame(&camera, &snapshot, (640, 360), &RenderConfig::default())?;
//! frame.to_image().save("out.png")?;
//! ```

mod accumulator;
mod bucket;
mod camera;
mod error;
mod geometry;
mod hittable;
mod hull;
mod intersector;
mod kernel;
mod renderer;
mod shader;
mod tracer;
mod triangle;

pub use accumulator::{AccumulatorConfig, ProgressiveAccumulator};
pub use bucket::{generate_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::RayCamera;
pub use error::{RenderError, RenderResult};
pub use geometry::{prepare_geometry, Layer, LayerMask, Primitive, ProxyShape};
pub use hittable::{HitRecord, RayQuery};
pub use hull::convex_hull;
pub use intersector::Intersector;
pub use kernel::{kernel_by_name, BucketKernel, KernelLaunch, PixelKernel, RayonKernel, SerialKernel};
pub use renderer::{
    color_to_rgba, linear_to_srgb, render_frame, trace_pixel, FrameBuffer, RenderConfig, RenderMode,
    SceneSnapshot,
};
pub use shader::{light_contribution, range_falloff, shade, spot_factor, SHADOW_EPSILON};
pub use tracer::RayTracer;
pub use triangle::Triangle;

/// Re-export the shared math and scene types
pub use glint_core::{Color, Light, LightKind, Material, Scene};
pub use glint_math::{Camera, Interval, Pose, Ray, Vec2, Vec3};
