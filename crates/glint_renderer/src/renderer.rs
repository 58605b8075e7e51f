//! Synchronous frame renderer.
//!
//! One ray per pixel through the pixel center: intersect, shade, write. The
//! same per-pixel routine backs the parallel kernels.

use std::time::Instant;

use glint_core::{Color, Light, Scene, Texture};
use glint_math::Ray;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::geometry::ProxyShape;
use crate::shader::shade;
use crate::{RayCamera, RayQuery};

/// When the host re-renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Render once when started.
    #[default]
    Static,
    /// Render on every update.
    Live,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output pixels per display pixel along each axis (at least 1)
    pub resolution_scale: u32,
    /// Color of rays that hit nothing, when the scene has no environment
    pub background: Color,
    /// Proxy geometry built for renderable objects
    pub proxy_shape: ProxyShape,
    pub mode: RenderMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution_scale: 1,
            background: Color::ZERO,
            proxy_shape: ProxyShape::default(),
            mode: RenderMode::default(),
        }
    }
}

impl RenderConfig {
    /// Output size for a display size, validating the scale.
    pub fn resolution(&self, display_size: (u32, u32)) -> RenderResult<(u32, u32)> {
        let (width, height) = display_size;
        let invalid = || RenderError::InvalidResolution {
            width,
            height,
            scale: self.resolution_scale,
        };

        if self.resolution_scale == 0 {
            return Err(invalid());
        }
        let scaled_width = width.checked_mul(self.resolution_scale).ok_or_else(invalid)?;
        let scaled_height = height.checked_mul(self.resolution_scale).ok_or_else(invalid)?;
        if scaled_width == 0 || scaled_height == 0 {
            return Err(invalid());
        }
        Ok((scaled_width, scaled_height))
    }
}

/// Everything a render pass reads, borrowed for the pass's duration.
#[derive(Clone, Copy)]
pub struct SceneSnapshot<'a> {
    pub query: &'a dyn RayQuery,
    pub lights: &'a [Light],
    pub ambient: Color,
    pub background: Color,
    /// Sampled by direction on a miss; takes precedence over `background`
    pub environment: Option<&'a Texture>,
}

impl<'a> SceneSnapshot<'a> {
    /// Lights, ambient and environment from `scene`, black background.
    pub fn new(query: &'a dyn RayQuery, scene: &'a Scene) -> Self {
        Self {
            query,
            lights: scene.lights(),
            ambient: scene.ambient,
            background: Color::ZERO,
            environment: scene.environment.as_deref(),
        }
    }

    /// As [`SceneSnapshot::new`], with the background from `config`.
    pub fn from_config(query: &'a dyn RayQuery, scene: &'a Scene, config: &RenderConfig) -> Self {
        Self::new(query, scene).with_background(config.background)
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

/// Image buffer of linear RGB colors, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Raw `f32` RGB triples, e.g. for uploading as a float texture.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to 8-bit sRGB RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba(self.get(x, y)))
        })
    }
}

/// Encode a linear channel value as sRGB.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert a color to 8-bit RGBA, clamping out-of-range channels.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let encode = |c: f32| (255.0 * linear_to_srgb(c.clamp(0.0, 1.0)) + 0.5) as u8;
    [encode(color.x), encode(color.y), encode(color.z), 255]
}

/// Color seen along one primary ray.
pub fn trace_pixel(ray: &Ray, scene: &SceneSnapshot) -> Color {
    match scene.query.trace(ray) {
        Some(hit) => shade(&hit, scene.lights, scene.ambient, scene.query),
        None => match scene.environment {
            Some(sky) => sky.sample_direction(ray.direction()),
            None => scene.background,
        },
    }
}

/// Render one frame on the calling thread.
///
/// The output is `display_size` times `config.resolution_scale`.
pub fn render_frame<C: RayCamera + ?Sized>(
    camera: &C,
    scene: &SceneSnapshot,
    display_size: (u32, u32),
    config: &RenderConfig,
) -> RenderResult<FrameBuffer> {
    let (width, height) = config.resolution(display_size)?;
    let start = Instant::now();
    let mut frame = FrameBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let ray = camera.ray(x as f32 + 0.5, y as f32 + 0.5, width, height);
            frame.set(x, y, trace_pixel(&ray, scene));
        }
    }

    log::debug!("Rendered {}x{} frame in {:.2?}", width, height, start.elapsed());
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::prepare_geometry;
    use crate::{Intersector, ProxyShape};
    use glint_core::{Material, Mesh, SceneObject, Transform};
    use glint_math::{Camera, Vec3};
    use std::sync::Arc;

    /// Red cube in front of the camera, lit head-on.
    fn cube_scene() -> Scene {
        let mut scene = Scene::new("cube").with_ambient(Color::ZERO);
        scene.add_object(
            SceneObject::new("cube", Arc::new(Mesh::cube(2.0)), Material::flat(Color::X))
                .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -5.0))),
        );
        scene.add_light(glint_core::Light::directional(Vec3::NEG_Z, Color::ONE, 1.0));
        scene
    }

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z).with_fov_degrees(60.0)
    }

    #[test]
    fn test_resolution_scale() {
        let config = RenderConfig {
            resolution_scale: 2,
            ..Default::default()
        };
        assert_eq!(config.resolution((320, 200)).unwrap(), (640, 400));

        let zero = RenderConfig {
            resolution_scale: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero.resolution((320, 200)),
            Err(RenderError::InvalidResolution { scale: 0, .. })
        ));
        assert!(RenderConfig::default().resolution((0, 10)).is_err());
        assert!(RenderConfig::default().resolution((u32::MAX, 10)).is_ok());
        assert!(config.resolution((u32::MAX, 10)).is_err());
    }

    #[test]
    fn test_render_frame_hits_and_misses() {
        let scene = cube_scene();
        let primitives = prepare_geometry(&scene, ProxyShape::ConvexHull);
        let intersector = Intersector::new(&primitives);
        let config = RenderConfig {
            background: Color::Z,
            ..Default::default()
        };
        let snapshot = SceneSnapshot::from_config(&intersector, &scene, &config);

        let frame = render_frame(&camera(), &snapshot, (32, 32), &config).unwrap();
        assert_eq!(frame.size(), (32, 32));

        // Center sees the lit red face, corner sees the background
        assert!((frame.get(16, 16) - Color::X).length() < 1e-4);
        assert_eq!(frame.get(0, 0), Color::Z);
    }

    #[test]
    fn test_render_frame_scaled() {
        let scene = cube_scene();
        let primitives = prepare_geometry(&scene, ProxyShape::Mesh);
        let intersector = Intersector::new(&primitives);
        let snapshot = SceneSnapshot::new(&intersector, &scene);
        let config = RenderConfig {
            resolution_scale: 3,
            ..Default::default()
        };

        let frame = render_frame(&camera(), &snapshot, (10, 8), &config).unwrap();
        assert_eq!(frame.size(), (30, 24));
        assert_eq!(frame.pixels.len(), 30 * 24);
    }

    #[test]
    fn test_empty_scene_is_background() {
        let scene = Scene::new("empty");
        let intersector = Intersector::new(&[]);
        let snapshot = SceneSnapshot::new(&intersector, &scene);

        let frame = render_frame(&camera(), &snapshot, (4, 4), &RenderConfig::default()).unwrap();
        assert!(frame.pixels.iter().all(|&c| c == Color::ZERO));
    }

    /// Blue upper hemisphere over a brown lower one.
    fn sky() -> Arc<Texture> {
        let mut pixels = vec![Color::new(0.2, 0.4, 0.9); 4];
        pixels.extend([Color::new(0.3, 0.2, 0.1); 4]);
        Arc::new(Texture::new(1, 8, pixels, "sky").unwrap())
    }

    #[test]
    fn test_misses_sample_the_environment() {
        let scene = cube_scene().with_environment(sky());
        let primitives = prepare_geometry(&scene, ProxyShape::Mesh);
        let intersector = Intersector::new(&primitives);
        let config = RenderConfig {
            background: Color::ONE,
            ..Default::default()
        };
        let snapshot = SceneSnapshot::from_config(&intersector, &scene, &config);

        let up = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.9, -0.4));
        let down = Ray::new(Vec3::ZERO, Vec3::new(0.2, -0.9, 0.3));
        assert!((trace_pixel(&up, &snapshot) - Color::new(0.2, 0.4, 0.9)).length() < 1e-5);
        assert!((trace_pixel(&down, &snapshot) - Color::new(0.3, 0.2, 0.1)).length() < 1e-5);

        // Hits are still shaded normally
        let ahead = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!((trace_pixel(&ahead, &snapshot) - Color::X).length() < 1e-4);
    }

    #[test]
    fn test_snapshot_background_sources() {
        let scene = cube_scene();
        let intersector = Intersector::new(&[]);
        let config = RenderConfig {
            background: Color::Y,
            ..Default::default()
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(trace_pixel(&ray, &SceneSnapshot::new(&intersector, &scene)), Color::ZERO);
        let configured = SceneSnapshot::from_config(&intersector, &scene, &config);
        assert_eq!(trace_pixel(&ray, &configured), Color::Y);
        assert!(configured.environment.is_none());
    }

    #[test]
    fn test_top_down_camera_sees_the_floor() {
        let mut scene = Scene::new("floor").with_ambient(Color::splat(0.5));
        scene.add_object(SceneObject::new(
            "floor",
            Arc::new(Mesh::plane(20.0)),
            Material::flat(Color::ONE),
        ));
        let primitives = prepare_geometry(&scene, ProxyShape::Mesh);
        let intersector = Intersector::new(&primitives);
        let snapshot = SceneSnapshot::new(&intersector, &scene);
        let overhead = Camera::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);

        let frame = render_frame(&overhead, &snapshot, (20, 20), &RenderConfig::default()).unwrap();
        assert!(frame.pixels.iter().all(|&c| (c - Color::splat(0.5)).length() < 1e-5));
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(2.0, -1.0, 1.0)), [255, 0, 255, 255]);
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);

        // Linear 0.5 encodes to about 188 in sRGB
        let mid = color_to_rgba(Color::splat(0.5))[0];
        assert!((186..=189).contains(&mid));
    }

    #[test]
    fn test_frame_buffer_layout() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.set(2, 1, Color::ONE);
        assert_eq!(frame.pixels[5], Color::ONE);
        assert_eq!(frame.get(2, 1), Color::ONE);

        assert_eq!(frame.as_bytes().len(), 3 * 2 * 12);
        assert_eq!(frame.to_rgba8().len(), 3 * 2 * 4);

        let image = frame.to_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{ "resolution_scale": 2 }"#).unwrap();
        assert_eq!(config.resolution_scale, 2);
        assert_eq!(config.proxy_shape, ProxyShape::ConvexHull);
        assert_eq!(config.mode, RenderMode::Static);

        let config: RenderConfig =
            serde_json::from_str(r#"{ "proxy_shape": "mesh", "mode": "live" }"#).unwrap();
        assert_eq!(config.proxy_shape, ProxyShape::Mesh);
        assert_eq!(config.mode, RenderMode::Live);
    }
}
