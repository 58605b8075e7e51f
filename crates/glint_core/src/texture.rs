//! Texture loading, caching and bilinear sampling.
//!
//! Textures are stored as linear RGB floats. Sampling uses repeat addressing
//! with texel centers at `(i + 0.5) / width`, so a UV exactly between two
//! texel centers blends them equally.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::{Vec2, Vec3};
use thiserror::Error;

use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture must have non-zero size, got {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("Texture is {width}x{height} but has {actual} pixels")]
    SizeMismatch { width: u32, height: u32, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A 2D image in linear RGB.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    /// Row-major, row 0 at v = 1 (top of the image)
    pixels: Vec<Color>,
    /// Where the texture came from (for debugging)
    pub path: String,
}

impl Texture {
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Color>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            path: path.into(),
        })
    }

    /// 1x1 texture of a single color.
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            path: "<solid>".to_string(),
        }
    }

    /// Procedural checkerboard, `cells` squares along each side.
    pub fn checkerboard(size: u32, cells: u32, a: Color, b: Color) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let pixels = (0..size)
            .flat_map(|y| (0..size).map(move |x| if (x / cell + y / cell) % 2 == 0 { a } else { b }))
            .collect();
        Self {
            width: size,
            height: size,
            pixels,
            path: "<checkerboard>".to_string(),
        }
    }

    /// Convert an 8-bit sRGB image to a linear texture.
    pub fn from_rgba8(image: &image::RgbaImage, path: impl Into<String>) -> TextureResult<Self> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|p| Vec3::new(srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])))
            .collect();
        Self::new(width, height, pixels, path)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bilinearly filtered sample with repeat addressing.
    ///
    /// UV (0, 0) is the bottom-left corner of the image.
    pub fn sample(&self, uv: Vec2) -> Color {
        let x = uv.x * self.width as f32 - 0.5;
        let y = (1.0 - uv.y) * self.height as f32 - 0.5;

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let (x0, y0) = (x0 as i64, y0 as i64);
        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x0 + 1, y0);
        let p01 = self.texel(x0, y0 + 1);
        let p11 = self.texel(x0 + 1, y0 + 1);

        let top = p00.lerp(p10, fx);
        let bottom = p01.lerp(p11, fx);
        top.lerp(bottom, fy)
    }

    /// Equirectangular lookup by world direction.
    ///
    /// -Z maps to the horizontal center of the image and +X a quarter turn
    /// right of it; +Y is the top row.
    pub fn sample_direction(&self, direction: Vec3) -> Color {
        let d = direction.normalize_or_zero();
        let u = 0.5 + d.x.atan2(-d.z) / TAU;
        let v = 1.0 - d.y.clamp(-1.0, 1.0).acos() / PI;
        self.sample(Vec2::new(u, v))
    }

    /// Texel at integer coordinates, wrapped into range.
    fn texel(&self, x: i64, y: i64) -> Color {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Approximate size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Color>()
    }
}

/// Cache for loaded textures.
///
/// Textures are loaded on demand and shared between materials that name the
/// same file.
pub struct TextureCache {
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Register an in-memory texture under a name.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(name.into(), texture.clone());
        texture
    }

    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Texture::from_rgba8(&img.to_rgba8(), path.to_string_lossy())
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
