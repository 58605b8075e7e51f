//! Surface materials.

use std::sync::Arc;

use glint_math::{Vec2, Vec3};

use crate::Texture;

/// Linear RGB color. Channels are unbounded; clamping happens on output.
pub type Color = Vec3;

/// What a surface looks like: a flat color or a texture lookup.
#[derive(Clone, Debug)]
pub enum Material {
    Flat(Color),
    Textured(Arc<Texture>),
}

impl Material {
    pub fn flat(color: Color) -> Self {
        Material::Flat(color)
    }

    pub fn textured(texture: Arc<Texture>) -> Self {
        Material::Textured(texture)
    }

    /// Base color at a texture coordinate.
    pub fn base_color(&self, uv: Vec2) -> Color {
        match self {
            Material::Flat(color) => *color,
            Material::Textured(texture) => texture.sample(uv),
        }
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, Material::Textured(_))
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Flat(Color::splat(0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ignores_uv() {
        let material = Material::flat(Color::new(0.2, 0.4, 0.6));
        assert_eq!(material.base_color(Vec2::ZERO), Color::new(0.2, 0.4, 0.6));
        assert_eq!(material.base_color(Vec2::new(0.9, 0.1)), Color::new(0.2, 0.4, 0.6));
        assert!(!material.is_textured());
    }

    #[test]
    fn test_textured_samples_texture() {
        let texture = Arc::new(Texture::checkerboard(2, 2, Color::ONE, Color::ZERO));
        let material = Material::textured(texture);
        assert!(material.is_textured());

        // Texel centers of a 2x2 checker: top-left is `a`, top-right is `b`.
        assert_eq!(material.base_color(Vec2::new(0.25, 0.75)), Color::ONE);
        assert_eq!(material.base_color(Vec2::new(0.75, 0.75)), Color::ZERO);
    }

    #[test]
    fn test_default_is_grey() {
        assert_eq!(Material::default().base_color(Vec2::ZERO), Color::splat(0.5));
    }
}
