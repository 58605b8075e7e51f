//! Built-in scene rendered when no scene file is given.

use std::sync::Arc;

use glint_core::{Color, Light, Material, Mesh, Scene, SceneObject, Texture, Transform};
use glint_math::{Camera, Quat, Vec3};

/// Checkerboard floor, a cube and a sphere under a sun, a point and a spot light.
pub fn demo_scene() -> (Scene, Camera) {
    let mut scene = Scene::new("demo").with_ambient(Color::splat(0.08));

    let checker = Texture::checkerboard(512, 8, Color::splat(0.85), Color::splat(0.15));
    scene.add_object(SceneObject::new(
        "floor",
        Arc::new(Mesh::plane(12.0)),
        Material::textured(Arc::new(checker)),
    ));

    scene.add_object(
        SceneObject::new("cube", Arc::new(Mesh::cube(1.2)), Material::flat(Color::new(0.8, 0.25, 0.2)))
            .with_transform(
                Transform::from_translation(Vec3::new(-1.1, 0.6, 0.0))
                    .with_rotation(Quat::from_rotation_y(35f32.to_radians())),
            ),
    );
    scene.add_object(
        SceneObject::new(
            "sphere",
            Arc::new(Mesh::uv_sphere(0.75, 32, 20)),
            Material::flat(Color::new(0.2, 0.45, 0.85)),
        )
        .with_transform(Transform::from_translation(Vec3::new(1.2, 0.75, 0.4))),
    );
    // Editor gizmo: present in the scene, never traced
    scene.add_object(
        SceneObject::new("light_marker", Arc::new(Mesh::cube(0.2)), Material::flat(Color::ONE))
            .with_transform(Transform::from_translation(Vec3::new(0.0, 3.0, 2.0)))
            .with_renderable(false),
    );

    scene.add_light(Light::directional(
        Vec3::new(-0.4, -1.0, -0.6),
        Color::new(1.0, 0.95, 0.85),
        0.6,
    ));
    scene.add_light(Light::point(Vec3::new(0.0, 3.0, 2.0), 8.0, Color::new(1.0, 0.8, 0.6), 0.8));
    scene.add_light(Light::spot(
        Vec3::new(3.0, 4.0, 3.0),
        Vec3::new(-3.0, -4.0, -3.0),
        12.0,
        25.0,
        Color::new(0.6, 0.7, 1.0),
        1.2,
    ));

    let camera = Camera::new(Vec3::new(0.0, 2.5, 6.0), Vec3::new(0.0, 0.5, 0.0)).with_fov_degrees(45.0);
    (scene, camera)
}
