//! Direct lighting with hard shadows.
//!
//! Final color = base color × (ambient + Σ light contributions). Each light
//! is gated by one shadow ray; nothing here clamps, that happens on output.

use glint_core::{Color, Light, LightKind};
use glint_math::{Ray, Vec3};

use crate::{HitRecord, RayQuery};

/// Offset applied to shadow ray origins along the surface normal, and the
/// lower bound of the shadow ray range.
pub const SHADOW_EPSILON: f32 = 1e-4;

/// Shade a hit point under `lights`.
///
/// Disabled lights are skipped without casting a shadow ray.
pub fn shade(hit: &HitRecord, lights: &[Light], ambient: Color, query: &dyn RayQuery) -> Color {
    let base = hit.material.base_color(hit.uv);
    let direct: Color = lights
        .iter()
        .filter(|light| light.enabled)
        .map(|light| light_contribution(hit, light, query))
        .sum();
    base * (ambient + direct)
}

/// Radiance one light delivers to a hit point, including its shadow test.
pub fn light_contribution(hit: &HitRecord, light: &Light, query: &dyn RayQuery) -> Color {
    let radiance = light.color * light.intensity;

    match light.kind {
        LightKind::Directional => {
            let to_light = -light.forward();
            let dot = to_light.dot(hit.normal);
            if dot <= 0.0 || shadowed(hit, to_light, f32::INFINITY, query) {
                return Color::ZERO;
            }
            radiance * dot
        }
        LightKind::Point { range } => {
            let Some((direction, distance, dot)) = facing_in_range(hit, light.position(), range)
            else {
                return Color::ZERO;
            };
            if shadowed(hit, direction, distance, query) {
                return Color::ZERO;
            }
            radiance * dot * range_falloff(distance, range)
        }
        LightKind::Spot {
            range,
            cone_half_angle,
        } => {
            let Some((direction, distance, dot)) = facing_in_range(hit, light.position(), range)
            else {
                return Color::ZERO;
            };
            let cone = spot_factor((-light.forward()).dot(direction), cone_half_angle);
            // Outside the cone: no shadow ray
            if cone <= 0.0 || shadowed(hit, direction, distance, query) {
                return Color::ZERO;
            }
            radiance * dot * range_falloff(distance, range) * cone
        }
    }
}

/// Linear falloff: 1 at the light, 0 at `range` and beyond.
pub fn range_falloff(distance: f32, range: f32) -> f32 {
    if range <= 0.0 || distance >= range {
        0.0
    } else {
        1.0 - distance / range
    }
}

/// Spot cone weight for `cone_dot`, the cosine between the spot axis
/// (reversed) and the direction from the surface to the light.
///
/// The cone edge sits at `1 - cone_half_angle / 180`. The weight rises
/// linearly from 0 at the edge to 1 on the axis and is 0 outside.
pub fn spot_factor(cone_dot: f32, cone_half_angle: f32) -> f32 {
    let threshold = 1.0 - cone_half_angle / 180.0;
    if threshold >= 1.0 || cone_dot <= threshold {
        return 0.0;
    }
    ((cone_dot - threshold) / (1.0 - threshold)).clamp(0.0, 1.0)
}

/// Direction and distance to a positional light, plus the cosine term, if
/// the light is in range and in front of the surface.
fn facing_in_range(hit: &HitRecord, position: Vec3, range: f32) -> Option<(Vec3, f32, f32)> {
    let offset = position - hit.point;
    let distance = offset.length();
    if distance >= range {
        return None;
    }
    let direction = offset.normalize_or_zero();
    let dot = direction.dot(hit.normal);
    (dot > 0.0).then_some((direction, distance, dot))
}

fn shadowed(hit: &HitRecord, direction: Vec3, max_distance: f32, query: &dyn RayQuery) -> bool {
    let ray = Ray::offset_from(hit.point, hit.normal, direction, SHADOW_EPSILON);
    query.occluded(&ray, max_distance)
}
