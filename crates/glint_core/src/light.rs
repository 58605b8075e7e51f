//! Light sources.
//!
//! Lights are plain values. Hosts mutate them between frames (moving,
//! dimming, toggling) and hand a snapshot to each render call.

use glint_math::{Pose, Vec3};
use serde::{Deserialize, Serialize};

use crate::Color;

/// Light type and its type-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    /// Parallel rays along the pose's forward axis; position is ignored.
    Directional,
    /// Omnidirectional, attenuating linearly to zero at `range`.
    Point { range: f32 },
    /// Point light restricted to a cone around the forward axis.
    /// `cone_half_angle` is in degrees, measured from the axis.
    Spot { range: f32, cone_half_angle: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub pose: Pose,
    pub color: Color,
    pub intensity: f32,
    /// Disabled lights are skipped entirely by the shader.
    pub enabled: bool,
}

impl Light {
    pub fn new(kind: LightKind, pose: Pose, color: Color, intensity: f32) -> Self {
        Self {
            kind,
            pose,
            color,
            intensity,
            enabled: true,
        }
    }

    /// Directional light shining along `forward`.
    pub fn directional(forward: Vec3, color: Color, intensity: f32) -> Self {
        let pose = Pose::IDENTITY.with_forward(forward);
        Self::new(LightKind::Directional, pose, color, intensity)
    }

    pub fn point(position: Vec3, range: f32, color: Color, intensity: f32) -> Self {
        Self::new(
            LightKind::Point { range },
            Pose::from_position(position),
            color,
            intensity,
        )
    }

    /// Spot light at `position` aimed along `forward`.
    pub fn spot(
        position: Vec3,
        forward: Vec3,
        range: f32,
        cone_half_angle: f32,
        color: Color,
        intensity: f32,
    ) -> Self {
        Self::new(
            LightKind::Spot {
                range,
                cone_half_angle,
            },
            Pose::from_position(position).with_forward(forward),
            color,
            intensity,
        )
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Direction the light travels in.
    pub fn forward(&self) -> Vec3 {
        self.pose.forward()
    }

    /// Attenuation range, `None` for directional lights.
    pub fn range(&self) -> Option<f32> {
        match self.kind {
            LightKind::Directional => None,
            LightKind::Point { range } | LightKind::Spot { range, .. } => Some(range),
        }
    }
}
