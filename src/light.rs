//! Directional light source.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{check_range, check_unit_color, RenderError, Result};

/// Infinitely distant light shining along `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Unit vector the light travels along (from the light toward the scene).
    pub direction: Vec3,
    /// Light colour, each channel in [0, 1].
    pub color: Vec3,
    /// Non-negative intensity multiplier.
    pub intensity: f32,
}

impl DirectionalLight {
    /// Build a validated light, normalizing `direction`.
    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Result<Self> {
        let direction = direction.try_normalize().ok_or_else(|| {
            RenderError::degenerate("light.direction", format!("cannot normalize {direction}"))
        })?;
        let light = Self {
            direction,
            color,
            intensity,
        };
        light.validate()?;
        Ok(light)
    }

    /// Check the light invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.direction.is_normalized() {
            return Err(RenderError::degenerate(
                "light.direction",
                format!("must be a unit vector, got {}", self.direction),
            ));
        }
        check_unit_color("light.color", self.color)?;
        check_range("light.intensity", self.intensity, 0.0, f32::MAX)
    }

    /// Unit vector from a surface point toward the light.
    pub fn to_light(&self) -> Vec3 {
        -self.direction
    }

    /// Colour scaled by intensity.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        // Late afternoon sun coming down over the sphere field.
        Self {
            direction: Vec3::new(0.5, -1.0, 0.7).normalize(),
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_direction() {
        let light = DirectionalLight::new(Vec3::new(0.0, -4.0, 0.0), Vec3::ONE, 1.5).unwrap();
        assert_eq!(light.direction, Vec3::NEG_Y);
        assert_eq!(light.to_light(), Vec3::Y);
        assert_eq!(light.radiance(), Vec3::splat(1.5));
    }

    #[test]
    fn rejects_degenerate_lights() {
        assert!(DirectionalLight::new(Vec3::ZERO, Vec3::ONE, 1.0).is_err());
        assert!(DirectionalLight::new(Vec3::Y, Vec3::new(-0.1, 0.5, 0.5), 1.0).is_err());
        assert!(DirectionalLight::new(Vec3::Y, Vec3::ONE, -1.0).is_err());
        assert!(DirectionalLight::new(Vec3::Y, Vec3::ONE, f32::NAN).is_err());
    }

    #[test]
    fn default_light_is_valid() {
        assert!(DirectionalLight::default().validate().is_ok());
    }
}
