//! Render parameters and mode selection.
//!
//! These are the knobs a host application exposes to the user. They are
//! validated once before a frame starts; nothing in the per-pixel path checks
//! them again.

use clap::ValueEnum;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{check_range, check_unit_color, RenderError, Result};

/// Which algorithm renders the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Sphere tracing over the signed distance field with soft shadows and glow.
    RayMarch,
    /// Analytic intersection with direct lighting and metal reflections.
    #[default]
    PathTrace,
}

impl RenderMode {
    /// Short label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RayMarch => "ray-march",
            Self::PathTrace => "path-trace",
        }
    }
}

/// Tunables shared by both render modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParameters {
    /// Penumbra sharpness of marched soft shadows, in [1, 16].
    pub soft_shadow_strength: f32,
    /// Specular mix of the marcher's Phong highlight, in [0, 1].
    pub specular: f32,
    /// Glow brightness, in [0, 2].
    pub glow_strength: f32,
    /// Number of marching steps that contribute glow, in [0, 200]. Zero disables glow.
    pub glow_cutoff: u32,
    /// Glow colour.
    pub glow_color: Vec3,
    /// Marching convergence threshold, in (0.0001, 1].
    pub surface_distance: f32,
    /// Ground colour in ray-march mode.
    pub albedo: Vec3,
    /// Maximum number of metal reflections per path, in [0, 10].
    pub bounces: u32,
    /// Path-traced samples averaged per pixel, in [1, 10].
    pub samples_per_pixel: u32,
    /// Scale of direct diffuse lighting in the path tracer, in [0, 2].
    pub albedo_strength: f32,
    /// Scale applied to specular throughput per reflection, in [0, 1].
    pub specular_strength: f32,
    /// Step budget for a single march.
    pub max_march_steps: u32,
    /// Distance beyond which a march counts as escaped.
    pub max_distance: f32,
    /// Phong exponent of the marcher highlight.
    pub shininess: f32,
    /// Seed of the per-pixel sample streams.
    pub seed: u64,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            soft_shadow_strength: 2.0,
            specular: 0.1,
            glow_strength: 1.0,
            glow_cutoff: 0,
            glow_color: Vec3::new(1.0, 0.0, 1.0),
            surface_distance: 0.001,
            albedo: Vec3::splat(0.5),
            bounces: 5,
            samples_per_pixel: 1,
            albedo_strength: 0.5,
            specular_strength: 0.5,
            max_march_steps: 256,
            max_distance: 100.0,
            shininess: 32.0,
            seed: 0,
        }
    }
}

impl RenderParameters {
    /// Reject any parameter outside its domain.
    pub fn validate(&self) -> Result<()> {
        check_range("soft_shadow_strength", self.soft_shadow_strength, 1.0, 16.0)?;
        check_range("specular", self.specular, 0.0, 1.0)?;
        check_range("glow_strength", self.glow_strength, 0.0, 2.0)?;
        check_count("glow_cutoff", self.glow_cutoff, 0, 200)?;
        check_unit_color("glow_color", self.glow_color)?;

        check_range("surface_distance", self.surface_distance, 0.0001, 1.0)?;
        if self.surface_distance <= 0.0001 {
            return Err(RenderError::degenerate(
                "surface_distance",
                format!("must be > 0.0001, got {}", self.surface_distance),
            ));
        }

        check_unit_color("albedo", self.albedo)?;
        check_count("bounces", self.bounces, 0, 10)?;
        check_count("samples_per_pixel", self.samples_per_pixel, 1, 10)?;
        check_range("albedo_strength", self.albedo_strength, 0.0, 2.0)?;
        check_range("specular_strength", self.specular_strength, 0.0, 1.0)?;
        check_count("max_march_steps", self.max_march_steps, 1, u32::MAX)?;
        check_range("max_distance", self.max_distance, f32::MIN_POSITIVE, f32::MAX)?;
        check_range("shininess", self.shininess, 1.0, f32::MAX)
    }
}

fn check_count(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(RenderError::degenerate(
            name,
            format!("must lie in [{min}, {max}], got {value}"),
        ));
    }
    Ok(())
}
