//! Environment lookups for rays that leave the scene.

use std::f32::consts::PI;

use glam::Vec3;
use image::Rgb32FImage;

use crate::error::{RenderError, Result};

/// Radiance arriving from infinitely far away along a direction.
///
/// Implementations are read concurrently by every render thread.
pub trait Skybox: Send + Sync {
    /// Radiance seen when looking along the unit vector `direction`.
    fn sample(&self, direction: Vec3) -> Vec3;
}

/// Same colour in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSky(pub Vec3);

impl Skybox for UniformSky {
    fn sample(&self, _direction: Vec3) -> Vec3 {
        self.0
    }
}

/// Vertical blend from a horizon colour (looking down) to a zenith colour (looking up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientSky {
    /// Colour at `direction.y == -1`.
    pub horizon: Vec3,
    /// Colour at `direction.y == 1`.
    pub zenith: Vec3,
}

impl Default for GradientSky {
    fn default() -> Self {
        Self {
            horizon: Vec3::ONE,
            zenith: Vec3::new(0.5, 0.7, 1.0),
        }
    }
}

impl Skybox for GradientSky {
    fn sample(&self, direction: Vec3) -> Vec3 {
        let a = 0.5 * (direction.y.clamp(-1.0, 1.0) + 1.0);
        self.horizon.lerp(self.zenith, a)
    }
}

/// Equirectangular environment map held in memory.
///
/// Rows map to the polar angle (row 0 straight up), columns to the azimuth
/// measured from -Z.
#[derive(Debug, Clone)]
pub struct EquirectSkybox {
    image: Rgb32FImage,
}

impl EquirectSkybox {
    /// Wrap a linear float image. Fails on an empty image.
    pub fn new(image: Rgb32FImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RenderError::degenerate("skybox", "image must not be empty"));
        }
        Ok(Self { image })
    }

    /// Texture coordinates in [0, 1)² for a unit direction.
    pub fn uv(direction: Vec3) -> (f32, f32) {
        let theta = direction.y.clamp(-1.0, 1.0).acos() / PI;
        let phi = direction.x.atan2(-direction.z) / (-2.0 * PI);
        (phi.rem_euclid(1.0), theta)
    }
}

impl Skybox for EquirectSkybox {
    fn sample(&self, direction: Vec3) -> Vec3 {
        let (u, v) = Self::uv(direction);
        let (w, h) = self.image.dimensions();
        let x = ((u * w as f32) as u32).min(w - 1);
        let y = ((v * h as f32) as u32).min(h - 1);
        let p = self.image.get_pixel(x, y);
        Vec3::new(p[0], p[1], p[2])
    }
}
