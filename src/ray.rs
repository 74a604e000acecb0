//! Ray representation for marching and tracing.
//!
//! A ray is defined as r(t) = origin + t * direction, representing a semi-infinite
//! line in 3D space. The core expects unit directions so that `t` is a distance.

use glam::Vec3;

use crate::error::{RenderError, Result};

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position for primary rays, or a surface point nudged along
    /// its normal for shadow and reflection rays.
    pub origin: Vec3,

    /// Unit direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an already normalized direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray, normalizing `direction`.
    ///
    /// Fails with [`RenderError::InvalidRay`] when the direction has zero or
    /// non-finite length.
    pub fn try_new(origin: Vec3, direction: Vec3) -> Result<Self> {
        let direction = direction
            .try_normalize()
            .ok_or(RenderError::InvalidRay { direction })?;
        Ok(Self { origin, direction })
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Fail fast when the direction cannot carry a distance.
    pub fn ensure_valid(&self) -> Result<()> {
        let len_sq = self.direction.length_squared();
        if len_sq.is_finite() && len_sq > 1e-12 {
            Ok(())
        } else {
            Err(RenderError::InvalidRay {
                direction: self.direction,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_normalizes_direction() {
        let ray = Ray::try_new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0)).unwrap();
        assert!(ray.direction.abs_diff_eq(Vec3::new(0.0, 0.6, 0.8), 1e-6));
        assert!(ray.at(5.0).abs_diff_eq(Vec3::new(0.0, 3.0, 4.0), 1e-5));
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert_eq!(
            Ray::try_new(Vec3::ONE, Vec3::ZERO),
            Err(RenderError::InvalidRay { direction: Vec3::ZERO })
        );
        assert!(Ray::new(Vec3::ONE, Vec3::ZERO).ensure_valid().is_err());
    }
}
