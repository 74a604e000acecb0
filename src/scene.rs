//! Scene model: the sphere buffer, an optional ground plane and one light.
//!
//! A [`Scene`] is validated once when it is built and is read-only for the
//! whole render pass. Moving objects means building a new scene for the next
//! frame.

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{check_unit_color, Result};
use crate::light::DirectionalLight;
use crate::sphere::Sphere;

/// Identifies the surface a query landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Sphere at this index of the sphere buffer.
    Sphere(usize),
    /// The infinite plane y = 0.
    Ground,
}

/// Reflectance of the infinite ground plane at y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    /// Diffuse reflectance.
    pub albedo: Vec3,
    /// Mirror reflectance.
    pub specular: Vec3,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            albedo: Vec3::splat(0.8),
            specular: Vec3::splat(0.04),
        }
    }
}

/// Reflectance resolved for one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    /// Diffuse reflectance.
    pub albedo: Vec3,
    /// Mirror reflectance.
    pub specular: Vec3,
}

impl SurfaceMaterial {
    /// Metal surfaces have no diffuse response at all.
    pub fn is_metal(&self) -> bool {
        self.albedo == Vec3::ZERO
    }
}

/// Immutable snapshot of everything the renderer can see.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
    ground: Option<GroundPlane>,
    light: DirectionalLight,
}

impl Scene {
    /// Validate and freeze a scene.
    pub fn new(spheres: Vec<Sphere>, ground: Option<GroundPlane>, light: DirectionalLight) -> Result<Self> {
        for (index, sphere) in spheres.iter().enumerate() {
            sphere.validate(index)?;
        }
        if let Some(ground) = &ground {
            check_unit_color("ground.albedo", ground.albedo)?;
            check_unit_color("ground.specular", ground.specular)?;
        }
        light.validate()?;

        debug!(
            "Scene built: {} spheres, ground plane {}",
            spheres.len(),
            if ground.is_some() { "on" } else { "off" }
        );
        Ok(Self {
            spheres,
            ground,
            light,
        })
    }

    /// Sphere buffer in index order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The flat sphere buffer as raw bytes, [`Sphere::STRIDE`] bytes per record.
    pub fn sphere_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.spheres)
    }

    /// Ground plane, if the scene has one.
    pub fn ground(&self) -> Option<&GroundPlane> {
        self.ground.as_ref()
    }

    /// The directional light.
    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    /// True when there is nothing to hit.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.ground.is_none()
    }

    /// Reflectance of a surface returned by a scene query.
    ///
    /// `Surface` values only come from queries against this scene, so an index
    /// or ground reference that does not exist falls back to black.
    pub fn material(&self, surface: Surface) -> SurfaceMaterial {
        match surface {
            Surface::Sphere(index) => self
                .spheres
                .get(index)
                .map(|s| SurfaceMaterial {
                    albedo: s.albedo,
                    specular: s.specular,
                })
                .unwrap_or(SurfaceMaterial {
                    albedo: Vec3::ZERO,
                    specular: Vec3::ZERO,
                }),
            Surface::Ground => self
                .ground
                .map(|g| SurfaceMaterial {
                    albedo: g.albedo,
                    specular: g.specular,
                })
                .unwrap_or(SurfaceMaterial {
                    albedo: Vec3::ZERO,
                    specular: Vec3::ZERO,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_sphere_before_rendering() {
        let spheres = vec![
            Sphere::diffuse(Vec3::Y, 1.0, Vec3::ONE, 0.1),
            Sphere::diffuse(Vec3::Y, 0.0, Vec3::ONE, 0.1),
        ];
        let err = Scene::new(spheres, None, DirectionalLight::default()).unwrap_err();
        assert!(err.to_string().contains("spheres[1].radius"));
    }

    #[test]
    fn sphere_bytes_cover_every_record() {
        let spheres = vec![
            Sphere::diffuse(Vec3::Y, 1.0, Vec3::ONE, 0.1),
            Sphere::metal(Vec3::X, 0.5, Vec3::splat(0.9)),
        ];
        let scene = Scene::new(spheres, Some(GroundPlane::default()), DirectionalLight::default()).unwrap();
        assert_eq!(scene.sphere_bytes().len(), 2 * Sphere::STRIDE);
        assert!(scene.material(Surface::Sphere(1)).is_metal());
        assert!(!scene.material(Surface::Ground).is_metal());
    }

    #[test]
    fn empty_scene_has_no_surfaces() {
        let scene = Scene::new(Vec::new(), None, DirectionalLight::default()).unwrap();
        assert!(scene.is_empty());
    }
}
