//! Path tracing over the intersection engine.
//!
//! Every hit receives shadow-tested direct light from the directional light.
//! Diffuse surfaces end the path there; metal surfaces reflect the ray and
//! keep going until the bounce budget is spent or the path escapes to the sky.

use glam::{Vec3, Vec3A};

use crate::error::Result;
use crate::hittable::{intersect, occluded, Hit};
use crate::material::{diffuse, reflect, SURFACE_BIAS};
use crate::params::RenderParameters;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::skybox::Skybox;

/// Path tracer bound to one scene, parameter set and sky for a render pass.
#[derive(Clone, Copy)]
pub struct PathTracer<'a> {
    scene: &'a Scene,
    params: &'a RenderParameters,
    skybox: &'a dyn Skybox,
}

impl<'a> PathTracer<'a> {
    /// Tracer over `scene`. `params` must already be validated.
    pub fn new(scene: &'a Scene, params: &'a RenderParameters, skybox: &'a dyn Skybox) -> Self {
        Self {
            scene,
            params,
            skybox,
        }
    }

    /// Radiance carried back along one path starting with `primary`.
    pub fn trace(&self, primary: &Ray) -> Result<Vec3> {
        let mut ray = *primary;
        let mut throughput = Vec3A::ONE;
        let mut radiance = Vec3A::ZERO;
        let mut depth = 0;

        loop {
            let Some(hit) = intersect(self.scene, &ray)? else {
                radiance += throughput * Vec3A::from(self.skybox.sample(ray.direction));
                break;
            };

            radiance += throughput * Vec3A::from(self.direct_light(&hit)?) * self.params.albedo_strength;

            let material = self.scene.material(hit.surface);
            if !material.is_metal() || depth >= self.params.bounces {
                break;
            }
            ray = reflected_ray(&ray, &hit);
            throughput *= Vec3A::from(material.specular) * self.params.specular_strength;
            depth += 1;
        }

        Ok(radiance.into())
    }

    /// Diffuse light at a hit, zero when something blocks the way to the light.
    pub fn direct_light(&self, hit: &Hit) -> Result<Vec3> {
        let light = self.scene.light();
        let material = self.scene.material(hit.surface);
        let shadow_ray = Ray::new(hit.point + hit.normal * SURFACE_BIAS, light.to_light());
        let visibility = if occluded(self.scene, &shadow_ray, f32::INFINITY)? {
            0.0
        } else {
            1.0
        };
        Ok(diffuse(material.albedo, hit.normal, light, visibility))
    }
}

/// Mirror continuation of `ray` at `hit`, nudged off the surface.
pub fn reflected_ray(ray: &Ray, hit: &Hit) -> Ray {
    Ray::new(
        hit.point + hit.normal * SURFACE_BIAS,
        reflect(ray.direction, hit.normal),
    )
}
