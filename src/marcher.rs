//! Sphere tracing over the scene distance field.
//!
//! A march starts at `t = 0` and repeatedly steps by the field distance until
//! the distance drops under `surface_distance` (hit), `t` passes
//! `max_distance` (escape) or the step budget runs out (also an escape).
//! Hits are shaded with a soft shadow marched toward the light; escapes show
//! the sky plus optional glow.

use glam::Vec3;

use crate::light::DirectionalLight;
use crate::material::{glow, marched_base, shade_marched, SURFACE_BIAS};
use crate::params::RenderParameters;
use crate::ray::Ray;
use crate::scene::{Scene, Surface};
use crate::sdf::DistanceField;
use crate::skybox::Skybox;

/// Terminal state of a march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum March {
    /// Converged on a surface.
    Hit {
        /// Distance travelled along the ray.
        t: f32,
        /// Converged point.
        point: Vec3,
        /// Surface closest to the point.
        surface: Surface,
        /// Steps taken.
        steps: u32,
    },
    /// Escaped past the far distance or ran out of steps.
    Miss {
        /// Distance travelled along the ray.
        t: f32,
        /// Steps taken.
        steps: u32,
        /// Near-miss weight accumulated over the glow window.
        glow: f32,
    },
}

/// Ray marcher bound to one scene and parameter set for a render pass.
#[derive(Debug, Clone, Copy)]
pub struct RayMarcher<'a> {
    field: DistanceField<'a>,
    params: &'a RenderParameters,
}

impl<'a> RayMarcher<'a> {
    /// Marcher over `scene`. `params` must already be validated.
    pub fn new(scene: &'a Scene, params: &'a RenderParameters) -> Self {
        Self {
            field: DistanceField::new(scene),
            params,
        }
    }

    /// Step along `ray` until it converges or escapes.
    pub fn march(&self, ray: &Ray) -> March {
        let mut t = 0.0;
        let mut glow = 0.0;

        for step in 0..self.params.max_march_steps {
            let sample = self.field.sample(ray.at(t));

            if let Some(surface) = sample.surface {
                if sample.distance < self.params.surface_distance {
                    return March::Hit {
                        t,
                        point: ray.at(t),
                        surface,
                        steps: step,
                    };
                }
            }
            if t > self.params.max_distance {
                return March::Miss { t, steps: step, glow };
            }
            if step < self.params.glow_cutoff {
                glow += 1.0 / (1.0 + sample.distance);
            }
            t += sample.distance;
        }

        March::Miss {
            t,
            steps: self.params.max_march_steps,
            glow,
        }
    }

    /// Light visibility from `origin` toward the light, 0 (blocked) to 1 (clear).
    ///
    /// Re-marches toward the light and keeps the smallest ratio of clearance to
    /// travelled distance, scaled by `soft_shadow_strength`; narrower clearance
    /// gives a darker, continuous penumbra.
    pub fn soft_shadow(&self, origin: Vec3, to_light: Vec3) -> f32 {
        let k = self.params.soft_shadow_strength;
        let mut visibility: f32 = 1.0;
        // `origin` is already offset from the surface; the first step must not
        // scale with `surface_distance` or close occluders are stepped over.
        let mut t = SURFACE_BIAS;

        for _ in 0..self.params.max_march_steps {
            if t >= self.params.max_distance {
                break;
            }
            let h = self.field.distance(origin + to_light * t);
            if h < self.params.surface_distance {
                return 0.0;
            }
            visibility = visibility.min(k * h / t);
            t += h;
        }
        visibility.clamp(0.0, 1.0)
    }

    /// Radiance arriving along `ray`.
    pub fn radiance(&self, ray: &Ray, light: &DirectionalLight, skybox: &dyn Skybox) -> Vec3 {
        match self.march(ray) {
            March::Hit { point, surface, .. } => {
                let normal = self.field.normal(point);
                let base = match surface {
                    Surface::Ground => self.params.albedo,
                    Surface::Sphere(_) => marched_base(self.field.scene().material(surface)),
                };
                let shadow_origin = point + normal * (2.0 * self.params.surface_distance);
                let shadow = self.soft_shadow(shadow_origin, light.to_light());
                shade_marched(base, normal, ray.direction, light, self.params, shadow)
            }
            March::Miss { glow: weight, .. } => skybox.sample(ray.direction) + glow(self.params, weight),
        }
    }
}
