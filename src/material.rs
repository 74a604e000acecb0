//! Shading and lighting model.
//!
//! Lambertian diffuse under the directional light, a Phong highlight for
//! marched surfaces, mirror reflection for metals and the distance-weighted
//! glow used by the marcher on escaping rays.

use glam::Vec3;

use crate::light::DirectionalLight;
use crate::params::RenderParameters;
use crate::scene::SurfaceMaterial;

/// Constant fill light so faces turned away from the light stay readable.
pub const AMBIENT: f32 = 0.05;

/// Offset along the normal for rays leaving a surface.
pub const SURFACE_BIAS: f32 = 1e-3;

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Cosine term of the light on a surface with unit `normal`, clamped at zero.
pub fn lambert(normal: Vec3, light: &DirectionalLight) -> f32 {
    normal.dot(light.to_light()).max(0.0)
}

/// Diffuse radiance leaving a surface that sees the light with `visibility` in [0, 1].
pub fn diffuse(albedo: Vec3, normal: Vec3, light: &DirectionalLight, visibility: f32) -> Vec3 {
    albedo * light.radiance() * (lambert(normal, light) * visibility)
}

/// Phong highlight strength for a viewer looking along `incident`.
pub fn phong(normal: Vec3, incident: Vec3, light: &DirectionalLight, shininess: f32) -> f32 {
    let reflected = reflect(light.direction, normal);
    reflected.dot(-incident).max(0.0).powf(shininess)
}

/// Colour a marched surface.
///
/// `base` is the surface colour, `shadow` the soft-shadow visibility in [0, 1].
pub fn shade_marched(
    base: Vec3,
    normal: Vec3,
    incident: Vec3,
    light: &DirectionalLight,
    params: &RenderParameters,
    shadow: f32,
) -> Vec3 {
    let diffuse = base * (AMBIENT + lambert(normal, light) * shadow) * light.radiance();
    let highlight = light.radiance() * (params.specular * phong(normal, incident, light, params.shininess) * shadow);
    diffuse + highlight
}

/// Colour used for a marched surface: its albedo, or its tint if it is metal.
pub fn marched_base(material: SurfaceMaterial) -> Vec3 {
    if material.is_metal() {
        material.specular
    } else {
        material.albedo
    }
}

/// Glow added to an escaping ray from its accumulated near-miss weight.
pub fn glow(params: &RenderParameters, accumulated: f32) -> Vec3 {
    if params.glow_cutoff == 0 {
        return Vec3::ZERO;
    }
    params.glow_color * (params.glow_strength * accumulated / params.glow_cutoff as f32)
}
