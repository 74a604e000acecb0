//! Ray-scene intersection.
//!
//! Closed-form tests against every sphere in the buffer and the ground plane
//! `y = 0`, keeping the nearest positive hit. Linear search; the sphere
//! buffer is small and rebuilt every frame.

use glam::Vec3;

use crate::error::Result;
use crate::interval::Interval;
use crate::ray::Ray;
use crate::scene::{Scene, Surface};

/// Ray-surface intersection information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point where the ray meets the surface
    pub point: Vec3,
    /// Outward unit normal at the hit point
    pub normal: Vec3,
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// Surface that was hit
    pub surface: Surface,
}

/// Nearest hit along `ray` over all positive distances.
///
/// Fails with `InvalidRay` when the ray direction is degenerate.
pub fn intersect(scene: &Scene, ray: &Ray) -> Result<Option<Hit>> {
    intersect_in(scene, ray, Interval::POSITIVE)
}

/// Nearest hit with a distance strictly inside `ray_t`.
///
/// On exact distance ties the sphere with the lower index wins, then the
/// ground plane.
pub fn intersect_in(scene: &Scene, ray: &Ray, ray_t: Interval) -> Result<Option<Hit>> {
    ray.ensure_valid()?;

    let mut closest: Option<(f32, Surface)> = None;
    let mut closest_so_far = ray_t.max;

    // Test intersection with each sphere in buffer order
    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some(t) = sphere.hit(ray, ray_t.with_max(closest_so_far)) {
            closest_so_far = t;
            closest = Some((t, Surface::Sphere(index)));
        }
    }

    if scene.ground().is_some() {
        if let Some(t) = hit_ground(ray, ray_t.with_max(closest_so_far)) {
            closest = Some((t, Surface::Ground));
        }
    }

    Ok(closest.map(|(distance, surface)| {
        let point = ray.at(distance);
        let normal = match surface {
            Surface::Sphere(index) => scene.spheres()[index].normal_at(point),
            Surface::Ground => Vec3::Y,
        };
        Hit {
            point,
            normal,
            distance,
            surface,
        }
    }))
}

/// Whether anything blocks `ray` before `max_distance`.
pub fn occluded(scene: &Scene, ray: &Ray, max_distance: f32) -> Result<bool> {
    Ok(intersect_in(scene, ray, Interval::new(0.0, max_distance))?.is_some())
}

/// Ray parameter where the ray crosses the plane y = 0.
fn hit_ground(ray: &Ray, ray_t: Interval) -> Option<f32> {
    if ray.direction.y.abs() < 1e-8 {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    ray_t.surrounds(t).then_some(t)
}
