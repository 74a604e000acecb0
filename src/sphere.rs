//! Sphere primitive shared by the distance field and the intersection engine.
//!
//! The struct layout is the flat sphere buffer record: ten `f32` in the order
//! position, radius, albedo, specular (40 bytes, no padding).

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec3A};

use crate::error::{check_finite, check_unit_color, RenderError, Result};
use crate::interval::Interval;
use crate::ray::Ray;

/// Sphere primitive defined by center, radius and reflectance.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub position: Vec3,

    /// Radius of the sphere, strictly positive once validated.
    pub radius: f32,

    /// Diffuse reflectance. Zero for metal spheres.
    pub albedo: Vec3,

    /// Mirror reflectance. A coloured tint for metals, a uniform grey
    /// intensity for diffuse spheres.
    pub specular: Vec3,
}

impl Sphere {
    /// Size of one sphere record in the flat buffer.
    pub const STRIDE: usize = std::mem::size_of::<Sphere>();

    /// Diffuse sphere with a uniform specular intensity.
    pub fn diffuse(position: Vec3, radius: f32, albedo: Vec3, specular_intensity: f32) -> Self {
        Self {
            position,
            radius,
            albedo,
            specular: Vec3::splat(specular_intensity),
        }
    }

    /// Metal sphere: no diffuse response, tinted reflection.
    pub fn metal(position: Vec3, radius: f32, specular: Vec3) -> Self {
        Self {
            position,
            radius,
            albedo: Vec3::ZERO,
            specular,
        }
    }

    /// True when the sphere only responds through reflection.
    pub fn is_metal(&self) -> bool {
        self.albedo == Vec3::ZERO
    }

    /// Check the sphere invariants, naming the sphere by its buffer index.
    pub fn validate(&self, index: usize) -> Result<()> {
        let name = |field: &str| format!("spheres[{index}].{field}");

        if !self.position.is_finite() {
            return Err(RenderError::degenerate(
                name("position"),
                format!("must be finite, got {}", self.position),
            ));
        }
        check_finite(&name("radius"), self.radius)?;
        if self.radius <= 0.0 {
            return Err(RenderError::degenerate(
                name("radius"),
                format!("must be > 0, got {}", self.radius),
            ));
        }
        check_unit_color(&name("albedo"), self.albedo)?;
        check_unit_color(&name("specular"), self.specular)?;

        // Diffuse spheres carry a grey specular intensity, never a tint.
        if !self.is_metal() && !(self.specular.x == self.specular.y && self.specular.y == self.specular.z) {
            return Err(RenderError::degenerate(
                name("specular"),
                format!("must be uniform for a diffuse sphere, got {}", self.specular),
            ));
        }
        Ok(())
    }

    /// Center as a SIMD vector for the per-ray math.
    #[inline]
    pub fn center(&self) -> Vec3A {
        Vec3A::from(self.position)
    }

    /// Signed distance from `point` to the surface: negative inside.
    #[inline]
    pub fn distance(&self, point: impl Into<Vec3A>) -> f32 {
        (point.into() - self.center()).length() - self.radius
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.position) / self.radius
    }

    /// Nearest ray parameter inside `ray_t` where the ray meets the sphere.
    ///
    /// Closed-form quadratic with the half-b simplification.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> Option<f32> {
        // Vector from ray origin to sphere center
        let oc = self.center() - Vec3A::from(r.origin);
        let direction = Vec3A::from(r.direction);

        let a = direction.length_squared();
        let h = direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root that lies in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }
        Some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_sphere() -> Sphere {
        Sphere::diffuse(Vec3::ZERO, 1.0, Vec3::splat(0.5), 0.05)
    }

    #[test]
    fn record_is_ten_floats() {
        assert_eq!(Sphere::STRIDE, 10 * std::mem::size_of::<f32>());
        let s = unit_sphere();
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&s));
        assert_eq!(floats, &[0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5, 0.05, 0.05, 0.05]);
    }

    #[test]
    fn distance_accepts_simd_points() {
        let s = Sphere::diffuse(Vec3::new(1.0, 2.0, 3.0), 0.5, Vec3::ONE, 0.1);
        let p = Vec3::new(-2.0, 0.5, 4.0);
        assert_eq!(s.distance(p), s.distance(Vec3A::from(p)));
        assert_eq!(s.center(), Vec3A::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn distance_is_negative_inside() {
        let s = unit_sphere();
        assert!(s.distance(Vec3::new(0.2, -0.3, 0.1)) < 0.0);
        assert_relative_eq!(s.distance(Vec3::new(0.0, 3.0, 0.0)), 2.0);
    }

    #[test]
    fn ray_toward_center_hits_at_gap() {
        let s = Sphere::diffuse(Vec3::new(1.0, 2.0, 3.0), 0.75, Vec3::ONE, 0.1);
        let origin = Vec3::new(-4.0, 5.0, 9.0);
        let ray = Ray::try_new(origin, s.position - origin).unwrap();
        let t = s.hit(&ray, Interval::POSITIVE).unwrap();
        assert_relative_eq!(t, (origin - s.position).length() - s.radius, epsilon = 1e-4);
    }

    #[test]
    fn origin_inside_returns_far_root() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = unit_sphere().hit(&ray, Interval::POSITIVE).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn missing_ray_returns_none() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z);
        assert_eq!(unit_sphere().hit(&ray, Interval::POSITIVE), None);
    }

    #[test]
    fn validation_rejects_bad_radius_and_tinted_diffuse_specular() {
        let mut s = unit_sphere();
        s.radius = -1.0;
        assert!(matches!(
            s.validate(3),
            Err(RenderError::DegenerateParameter { ref name, .. }) if name == "spheres[3].radius"
        ));

        let mut tinted = unit_sphere();
        tinted.specular = Vec3::new(0.1, 0.2, 0.3);
        assert!(tinted.validate(0).is_err());

        let metal = Sphere::metal(Vec3::ZERO, 1.0, Vec3::new(0.9, 0.6, 0.2));
        assert!(metal.is_metal());
        assert!(metal.validate(0).is_ok());
    }
}
