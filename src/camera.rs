//! Camera for primary ray generation.
//!
//! The camera is described by a camera-to-world matrix and the inverse of its
//! projection matrix, the same pair a host engine hands to a compute kernel.
//! The inverse is taken once when the camera is built, never per pixel.
//! View space follows the right-handed convention: the camera looks down -Z.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::error::{RenderError, Result};
use crate::ray::Ray;

/// Near clip plane used by [`Camera::look_at`].
const NEAR_PLANE: f32 = 0.1;
/// Far clip plane used by [`Camera::look_at`].
const FAR_PLANE: f32 = 1000.0;

/// Pinhole camera expressed as matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    camera_to_world: Mat4,
    inverse_projection: Mat4,
    position: Vec3,
}

impl Camera {
    /// Build from a camera-to-world matrix and a projection matrix.
    pub fn from_projection(camera_to_world: Mat4, projection: Mat4) -> Result<Self> {
        check_invertible("camera.projection", projection)?;
        Self::from_inverse_projection(camera_to_world, projection.inverse())
    }

    /// Build from a camera-to-world matrix and an already inverted projection.
    pub fn from_inverse_projection(camera_to_world: Mat4, inverse_projection: Mat4) -> Result<Self> {
        check_invertible("camera.camera_to_world", camera_to_world)?;
        check_invertible("camera.inverse_projection", inverse_projection)?;
        Ok(Self {
            camera_to_world,
            inverse_projection,
            position: camera_to_world.w_axis.xyz(),
        })
    }

    /// Perspective camera at `position` looking at `target`.
    ///
    /// `vfov` is the vertical field of view in degrees.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, vfov: f32, aspect: f32) -> Result<Self> {
        if (target - position).length_squared() < 1e-8 {
            return Err(RenderError::degenerate("camera.target", "must differ from camera.position"));
        }
        if (target - position).cross(up).length_squared() < 1e-8 {
            return Err(RenderError::degenerate("camera.up", "must not be parallel to the view direction"));
        }
        if !(vfov > 0.0 && vfov < 180.0) {
            return Err(RenderError::degenerate(
                "camera.vertical_fov",
                format!("must lie in (0, 180) degrees, got {vfov}"),
            ));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(RenderError::degenerate("camera.aspect", format!("must be > 0, got {aspect}")));
        }

        let camera_to_world = Mat4::look_at_rh(position, target, up).inverse();
        let projection = Mat4::perspective_rh_gl(vfov.to_radians(), aspect, NEAR_PLANE, FAR_PLANE);
        Self::from_projection(camera_to_world, projection)
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Camera-to-world transform.
    pub fn camera_to_world(&self) -> Mat4 {
        self.camera_to_world
    }

    /// Inverse projection transform.
    pub fn inverse_projection(&self) -> Mat4 {
        self.inverse_projection
    }

    /// World-space ray through a point of a `width` x `height` image.
    ///
    /// `pixel` is `(x, y)` plus the sub-pixel offset, with y growing downward
    /// from the top row.
    pub fn primary_ray(&self, pixel: Vec2, width: u32, height: u32) -> Result<Ray> {
        let ndc = Vec2::new(
            pixel.x / width as f32 * 2.0 - 1.0,
            1.0 - pixel.y / height as f32 * 2.0,
        );
        let view_point = self.inverse_projection.project_point3(ndc.extend(0.0));
        let world_point = self.camera_to_world.transform_point3(view_point);
        Ray::try_new(self.position, world_point - self.position)
    }
}

fn check_invertible(name: &str, m: Mat4) -> Result<()> {
    let det = m.determinant();
    if !m.is_finite() || !det.is_finite() || det.abs() < 1e-12 {
        return Err(RenderError::degenerate(name, "must be finite and invertible"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y, 60.0, 1.0).unwrap()
    }

    #[test]
    fn centre_pixel_looks_at_target() {
        let ray = camera().primary_ray(Vec2::new(32.0, 32.0), 64, 64).unwrap();
        assert!(ray.origin.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
        assert!(ray.direction.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn top_row_points_up_and_left_column_points_left() {
        let cam = camera();
        let top = cam.primary_ray(Vec2::new(32.0, 0.0), 64, 64).unwrap();
        let left = cam.primary_ray(Vec2::new(0.0, 32.0), 64, 64).unwrap();
        assert!(top.direction.y > 0.0);
        // Looking down +Z with +Y up, screen right is world -X.
        assert!(left.direction.x > 0.0);

        // Edge of the frame sits half the field of view off axis.
        let angle = top.direction.angle_between(Vec3::Z).to_degrees();
        assert!((angle - 30.0).abs() < 1e-3, "{angle}");
    }

    #[test]
    fn matrices_round_trip() {
        let cam = camera();
        let rebuilt = Camera::from_inverse_projection(cam.camera_to_world(), cam.inverse_projection()).unwrap();
        assert_eq!(cam, rebuilt);
    }

    #[test]
    fn rejects_degenerate_setups() {
        assert!(Camera::look_at(Vec3::ONE, Vec3::ONE, Vec3::Y, 60.0, 1.0).is_err());
        assert!(Camera::look_at(Vec3::ZERO, Vec3::Y, Vec3::Y, 60.0, 1.0).is_err());
        assert!(Camera::look_at(Vec3::ZERO, Vec3::Z, Vec3::Y, 0.0, 1.0).is_err());
        assert!(Camera::from_projection(Mat4::IDENTITY, Mat4::ZERO).is_err());
    }
}
