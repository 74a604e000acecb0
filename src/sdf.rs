//! Signed distance field over the scene.
//!
//! The field is the union (minimum) of the ground plane `y = 0` and every
//! sphere in the buffer. Evaluation is a pure function of the scene and the
//! query point.

use glam::{Vec3, Vec3A};

use crate::scene::{Scene, Surface};

/// Step used for the central-difference gradient.
const NORMAL_EPSILON: f32 = 1e-3;

/// Result of one field evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfSample {
    /// Signed distance to the closest surface, negative inside.
    pub distance: f32,
    /// Closest surface, `None` only for an empty scene.
    pub surface: Option<Surface>,
}

impl SdfSample {
    /// Sentinel for a scene without surfaces.
    pub const NOTHING: SdfSample = SdfSample {
        distance: f32::INFINITY,
        surface: None,
    };
}

/// Distance queries against a borrowed scene.
#[derive(Debug, Clone, Copy)]
pub struct DistanceField<'a> {
    scene: &'a Scene,
}

impl<'a> DistanceField<'a> {
    /// Field over `scene`.
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// The scene this field is evaluated over.
    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Closest surface and its signed distance from `point`.
    ///
    /// Spheres are visited in buffer order and only replace the current best
    /// when strictly closer, so ties resolve to the ground plane first and then
    /// to the lowest sphere index.
    pub fn sample(&self, point: Vec3) -> SdfSample {
        let p = Vec3A::from(point);
        let mut closest = match self.scene.ground() {
            Some(_) => SdfSample {
                distance: point.y,
                surface: Some(Surface::Ground),
            },
            None => SdfSample::NOTHING,
        };

        for (index, sphere) in self.scene.spheres().iter().enumerate() {
            let distance = sphere.distance(p);
            if distance < closest.distance {
                closest = SdfSample {
                    distance,
                    surface: Some(Surface::Sphere(index)),
                };
            }
        }
        closest
    }

    /// Signed distance only.
    pub fn distance(&self, point: Vec3) -> f32 {
        self.sample(point).distance
    }

    /// Unit surface normal from the central-difference gradient of the field.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        let e = NORMAL_EPSILON;
        let dx = self.distance(point + Vec3::new(e, 0.0, 0.0)) - self.distance(point - Vec3::new(e, 0.0, 0.0));
        let dy = self.distance(point + Vec3::new(0.0, e, 0.0)) - self.distance(point - Vec3::new(0.0, e, 0.0));
        let dz = self.distance(point + Vec3::new(0.0, 0.0, e)) - self.distance(point - Vec3::new(0.0, 0.0, e));
        Vec3::new(dx, dy, dz).normalize_or(Vec3::Y)
    }
}
