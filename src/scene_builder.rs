//! Procedural scene authoring: a grid of random spheres bobbing up and down.
//!
//! This sits outside the renderer. A [`SphereField`] is spawned once from a
//! [`SphereGrid`] description, then asked for a fresh sphere list every frame.

use glam::Vec3;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{check_range, RenderError, Result};
use crate::random::{random_color_range, random_f32_range, scene_rng};
use crate::sphere::Sphere;

/// Layout and randomisation settings for a sphere grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereGrid {
    /// Cells along X.
    pub count_x: u32,
    /// Cells along Y.
    pub count_y: u32,
    /// Cells along Z.
    pub count_z: u32,
    /// Distance between neighbouring cells.
    pub spacing: f32,
    /// Seed for colours, radii and cycle times.
    pub seed: u64,
    /// Chance that a sphere comes out metal, in [0, 1].
    pub metal_probability: f32,
    /// Vertical amplitude of the oscillation.
    pub oscillation_strength: f32,
}

impl Default for SphereGrid {
    fn default() -> Self {
        Self {
            count_x: 5,
            count_y: 5,
            count_z: 5,
            spacing: 2.0,
            seed: 0,
            metal_probability: 0.5,
            oscillation_strength: 1.0,
        }
    }
}

impl SphereGrid {
    /// Number of spheres the grid spawns.
    pub fn len(&self) -> usize {
        self.count_x as usize * self.count_y as usize * self.count_z as usize
    }

    /// True if any axis has zero cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the authoring values.
    pub fn validate(&self) -> Result<()> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(RenderError::degenerate(
                "grid.spacing",
                format!("must be > 0, got {}", self.spacing),
            ));
        }
        check_range("grid.metal_probability", self.metal_probability, 0.0, 1.0)?;
        check_range("grid.oscillation_strength", self.oscillation_strength, 0.0, f32::MAX)
    }

    /// Roll every sphere of the grid. The same grid always spawns the same field.
    pub fn spawn(&self) -> Result<SphereField> {
        self.validate()?;
        let mut rng = scene_rng(self.seed);
        let mut entries = Vec::with_capacity(self.len());

        for x in 0..self.count_x {
            for y in 0..self.count_y {
                for z in 0..self.count_z {
                    let origin = Vec3::new(
                        x as f32 * self.spacing,
                        1.0 + y as f32 * self.spacing,
                        z as f32 * self.spacing,
                    );
                    entries.push(roll_entry(&mut rng, origin, self));
                }
            }
        }

        debug!("Spawned {} spheres from seed {}", entries.len(), self.seed);
        Ok(SphereField { entries })
    }
}

fn roll_entry(rng: &mut impl Rng, origin: Vec3, grid: &SphereGrid) -> FieldEntry {
    let color = random_color_range(rng, 0.2, 1.0);
    let radius = random_f32_range(rng, 0.5, 2.0);
    let specular_intensity = random_f32_range(rng, 0.05, 0.1);
    let metal = rng.random::<f32>() < grid.metal_probability;
    let cycle_time = random_f32_range(rng, 0.5, 5.0);

    let sphere = if metal {
        Sphere::metal(origin, radius, color)
    } else {
        Sphere::diffuse(origin, radius, color, specular_intensity)
    };

    FieldEntry {
        sphere,
        oscillator: Oscillator {
            strength: grid.oscillation_strength,
            cycle_time,
        },
    }
}

/// Vertical bobbing of one sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    /// Amplitude.
    pub strength: f32,
    /// Phase divisor; zero behaves like one.
    pub cycle_time: f32,
}

impl Oscillator {
    /// Position of a sphere resting at `rest` after `time` seconds.
    pub fn offset(&self, rest: Vec3, time: f32) -> Vec3 {
        let cycle = if self.cycle_time == 0.0 { 1.0 } else { self.cycle_time };
        let phase = time * std::f32::consts::PI;
        let y = rest.y + ((phase + rest.x) + (phase + rest.z).cos() / cycle).sin() * self.strength;
        Vec3::new(rest.x, y, rest.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FieldEntry {
    sphere: Sphere,
    oscillator: Oscillator,
}

/// Spawned spheres with their oscillators.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereField {
    entries: Vec<FieldEntry>,
}

impl SphereField {
    /// Number of spheres.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty field.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spheres at rest.
    pub fn rest(&self) -> Vec<Sphere> {
        self.entries.iter().map(|e| e.sphere).collect()
    }

    /// Snapshot of the field at `time` seconds.
    pub fn spheres_at(&self, time: f32) -> Vec<Sphere> {
        self.entries
            .iter()
            .map(|e| Sphere {
                position: e.oscillator.offset(e.sphere.position, time),
                ..e.sphere
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_grid_spawns_125_spheres_on_the_lattice() {
        let field = SphereGrid::default().spawn().unwrap();
        assert_eq!(field.len(), 125);
        let rest = field.rest();
        assert_eq!(rest[0].position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(rest[124].position, Vec3::new(8.0, 9.0, 8.0));
        for s in &rest {
            assert!((0.5..2.0).contains(&s.radius));
            assert!(s.validate(0).is_ok());
        }
    }

    #[test]
    fn spawning_is_deterministic_per_seed() {
        let grid = SphereGrid::default();
        assert_eq!(grid.spawn().unwrap(), grid.spawn().unwrap());
        let other = SphereGrid { seed: 9, ..grid };
        assert_ne!(other.spawn().unwrap(), SphereGrid::default().spawn().unwrap());
    }

    #[test]
    fn metal_probability_extremes() {
        let metal = SphereGrid {
            metal_probability: 1.0,
            ..SphereGrid::default()
        };
        assert!(metal.spawn().unwrap().rest().iter().all(|s| s.is_metal() && s.albedo == Vec3::ZERO));

        let diffuse = SphereGrid {
            metal_probability: 0.0,
            ..SphereGrid::default()
        };
        for s in diffuse.spawn().unwrap().rest() {
            assert!(!s.is_metal());
            assert_eq!(s.specular, Vec3::splat(s.specular.x));
            assert!((0.05..0.1).contains(&s.specular.x));
        }
    }

    #[test]
    fn oscillator_matches_closed_form() {
        let osc = Oscillator {
            strength: 2.0,
            cycle_time: 0.0,
        };
        let rest = Vec3::new(1.0, 3.0, 2.0);
        let t = 0.25;
        let phase = t * std::f32::consts::PI;
        let expected = 3.0 + ((phase + 1.0) + (phase + 2.0).cos()).sin() * 2.0;
        let p = osc.offset(rest, t);
        assert_relative_eq!(p.y, expected, epsilon = 1e-6);
        assert_eq!((p.x, p.z), (rest.x, rest.z));
    }

    #[test]
    fn snapshots_keep_materials() {
        let field = SphereGrid {
            count_x: 2,
            count_y: 1,
            count_z: 1,
            ..SphereGrid::default()
        }
        .spawn()
        .unwrap();
        let rest = field.rest();
        let moved = field.spheres_at(1.3);
        for (a, b) in rest.iter().zip(&moved) {
            assert_eq!((a.radius, a.albedo, a.specular), (b.radius, b.albedo, b.specular));
            assert!((b.position.y - a.position.y).abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn rejects_bad_grid() {
        let grid = SphereGrid {
            spacing: 0.0,
            ..SphereGrid::default()
        };
        assert!(grid.spawn().is_err());
    }
}
