//! Random number generation for sampling and scene authoring.
//!
//! Every pixel owns an independent ChaCha20 stream derived from the frame seed
//! and the pixel index, so results do not depend on which thread renders which
//! pixel or in what order.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Deterministic sample source for one pixel.
pub struct PixelSampler {
    rng: ChaCha20Rng,
}

impl PixelSampler {
    /// Stream for pixel `(x, y)` of a `width`-wide frame.
    pub fn for_pixel(seed: u64, x: u32, y: u32, width: u32) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(u64::from(y) * u64::from(width) + u64::from(x));
        Self { rng }
    }

    /// Generate a random f32 in [0.0, 1.0)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random()
    }

    /// Sub-pixel offset for one sample.
    ///
    /// A single sample goes through the pixel centre; multiple samples are
    /// jittered uniformly over the pixel footprint.
    pub fn pixel_offset(&mut self, samples_per_pixel: u32) -> Vec2 {
        if samples_per_pixel <= 1 {
            Vec2::splat(0.5)
        } else {
            Vec2::new(self.next_f32(), self.next_f32())
        }
    }
}

/// Seeded generator for scene authoring.
pub fn scene_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Generate a random f32 in [min, max)
pub fn random_f32_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.random::<f32>()
}

/// Generate random RGB color with components in [min, max).
pub fn random_color_range(rng: &mut impl Rng, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        random_f32_range(rng, min, max),
        random_f32_range(rng, min, max),
        random_f32_range(rng, min, max),
    )
}
