//! Random sampling helpers and per-path stream seeding.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wave_math::{Vec2, Vec3};

/// Random stream owned by a single path state.
pub type PathRng = SmallRng;

/// Derive an independent stream for one pixel of one sample.
///
/// The stream depends only on `(seed, sample, pixel)`, never on scheduling,
/// so renders are reproducible regardless of thread count or path order.
pub fn path_rng(seed: u64, sample: u32, pixel: u32) -> PathRng {
    let key = splitmix64(seed ^ splitmix64(((sample as u64) << 32) | pixel as u64));
    SmallRng::seed_from_u64(key)
}

/// SplitMix64 finalizer.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
pub fn sample_square<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}

/// Sample a random point in the unit disk.
pub fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    loop {
        let p = Vec2::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed unit vector (rejection sampling in the unit ball).
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
