//! Path states and the pool that holds them between stages.
//!
//! One path state exists per pixel per sample. Stages address states by
//! slot in a flat vector; compaction relocates whole states, never fields.

use rayon::prelude::*;
use wave_core::{Camera, Color};
use wave_math::{Ray, Vec2};

use crate::config::RenderConfig;
use crate::hit::HitRecord;
use crate::sampling::{path_rng, random_in_unit_disk, sample_square, PathRng};

/// Why a path stopped bouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationCause {
    /// The ray left the scene.
    Miss,
    /// The ray reached a light.
    Emitter,
    /// The material did not scatter.
    Absorbed,
    /// Killed by Russian roulette.
    RussianRoulette,
    /// Still alive after the last allowed bounce.
    DepthLimit,
    /// Throughput or radiance became NaN or infinite.
    NumericInstability,
}

impl TerminationCause {
    pub const COUNT: usize = 6;

    pub const ALL: [TerminationCause; Self::COUNT] = [
        TerminationCause::Miss,
        TerminationCause::Emitter,
        TerminationCause::Absorbed,
        TerminationCause::RussianRoulette,
        TerminationCause::DepthLimit,
        TerminationCause::NumericInstability,
    ];

    /// Slot of this cause in per-cause counters.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Alive or terminated (with the reason).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Alive,
    Terminated(TerminationCause),
}

/// Mutable state of one in-flight light path.
#[derive(Debug, Clone)]
pub struct PathState {
    /// Ray to trace on the next bounce
    pub ray: Ray,
    /// Product of material weights along the path so far
    pub throughput: Color,
    /// Radiance gathered so far
    pub radiance: Color,
    /// Bounces left before the path is cut off
    pub remaining_bounces: u32,
    /// Bounces taken so far
    pub bounces: u32,
    /// Row-major index of the originating pixel
    pub pixel: u32,
    pub rng: PathRng,
    pub status: PathStatus,
    /// Result of the last intersection stage, consumed by shading
    pub hit: Option<HitRecord>,
}

impl PathState {
    /// A fresh path with unit throughput and no radiance.
    pub fn new(ray: Ray, pixel: u32, max_depth: u32, rng: PathRng) -> Self {
        Self {
            ray,
            throughput: Color::ONE,
            radiance: Color::ZERO,
            remaining_bounces: max_depth,
            bounces: 0,
            pixel,
            rng,
            status: PathStatus::Alive,
            hit: None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == PathStatus::Alive
    }

    /// Stop the path. Its radiance is kept for accumulation.
    #[inline]
    pub fn terminate(&mut self, cause: TerminationCause) {
        self.status = PathStatus::Terminated(cause);
        self.hit = None;
    }

    /// The termination cause, if terminated.
    pub fn cause(&self) -> Option<TerminationCause> {
        match self.status {
            PathStatus::Alive => None,
            PathStatus::Terminated(cause) => Some(cause),
        }
    }

    /// Zero and terminate the path if its throughput or radiance is not finite.
    ///
    /// Returns true if the path was discarded.
    pub fn discard_if_unstable(&mut self) -> bool {
        if self.throughput.is_finite() && self.radiance.is_finite() {
            return false;
        }
        log::trace!(
            "Discarding unstable path for pixel {} at bounce {}",
            self.pixel,
            self.bounces
        );
        self.throughput = Color::ZERO;
        self.radiance = Color::ZERO;
        self.terminate(TerminationCause::NumericInstability);
        true
    }
}

/// Working set of path states for one sample.
///
/// `active` is what the stages iterate. With compaction on, terminated
/// states are moved to `retired`; with it off they stay in `active` and the
/// stages skip them.
#[derive(Debug, Default)]
pub struct PathPool {
    active: Vec<PathState>,
    retired: Vec<PathState>,
}

impl PathPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool's contents with one primary path per pixel.
    pub fn generate_primary(&mut self, camera: &Camera, config: &RenderConfig, sample: u32) {
        let width = camera.image_width;
        let jitter = config.jitter_primary_rays();
        let lens = jitter && camera.has_defocus();

        self.retired.clear();
        (0..camera.pixel_count() as u32)
            .into_par_iter()
            .map(|pixel| {
                let mut rng = path_rng(config.seed, sample, pixel);
                let offset = if jitter { sample_square(&mut rng) } else { Vec2::ZERO };
                let lens_sample = if lens {
                    random_in_unit_disk(&mut rng)
                } else {
                    Vec2::ZERO
                };
                let ray = camera.get_ray(pixel % width, pixel / width, offset, lens_sample);
                PathState::new(ray, pixel, config.max_depth, rng)
            })
            .collect_into_vec(&mut self.active);
    }

    /// States the stages work on.
    pub fn active(&self) -> &[PathState] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [PathState] {
        &mut self.active
    }

    /// States removed by compaction.
    pub fn retired(&self) -> &[PathState] {
        &self.retired
    }

    /// Number of states still alive.
    pub fn alive_count(&self) -> usize {
        self.active.par_iter().filter(|p| p.is_alive()).count()
    }

    /// Move terminated states out of the active set.
    ///
    /// Survivors keep their relative order. Must only run once every state
    /// has its status for the current bounce.
    pub fn compact(&mut self) -> usize {
        let (alive, dead): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_par_iter()
            .partition(PathState::is_alive);
        let removed = dead.len();
        self.active = alive;
        self.retired.extend(dead);
        removed
    }

    /// Every state of the sample, active or retired.
    pub fn all(&self) -> impl Iterator<Item = &PathState> {
        self.active.iter().chain(self.retired.iter())
    }

    /// Total number of states, active or retired.
    pub fn len(&self) -> usize {
        self.active.len() + self.retired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_math::Vec3;

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new().with_resolution(width, height);
        camera.initialize().unwrap();
        camera
    }

    #[test]
    fn test_one_path_per_pixel() {
        let mut pool = PathPool::new();
        pool.generate_primary(&camera(5, 3), &RenderConfig::default(), 0);

        assert_eq!(pool.len(), 15);
        for (slot, path) in pool.active().iter().enumerate() {
            assert_eq!(path.pixel as usize, slot);
            assert!(path.is_alive());
            assert_eq!(path.throughput, Color::ONE);
            assert_eq!(path.remaining_bounces, RenderConfig::default().max_depth);
        }
    }

    #[test]
    fn test_unjittered_rays_are_pixel_centers() {
        let cam = camera(4, 4);
        let config = RenderConfig {
            antialias: false,
            ..Default::default()
        };
        let mut pool = PathPool::new();
        pool.generate_primary(&cam, &config, 3);
        assert_eq!(pool.active()[6].ray, cam.center_ray(2, 1));
    }

    #[test]
    fn test_compact_keeps_order_and_integrity() {
        let mut pool = PathPool::new();
        pool.generate_primary(&camera(4, 2), &RenderConfig::default(), 0);
        for path in pool.active_mut() {
            if path.pixel % 3 == 0 {
                path.radiance = Vec3::splat(path.pixel as f32);
                path.terminate(TerminationCause::Miss);
            }
        }

        let removed = pool.compact();
        assert_eq!(removed, 3);
        assert_eq!(pool.alive_count(), 5);
        let pixels: Vec<u32> = pool.active().iter().map(|p| p.pixel).collect();
        assert_eq!(pixels, vec![1, 2, 4, 5, 7]);
        for path in pool.retired() {
            assert_eq!(path.radiance, Vec3::splat(path.pixel as f32));
        }
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_unstable_path_is_zeroed() {
        let mut pool = PathPool::new();
        pool.generate_primary(&camera(1, 1), &RenderConfig::default(), 0);
        let path = &mut pool.active_mut()[0];
        path.throughput = Vec3::new(f32::NAN, 1.0, 1.0);
        path.radiance = Vec3::ONE;

        assert!(path.discard_if_unstable());
        assert_eq!(path.radiance, Color::ZERO);
        assert_eq!(path.cause(), Some(TerminationCause::NumericInstability));
    }
}
