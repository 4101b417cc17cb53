//! Intersection stage.

use rayon::prelude::*;
use wave_core::Primitive;

use crate::bvh::{Accelerator, TraversalStats};
use crate::hit::HitRecord;
use crate::path::PathState;

/// First-bounce hits keyed by pixel, reused across samples.
///
/// Valid only while the scene, camera and primary rays are unchanged. The
/// [`Renderer`](crate::Renderer) owns one and clears it whenever the scene
/// changes.
#[derive(Debug, Clone, Default)]
pub struct FirstHitCache {
    hits: Vec<Option<HitRecord>>,
    populated: bool,
}

impl FirstHitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a full first bounce has been recorded.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Cached hit for `pixel`, `None` on a cached miss or an empty cache.
    pub fn get(&self, pixel: u32) -> Option<HitRecord> {
        self.hits.get(pixel as usize).copied().flatten()
    }

    /// Discard every entry.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.populated = false;
    }

    /// Record the first-bounce result of every path.
    fn store(&mut self, paths: &[PathState], pixel_count: usize) {
        self.hits.clear();
        self.hits.resize(pixel_count, None);
        for path in paths {
            self.hits[path.pixel as usize] = path.hit;
        }
        self.populated = true;
        log::info!("Cached first hits for {} pixels", pixel_count);
    }
}

/// Find the closest hit of every alive path.
///
/// Terminated paths are skipped. On the first bounce a populated `cache`
/// answers instead of the accelerator; an empty one is filled.
pub(crate) fn intersect_paths(
    paths: &mut [PathState],
    primitives: &[Primitive],
    accel: &Accelerator,
    cache: Option<&mut FirstHitCache>,
    depth: u32,
    pixel_count: usize,
) -> TraversalStats {
    match cache {
        Some(cache) if depth == 0 && cache.is_populated() => {
            let cache = &*cache;
            paths
                .par_iter_mut()
                .filter(|path| path.is_alive())
                .for_each(|path| path.hit = cache.get(path.pixel));
            TraversalStats::default()
        }
        Some(cache) if depth == 0 => {
            let stats = trace(paths, primitives, accel);
            cache.store(paths, pixel_count);
            stats
        }
        _ => trace(paths, primitives, accel),
    }
}

fn trace(paths: &mut [PathState], primitives: &[Primitive], accel: &Accelerator) -> TraversalStats {
    paths
        .par_iter_mut()
        .filter(|path| path.is_alive())
        .map(|path| {
            let mut stats = TraversalStats::default();
            path.hit = accel.intersect_with_stats(primitives, &path.ray, &mut stats);
            stats
        })
        .reduce(TraversalStats::default, |a, b| a + b)
}
