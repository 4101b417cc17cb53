//! Termination stage: Russian roulette and the depth cutoff.
//!
//! Compaction itself lives on [`PathPool`](crate::path::PathPool); the
//! driver runs it after this stage has settled every path's status.

use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::path::{PathState, TerminationCause};
use crate::sampling::gen_f32;

/// Apply Russian roulette to every alive path whose bounce count exceeds
/// the warm-up depth.
///
/// A survivor's throughput is divided by its continuation probability, so
/// the expected contribution is unchanged.
pub(crate) fn russian_roulette(paths: &mut [PathState], config: &RenderConfig) {
    if !config.russian_roulette {
        return;
    }
    let min_depth = config.russian_roulette_min_depth;
    paths
        .par_iter_mut()
        .filter(|path| path.is_alive() && path.bounces > min_depth)
        .for_each(roulette);
}

fn roulette(path: &mut PathState) {
    let p = path.throughput.max_element().min(1.0);
    if !(p > 0.0) {
        path.terminate(TerminationCause::RussianRoulette);
        return;
    }
    if gen_f32(&mut path.rng) >= p {
        path.terminate(TerminationCause::RussianRoulette);
    } else {
        path.throughput /= p;
    }
}

/// Terminate alive paths with no bounces left.
pub(crate) fn enforce_depth_limit(paths: &mut [PathState]) {
    paths
        .par_iter_mut()
        .filter(|path| path.is_alive() && path.remaining_bounces == 0)
        .for_each(|path| path.terminate(TerminationCause::DepthLimit));
}
