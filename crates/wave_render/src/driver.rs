//! Iteration driver.
//!
//! Runs `BuildAccel` once, then repeats the sample iteration:
//! generate primary rays, bounce (intersect, shade, terminate, compact)
//! until no path is alive or `max_depth` is reached, accumulate.

use std::sync::Arc;
use std::time::Instant;

use wave_core::Scene;

use crate::bvh::{Accelerator, TraversalStats};
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::film::{Film, Image};
use crate::intersect::{intersect_paths, FirstHitCache};
use crate::path::{PathPool, TerminationCause};
use crate::progress::{CancelToken, RenderPhase, RenderProgress};
use crate::shading::{shade_paths, sort_by_material};
use crate::termination::{enforce_depth_limit, russian_roulette};

/// What happened during one full-frame sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    /// Zero-based sample index
    pub sample: u32,
    /// Bounces executed before the active set emptied or hit `max_depth`
    pub bounces: u32,
    /// Alive paths entering each bounce
    pub paths_per_bounce: Vec<usize>,
    /// Finished paths per [`TerminationCause`], indexed by `TerminationCause::index`
    pub terminated_by: [usize; TerminationCause::COUNT],
    /// Accelerator work for the whole sample
    pub traversal: TraversalStats,
}

impl SampleReport {
    fn new(sample: u32) -> Self {
        Self {
            sample,
            bounces: 0,
            paths_per_bounce: Vec::new(),
            terminated_by: [0; TerminationCause::COUNT],
            traversal: TraversalStats::default(),
        }
    }

    /// Paths that ended for `cause`.
    pub fn terminated(&self, cause: TerminationCause) -> usize {
        self.terminated_by[cause.index()]
    }

    /// Paths that ended for any reason.
    pub fn total_terminated(&self) -> usize {
        self.terminated_by.iter().sum()
    }
}

/// Wavefront path tracer for one scene.
pub struct Renderer {
    scene: Arc<Scene>,
    config: RenderConfig,
    accel: Accelerator,
    cache: FirstHitCache,
    film: Film,
    pool: PathPool,
    progress: RenderProgress,
    cancel: CancelToken,
}

impl Renderer {
    /// Validate the config and build the accelerator.
    ///
    /// Configuration errors and empty scenes are reported here, before any
    /// sample runs.
    pub fn new(scene: impl Into<Arc<Scene>>, config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        let scene = scene.into();
        let progress = RenderProgress::new();

        progress.set_phase(RenderPhase::BuildingAccel);
        let accel = Accelerator::build(scene.primitives(), &config)?;
        progress.set_phase(RenderPhase::Idle);

        if config.cache_first_intersection
            && (config.antialias || scene.camera().has_defocus())
        {
            log::warn!("First-hit caching enabled: primary rays use pixel centers without jitter or defocus");
        }

        let camera = scene.camera();
        let film = Film::new(camera.image_width, camera.image_height);

        Ok(Self {
            scene,
            config,
            accel,
            cache: FirstHitCache::new(),
            film,
            pool: PathPool::new(),
            progress,
            cancel: CancelToken::new(),
        })
    }

    /// Swap in a new scene, discarding accumulated radiance and cached hits.
    ///
    /// On error the renderer keeps its current scene.
    pub fn set_scene(&mut self, scene: impl Into<Arc<Scene>>) -> RenderResult<()> {
        let scene = scene.into();
        self.progress.set_phase(RenderPhase::BuildingAccel);
        let accel = match Accelerator::build(scene.primitives(), &self.config) {
            Ok(accel) => accel,
            Err(err) => {
                self.progress.set_phase(RenderPhase::Idle);
                return Err(err);
            }
        };

        let camera = scene.camera();
        self.film = Film::new(camera.image_width, camera.image_height);
        self.accel = accel;
        self.scene = scene;
        self.reset();
        log::info!("Scene replaced, render state reset");
        Ok(())
    }

    /// Discard accumulated samples, cached hits, progress and cancellation.
    pub fn reset(&mut self) {
        self.film.clear();
        self.cache.clear();
        self.progress.reset();
        self.cancel.reset();
    }

    /// Run one full-frame sample and accumulate it.
    pub fn render_sample(&mut self) -> SampleReport {
        let sample = self.film.samples();
        let mut report = SampleReport::new(sample);
        let pixel_count = self.scene.camera().pixel_count();

        self.progress.begin_sample(sample);
        self.pool
            .generate_primary(self.scene.camera(), &self.config, sample);

        self.progress.set_phase(RenderPhase::Bouncing);
        for depth in 0..self.config.max_depth {
            let alive = self.pool.alive_count();
            if alive == 0 {
                break;
            }
            report.paths_per_bounce.push(alive);

            let cache = self
                .config
                .cache_first_intersection
                .then_some(&mut self.cache);
            let paths = self.pool.active_mut();
            report.traversal += intersect_paths(
                paths,
                self.scene.primitives(),
                &self.accel,
                cache,
                depth,
                pixel_count,
            );

            if self.config.sort_by_material {
                sort_by_material(paths);
            }
            shade_paths(paths, &self.scene);
            russian_roulette(paths, &self.config);
            enforce_depth_limit(paths);

            if self.config.stream_compaction {
                let removed = self.pool.compact();
                log::trace!("Bounce {}: compacted {} paths", depth, removed);
            }

            report.bounces = depth + 1;
            self.progress.finish_bounce(depth + 1);
        }

        self.progress.set_phase(RenderPhase::Accumulating);
        for path in self.pool.all() {
            if let Some(cause) = path.cause() {
                report.terminated_by[cause.index()] += 1;
            }
        }
        self.film.accumulate(self.pool.all());
        self.progress.finish_sample(self.film.samples());

        log::debug!(
            "Sample {}: {} bounces, paths per bounce {:?}, terminated by {:?}",
            sample,
            report.bounces,
            report.paths_per_bounce,
            TerminationCause::ALL
                .iter()
                .map(|&cause| (cause, report.terminated(cause)))
                .filter(|&(_, count)| count > 0)
                .collect::<Vec<_>>()
        );
        report
    }

    /// Render until `samples_per_pixel` samples are accumulated or the
    /// render is cancelled, and return the image.
    pub fn render(&mut self) -> Image {
        self.render_with(|_, _| {})
    }

    /// [`render`](Self::render), calling `on_sample` after every sample.
    ///
    /// Cancellation is checked only between samples.
    pub fn render_with<F>(&mut self, mut on_sample: F) -> Image
    where
        F: FnMut(&SampleReport, &Renderer),
    {
        let start = Instant::now();
        let target = self.config.samples_per_pixel;
        log::info!(
            "Rendering {}x{} at {} spp, max depth {}",
            self.film.width(),
            self.film.height(),
            target,
            self.config.max_depth
        );

        while self.film.samples() < target {
            if self.cancel.is_cancelled() {
                log::info!(
                    "Render cancelled after {} of {} samples",
                    self.film.samples(),
                    target
                );
                break;
            }
            let report = self.render_sample();
            on_sample(&report, self);
        }

        self.progress.set_phase(RenderPhase::Done);
        log::info!(
            "Rendered {} samples in {:.2?}",
            self.film.samples(),
            start.elapsed()
        );
        self.image()
    }

    /// The accumulated image, normalized by the completed sample count.
    pub fn image(&self) -> Image {
        self.film.resolve(&self.config)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn accelerator(&self) -> &Accelerator {
        &self.accel
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn first_hit_cache(&self) -> &FirstHitCache {
        &self.cache
    }

    /// Handle for observing progress from other threads.
    pub fn progress(&self) -> RenderProgress {
        self.progress.clone()
    }

    /// Handle for cancelling the render from other threads.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
