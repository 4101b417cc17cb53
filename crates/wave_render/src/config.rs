//! Render configuration.
//!
//! Every optimization toggle and quality knob lives in one immutable value.
//! The [`Renderer`](crate::Renderer) copies it at construction and never
//! changes it while rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors, reported before rendering starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,

    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("gamma must be finite and positive, got {0}")]
    InvalidGamma(f32),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Full-frame samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth; surviving paths are cut off here
    pub max_depth: u32,
    /// Base seed for every per-path random stream
    pub seed: u64,

    /// Build a BVH instead of scanning all primitives
    pub use_bvh: bool,
    /// Skip work whose bounding box the ray misses (BVH nodes, or primitives
    /// in a linear scan)
    pub aabb_pruning: bool,
    /// Remove terminated paths from the active set after every bounce
    pub stream_compaction: bool,
    /// Probabilistically end low-throughput paths
    pub russian_roulette: bool,
    /// Russian roulette only considers paths with more bounces than this
    pub russian_roulette_min_depth: u32,
    /// Reuse first-bounce intersections across samples
    pub cache_first_intersection: bool,
    /// Group paths by material before shading
    pub sort_by_material: bool,

    /// Jitter primary rays within the pixel
    pub antialias: bool,
    /// Apply `pow(clamp(c, 0, 1), 1 / gamma)` to output images
    pub gamma_correction: bool,
    pub gamma: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            max_depth: 8,
            seed: 0,
            use_bvh: true,
            aabb_pruning: true,
            stream_compaction: false,
            russian_roulette: true,
            russian_roulette_min_depth: 3,
            cache_first_intersection: false,
            sort_by_material: false,
            antialias: true,
            gamma_correction: false,
            gamma: 2.2,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that would make a render meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        Ok(())
    }

    /// True if primary rays may vary between samples of the same pixel.
    ///
    /// First-hit caching requires identical primary rays, so it turns jitter off.
    pub fn jitter_primary_rays(&self) -> bool {
        self.antialias && !self.cache_first_intersection
    }
}
