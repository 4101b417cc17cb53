//! Wave Renderer - wavefront CPU path tracing.
//!
//! A Monte Carlo path tracer that advances every pixel's light path one
//! bounce at a time. Each bounce runs as a sequence of data-parallel stages
//! over a pool of path states:
//!
//! 1. **Intersect** every active path against the accelerator (BVH or linear
//!    scan), optionally reusing cached first hits
//! 2. **Shade** hits: add emission, sample the material, spawn the next ray
//! 3. **Terminate** paths by Russian roulette, then **compact** the pool
//!
//! Finished paths deposit their radiance into the [`Film`]. The [`Renderer`]
//! drives the loop across bounces and samples and publishes progress through
//! [`RenderProgress`].

mod bvh;
mod config;
mod driver;
mod error;
mod film;
mod hit;
mod intersect;
mod path;
mod progress;
mod sampling;
mod shading;
mod termination;

#[cfg(test)]
mod test_scenes;

pub use bvh::{Accelerator, Bvh, BvhNode, TraversalStats, LEAF_MAX_SIZE};
pub use config::{ConfigError, RenderConfig};
pub use driver::{Renderer, SampleReport};
pub use error::{RenderError, RenderResult};
pub use film::{Film, Image};
pub use hit::HitRecord;
pub use intersect::FirstHitCache;
pub use path::{PathPool, PathState, PathStatus, TerminationCause};
pub use progress::{CancelToken, ProgressSnapshot, RenderPhase, RenderProgress};

/// Re-export scene and math types used in the public API
pub use wave_core::{Background, Camera, Color, Material, Primitive, Scene};
pub use wave_math::{Aabb, Interval, Ray, Vec3};
