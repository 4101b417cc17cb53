//! Fatal render errors.
//!
//! Only problems detected before the first sample surface here. Per-path
//! failures (degenerate geometry, NaN radiance) are recovered inside the
//! stages and never abort a batch.

use thiserror::Error;
use wave_core::SceneError;

use crate::config::ConfigError;

/// Errors that stop a render before it begins.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Scene has no usable primitives to build an accelerator from")]
    EmptyScene,

    #[error("Invalid render config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for render setup.
pub type RenderResult<T> = Result<T, RenderError>;
