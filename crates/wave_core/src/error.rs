//! Errors reported while assembling a scene, before any rendering begins.

use thiserror::Error;

/// Errors that can occur while building a [`Scene`](crate::Scene).
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Scene defines no materials")]
    NoMaterials,

    #[error("Primitive {primitive} references missing material {material}")]
    InvalidMaterial { primitive: usize, material: usize },

    #[error("Material {material} is invalid: {reason}")]
    InvalidMaterialParameter { material: usize, reason: String },

    #[error("Invalid background: {0}")]
    InvalidBackground(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Scene description error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;
