//! Wave Core - immutable scene database for the wave path tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Primitive` (sphere, triangle, transformed cube) with
//!   precomputed bounds
//! - **Materials**: the data-only `Material` model shaded by the renderer
//! - **Camera**: primary ray generation from externally drawn samples
//! - **Scene**: validated container built once per render, optionally from a
//!   serde `SceneDescription`
//!
//! # Example
//!
//! ```ignore
//! use wave_core::{Camera, Material, Primitive, Scene};
//!
//! let materials = vec![Material::lambertian(Color::splat(0.5))];
//! let primitives = vec![Primitive::sphere(Vec3::ZERO, 1.0, 0)];
//! let scene = Scene::new(primitives, materials, Camera::new())?;
//! ```

pub mod camera;
pub mod error;
pub mod material;
pub mod primitive;
pub mod scene;

// Re-export commonly used types
pub use camera::Camera;
pub use error::{SceneError, SceneResult};
pub use material::{Color, Material};
pub use primitive::{Primitive, Shape, SurfaceHit};
pub use scene::{Background, ObjectDescription, Scene, SceneDescription};
