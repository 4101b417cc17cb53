//! Surface materials.
//!
//! Materials are plain data here; the renderer's shading stage owns the
//! scattering math. Keeping them as an enum lets the renderer group path
//! states by material without dynamic dispatch.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = Vec3;

/// How a surface responds to light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    /// Ideal diffuse reflector with cosine-weighted scattering.
    Lambertian { albedo: Color },

    /// Specular reflector. `fuzz` of 0 is a perfect mirror, 1 is very rough.
    Metal { albedo: Color, fuzz: f32 },

    /// Clear refractive surface (glass, water). Never absorbs.
    Dielectric { ior: f32 },

    /// Area light. Emits `emit` and terminates any path that reaches it.
    DiffuseLight { emit: Color },
}

impl Material {
    /// Create a Lambertian material with the given albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a metal; `fuzz` is clamped to `[0, 1]`.
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a dielectric with index of refraction `ior`
    /// (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn dielectric(ior: f32) -> Self {
        Material::Dielectric { ior }
    }

    /// Create an emitter.
    pub fn diffuse_light(emit: Color) -> Self {
        Material::DiffuseLight { emit }
    }

    /// Radiance emitted toward any viewer.
    pub fn emitted(&self) -> Color {
        match self {
            Material::DiffuseLight { emit } => *emit,
            _ => Color::ZERO,
        }
    }

    /// True if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emitted().length_squared() > 0.0
    }

    /// Check that the material cannot add energy or produce negative radiance.
    ///
    /// Reflectances must lie in `[0, 1]`, emission must be finite and
    /// non-negative, and the index of refraction finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Material::Lambertian { albedo } => check_reflectance(albedo),
            Material::Metal { albedo, fuzz } => {
                check_reflectance(albedo)?;
                if !(0.0..=1.0).contains(&fuzz) {
                    return Err(format!("fuzz {} outside [0, 1]", fuzz));
                }
                Ok(())
            }
            Material::Dielectric { ior } => {
                if ior.is_finite() && ior > 0.0 {
                    Ok(())
                } else {
                    Err(format!("index of refraction {} must be finite and positive", ior))
                }
            }
            Material::DiffuseLight { emit } => check_radiance(emit, "emission"),
        }
    }
}

fn check_reflectance(albedo: Color) -> Result<(), String> {
    if albedo.is_finite() && albedo.min_element() >= 0.0 && albedo.max_element() <= 1.0 {
        Ok(())
    } else {
        Err(format!("albedo {} outside [0, 1]", albedo))
    }
}

/// Radiance-like colors must be finite and non-negative.
pub(crate) fn check_radiance(color: Color, what: &str) -> Result<(), String> {
    if color.is_finite() && color.min_element() >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} {} must be finite and non-negative", what, color))
    }
}

impl Default for Material {
    fn default() -> Self {
        // Grey default
        Material::lambertian(Color::splat(0.5))
    }
}
