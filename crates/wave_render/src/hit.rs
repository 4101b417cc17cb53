//! Intersection record produced by the intersection stage.

use wave_core::SurfaceHit;
use wave_math::{Ray, Vec3};

/// Record of a ray-primitive intersection.
///
/// `Copy` so it can live inside a path state and in the first-hit cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Index of the primitive in the scene
    pub primitive: u32,
    /// Index of the primitive's material
    pub material: u32,
}

impl HitRecord {
    /// Orient a raw surface hit against the incoming ray.
    pub fn new(ray: &Ray, surface: SurfaceHit, primitive: u32, material: u32) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction().dot(surface.outward_normal) < 0.0;
        let normal = if front_face {
            surface.outward_normal
        } else {
            -surface.outward_normal
        };

        Self {
            p: surface.point,
            normal,
            t: surface.t,
            front_face,
            primitive,
            material,
        }
    }
}
