//! Shading stage.
//!
//! Consumes each alive path's hit: adds emission, samples the material,
//! updates throughput and writes the next ray. A miss adds background
//! radiance and ends the path.

use rand::Rng;
use rayon::prelude::*;
use wave_core::{Color, Material, Scene};
use wave_math::{Ray, Vec3};

use crate::hit::HitRecord;
use crate::path::{PathState, TerminationCause};
use crate::sampling::{gen_f32, random_unit_vector};

/// Distance a spawned ray's origin is pushed off the surface.
const SPAWN_OFFSET: f32 = 1e-4;

/// Shade every alive path in place.
pub(crate) fn shade_paths(paths: &mut [PathState], scene: &Scene) {
    paths
        .par_iter_mut()
        .filter(|path| path.is_alive())
        .for_each(|path| shade_path(path, scene));
}

/// Group paths by the material they hit, misses and terminated paths last.
///
/// Pure reordering: each state moves whole, and no state reads another.
pub(crate) fn sort_by_material(paths: &mut [PathState]) {
    paths.par_sort_by_key(material_key);
}

fn material_key(path: &PathState) -> u32 {
    match (path.is_alive(), path.hit) {
        (true, Some(hit)) => hit.material,
        (true, None) => u32::MAX - 1,
        (false, _) => u32::MAX,
    }
}

fn shade_path(path: &mut PathState, scene: &Scene) {
    let Some(rec) = path.hit.take() else {
        let background = scene.background().radiance(path.ray.direction());
        path.radiance += path.throughput * background;
        path.terminate(TerminationCause::Miss);
        path.discard_if_unstable();
        return;
    };

    let material = scene.material(rec.material as usize);
    path.radiance += path.throughput * material.emitted();

    match scatter(material, &path.ray, &rec, &mut path.rng) {
        Some((attenuation, direction)) => {
            path.throughput *= attenuation;
            path.ray = spawn_ray(&rec, direction);
            path.bounces += 1;
            path.remaining_bounces = path.remaining_bounces.saturating_sub(1);
        }
        None if material.is_emissive() => path.terminate(TerminationCause::Emitter),
        None => path.terminate(TerminationCause::Absorbed),
    }

    path.discard_if_unstable();
}

/// New ray leaving `rec` in `direction`, offset to the side it travels into.
fn spawn_ray(rec: &HitRecord, direction: Vec3) -> Ray {
    let side = if direction.dot(rec.normal) >= 0.0 { 1.0 } else { -1.0 };
    Ray::new(rec.p + rec.normal * (SPAWN_OFFSET * side), direction)
}

/// Sample the material at a hit.
///
/// Returns the attenuation and the scattered direction, or `None` if the
/// path ends here.
pub(crate) fn scatter<R: Rng + ?Sized>(
    material: &Material,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut R,
) -> Option<(Color, Vec3)> {
    match *material {
        Material::Lambertian { albedo } => {
            // Scatter in a random direction on the hemisphere around the normal
            let mut direction = rec.normal + random_unit_vector(rng);

            // Catch degenerate scatter direction
            if direction.length_squared() < 1e-8 {
                direction = rec.normal;
            }
            Some((albedo, direction))
        }
        Material::Metal { albedo, fuzz } => {
            let reflected = reflect(ray_in.direction(), rec.normal);
            let direction = reflected + fuzz * random_unit_vector(rng);

            // Only scatter if the reflected ray is in the same hemisphere as the normal
            (direction.dot(rec.normal) > 0.0).then_some((albedo, direction))
        }
        Material::Dielectric { ior } => {
            let refraction_ratio = if rec.front_face { 1.0 / ior } else { ior };
            let unit_direction = ray_in.direction();
            let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

            // Check for total internal reflection
            let cannot_refract = refraction_ratio * sin_theta > 1.0;
            let direction =
                if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };
            Some((Color::ONE, direction))
        }
        Material::DiffuseLight { .. } => None,
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
