//! Math primitives for the wave path tracer.
//!
//! Re-exports glam and adds the small set of geometric types the renderer
//! shares across crates: rays, intervals, bounding boxes, transforms and
//! scalar/color utilities.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod transform;
mod utility;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, RAY_T_MIN};
pub use transform::{build_transformation_matrix, Mat4Ext};
pub use utility::{clamp, clamp_rgb, epsilon_check, EPSILON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.max_element(), 3.0);
    }
}
