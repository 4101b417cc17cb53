// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Build an object-to-world matrix as translation × rotation × scale.
///
/// `rotation_degrees` holds Euler angles applied about X, then Y, then Z.
pub fn build_transformation_matrix(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    let translate = Mat4::from_translation(translation);
    let rotate = Mat4::from_rotation_x(rotation_degrees.x.to_radians())
        * Mat4::from_rotation_y(rotation_degrees.y.to_radians())
        * Mat4::from_rotation_z(rotation_degrees.z.to_radians());
    let scale = Mat4::from_scale(scale);
    translate * rotate * scale
}

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let lo = aabb.min_point();
        let hi = aabb.max_point();

        let mut result = Aabb::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            result.grow_point(self.transform_point3(corner));
        }

        Aabb::from_points(result.min_point(), result.max_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_identity() {
        let mat = build_transformation_matrix(Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        assert!(mat.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_build_order_is_translate_rotate_scale() {
        let mat = build_transformation_matrix(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 90.0),
            Vec3::new(2.0, 1.0, 1.0),
        );

        // Scale X by 2, rotate X onto Y, then translate.
        let p = mat.transform_point3(Vec3::X);
        assert!((p - Vec3::new(10.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let mat = build_transformation_matrix(Vec3::splat(5.0), Vec3::ZERO, Vec3::ONE);
        assert_eq!(mat.transform_vector3(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::splat(5.0));
        let transformed = mat.transform_aabb(&Aabb::from_points(Vec3::ZERO, Vec3::ONE));

        assert!((transformed.min_point() - Vec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max_point() - Vec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        let mat = build_transformation_matrix(Vec3::ZERO, Vec3::new(0.0, 45.0, 0.0), Vec3::ONE);
        let unit = Aabb::from_points(Vec3::splat(-0.5), Vec3::splat(0.5));
        let rotated = mat.transform_aabb(&unit);

        let half_diagonal = std::f32::consts::SQRT_2 * 0.5;
        assert!((rotated.x.max - half_diagonal).abs() < 1e-4);
        assert!((rotated.y.max - 0.5).abs() < 1e-4);
    }
}
