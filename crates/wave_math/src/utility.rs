//! Scalar and color helpers shared by shading and tone mapping.

use glam::Vec3;

/// Tolerance for floating-point near-equality.
pub const EPSILON: f32 = 0.00001;

/// Clamp `f` to `[min, max]`.
#[inline]
pub fn clamp(f: f32, min: f32, max: f32) -> f32 {
    if f < min {
        min
    } else if f > max {
        max
    } else {
        f
    }
}

/// Clamp every channel of a color to `[0, 1]`.
#[inline]
pub fn clamp_rgb(color: Vec3) -> Vec3 {
    Vec3::new(
        clamp(color.x, 0.0, 1.0),
        clamp(color.y, 0.0, 1.0),
        clamp(color.z, 0.0, 1.0),
    )
}

/// True if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn epsilon_check(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp(7.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_clamp_rgb() {
        let c = clamp_rgb(Vec3::new(-0.5, 0.5, 3.0));
        assert_eq!(c, Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_epsilon_check() {
        assert!(epsilon_check(1.0, 1.0 + EPSILON * 0.5));
        assert!(!epsilon_check(1.0, 1.001));
    }
}
