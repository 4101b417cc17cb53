use crate::{Interval, Vec3};

/// Default lower bound of a ray's parametric interval.
///
/// Keeps secondary rays from re-hitting the surface they were spawned on.
pub const RAY_T_MIN: f32 = 1e-4;

/// A ray in 3D space with a normalized direction and a valid parametric range.
///
/// Only hits with `t` strictly inside `interval` count as intersections.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub interval: Interval,
}

impl Ray {
    /// Create a new ray over `[RAY_T_MIN, inf)`. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, Interval::new(RAY_T_MIN, f32::INFINITY))
    }

    /// Create a ray with an explicit parametric interval.
    pub fn with_interval(origin: Vec3, direction: Vec3, interval: Interval) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            interval,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (unit length) direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}
