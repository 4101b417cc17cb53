//! Renderable shapes with a material reference and precomputed bounds.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use wave_math::{build_transformation_matrix, Aabb, Interval, Mat4Ext, Ray};

/// Bounds are grown by this much on every side so box tests stay
/// conservative under floating-point error.
const BBOX_PADDING: f32 = 0.0001;

/// Raw result of a shape intersection, before the renderer orients the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter of the hit
    pub t: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Unit normal pointing out of the surface
    pub outward_normal: Vec3,
}

/// Geometry of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    Triangle {
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
    },
    /// Unit cube centered at the origin, placed by `object_to_world`.
    Cube {
        object_to_world: Mat4,
    },
}

/// A shape bound to a material, with cached world-space bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    shape: Shape,
    material: usize,
    bbox: Aabb,
    /// Inverse and inverse-transpose of a cube's transform
    world_to_object: Mat4,
    normal_matrix: Mat4,
}

impl Primitive {
    /// Create a primitive from any shape.
    pub fn new(shape: Shape, material: usize) -> Self {
        let (bbox, world_to_object, normal_matrix) = match shape {
            Shape::Sphere { center, radius } => {
                let rvec = Vec3::splat(radius.abs() + BBOX_PADDING);
                (
                    Aabb::from_points(center - rvec, center + rvec),
                    Mat4::IDENTITY,
                    Mat4::IDENTITY,
                )
            }
            Shape::Triangle { v0, v1, v2 } => {
                let min = v0.min(v1).min(v2) - Vec3::splat(BBOX_PADDING);
                let max = v0.max(v1).max(v2) + Vec3::splat(BBOX_PADDING);
                (Aabb::from_points(min, max), Mat4::IDENTITY, Mat4::IDENTITY)
            }
            Shape::Cube { object_to_world } => {
                let unit = Aabb::from_points(Vec3::splat(-0.5), Vec3::splat(0.5));
                let inverse = object_to_world.inverse();
                let bounds = object_to_world.transform_aabb(&unit);
                (
                    Aabb::from_points(
                        bounds.min_point() - Vec3::splat(BBOX_PADDING),
                        bounds.max_point() + Vec3::splat(BBOX_PADDING),
                    ),
                    inverse,
                    inverse.transpose(),
                )
            }
        };

        Self {
            shape,
            material,
            bbox,
            world_to_object,
            normal_matrix,
        }
    }

    /// Create a sphere.
    pub fn sphere(center: Vec3, radius: f32, material: usize) -> Self {
        Self::new(Shape::Sphere { center, radius }, material)
    }

    /// Create a triangle from three vertices (counter-clockwise front face).
    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3, material: usize) -> Self {
        Self::new(Shape::Triangle { v0, v1, v2 }, material)
    }

    /// Create a unit cube placed by translation × rotation (degrees) × scale.
    pub fn cube(translation: Vec3, rotation_degrees: Vec3, scale: Vec3, material: usize) -> Self {
        let object_to_world = build_transformation_matrix(translation, rotation_degrees, scale);
        Self::new(Shape::Cube { object_to_world }, material)
    }

    /// The primitive's geometry.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Index into the scene's material table.
    pub fn material(&self) -> usize {
        self.material
    }

    /// World-space bounding box.
    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// True if this primitive cannot be intersected meaningfully
    /// (zero-area triangle, non-positive radius, singular transform, NaN input).
    pub fn is_degenerate(&self) -> bool {
        match self.shape {
            Shape::Sphere { center, radius } => {
                !center.is_finite() || !radius.is_finite() || radius <= 0.0
            }
            Shape::Triangle { v0, v1, v2 } => {
                // Squared doubled area against the squared longest edge, so
                // the test is independent of the triangle's scale
                let area2 = (v1 - v0).cross(v2 - v0).length_squared();
                let longest = (v1 - v0)
                    .length_squared()
                    .max((v2 - v0).length_squared())
                    .max((v2 - v1).length_squared());
                !(v0.is_finite() && v1.is_finite() && v2.is_finite())
                    || !area2.is_finite()
                    || area2 <= f32::EPSILON * longest * longest
            }
            Shape::Cube { object_to_world } => {
                // Volume against the product of the axis lengths
                let det = object_to_world.determinant();
                let axes = object_to_world.x_axis.truncate().length()
                    * object_to_world.y_axis.truncate().length()
                    * object_to_world.z_axis.truncate().length();
                !det.is_finite() || det.abs() <= f32::EPSILON * axes
            }
        }
    }

    /// Nearest intersection with `t` strictly inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        match self.shape {
            Shape::Sphere { center, radius } => hit_sphere(center, radius, ray, ray_t),
            Shape::Triangle { v0, v1, v2 } => hit_triangle(v0, v1, v2, ray, ray_t),
            Shape::Cube { object_to_world } => self.hit_cube(&object_to_world, ray, ray_t),
        }
    }

    /// Slab test against the unit cube in object space.
    ///
    /// The object-space direction is left unnormalized so `t` is shared
    /// between both spaces.
    fn hit_cube(&self, object_to_world: &Mat4, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        let origin = self.world_to_object.transform_point3(ray.origin());
        let direction = self.world_to_object.transform_vector3(ray.direction());

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let inv = 1.0 / direction[axis];
            let mut t0 = (-0.5 - origin[axis]) * inv;
            let mut t1 = (0.5 - origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t0.max(t_near);
            t_far = t1.min(t_far);
        }
        if t_far < t_near || t_far.is_nan() || t_near.is_nan() {
            return None;
        }

        let t = if ray_t.surrounds(t_near) {
            t_near
        } else if ray_t.surrounds(t_far) {
            t_far
        } else {
            return None;
        };

        // Face normal from the dominant coordinate of the object-space hit point
        let local = origin + direction * t;
        let magnitude = local.abs();
        let axis = if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
            0
        } else if magnitude.y >= magnitude.z {
            1
        } else {
            2
        };
        let mut local_normal = Vec3::ZERO;
        local_normal[axis] = local[axis].signum();

        Some(SurfaceHit {
            t,
            point: object_to_world.transform_point3(local),
            outward_normal: self.normal_matrix.transform_vector3(local_normal).normalize(),
        })
    }
}

fn hit_sphere(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let point = ray.at(root);
    Some(SurfaceHit {
        t: root,
        point,
        outward_normal: (point - center) / radius,
    })
}

/// Möller-Trumbore ray-triangle intersection.
fn hit_triangle(v0: Vec3, v1: Vec3, v2: Vec3, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle (relative to its size)
    if a.abs() < 1e-8 * edge1.length() * edge2.length() {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(SurfaceHit {
        t,
        point: ray.at(t),
        outward_normal: edge1.cross(edge2).normalize(),
    })
}
