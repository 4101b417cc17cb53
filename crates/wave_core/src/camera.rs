//! Camera for primary ray generation.
//!
//! The camera does no sampling of its own: callers pass in the sub-pixel
//! offset and lens sample. This keeps random number generation owned by the
//! per-path state in the renderer, and lets a zero sample yield the same
//! pinhole ray through the pixel center on every call.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use wave_math::Ray;

use crate::error::{SceneError, SceneResult};

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    #[serde(skip)]
    center: Vec3,
    #[serde(skip)]
    pixel00_loc: Vec3,
    #[serde(skip)]
    pixel_delta_u: Vec3,
    #[serde(skip)]
    pixel_delta_v: Vec3,
    #[serde(skip)]
    w: Vec3,
    #[serde(skip)]
    defocus_disk_u: Vec3,
    #[serde(skip)]
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Validate the settings and compute the cached viewport basis.
    ///
    /// Called by [`Scene::new`](crate::Scene::new); rays generated before this
    /// point are meaningless.
    pub fn initialize(&mut self) -> SceneResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(SceneError::InvalidCamera(format!(
                "resolution {}x{} has no pixels",
                self.image_width, self.image_height
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::InvalidCamera(format!(
                "vertical fov {} outside (0, 180)",
                self.vfov
            )));
        }
        if !(self.focus_dist > 0.0) {
            return Err(SceneError::InvalidCamera(format!(
                "focus distance {} must be positive",
                self.focus_dist
            )));
        }
        let forward = self.look_from - self.look_at;
        if forward.length_squared() == 0.0 || self.vup.cross(forward).length_squared() == 0.0 {
            return Err(SceneError::InvalidCamera(
                "look direction is zero or parallel to up vector".to_string(),
            ));
        }

        self.center = self.look_from;

        // Calculate viewport dimensions
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = forward.normalize();
        let u = self.vup.cross(self.w).normalize();
        let v = self.w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;

        Ok(())
    }

    /// Total number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// True if rays spread over a lens instead of a pinhole.
    pub fn has_defocus(&self) -> bool {
        self.defocus_angle > 0.0
    }

    /// Generate the ray for pixel (i, j).
    ///
    /// `offset` is the sub-pixel position in `[-0.5, 0.5]^2`, `lens` a point in
    /// the unit disk. Both are ignored when zero, giving a pinhole ray through
    /// the pixel center.
    pub fn get_ray(&self, i: u32, j: u32, offset: Vec2, lens: Vec2) -> Ray {
        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.has_defocus() {
            self.center + lens.x * self.defocus_disk_u + lens.y * self.defocus_disk_v
        } else {
            self.center
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Pinhole ray through the center of pixel (i, j).
    pub fn center_ray(&self, i: u32, j: u32) -> Ray {
        self.get_ray(i, j, Vec2::ZERO, Vec2::ZERO)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize().unwrap();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert_eq!(camera.pixel_count(), 480_000);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let mut camera = Camera::new()
            .with_resolution(101, 101)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize().unwrap();

        let ray = camera.center_ray(50, 50);
        assert!((ray.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        // Pixel rows grow downward.
        let top = camera.center_ray(50, 0);
        assert!(top.direction().y > 0.0);
    }

    #[test]
    fn test_center_ray_is_repeatable() {
        let mut camera = Camera::new().with_resolution(16, 16);
        camera.initialize().unwrap();
        assert_eq!(camera.center_ray(3, 7), camera.center_ray(3, 7));
    }

    #[test]
    fn test_defocus_moves_origin() {
        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize().unwrap();

        let ray = camera.get_ray(5, 5, Vec2::ZERO, Vec2::new(0.5, 0.0));
        assert!(ray.origin().length() > 0.0);
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let mut zero = Camera::new().with_resolution(0, 10);
        assert!(matches!(zero.initialize(), Err(SceneError::InvalidCamera(_))));

        let mut parallel = Camera::new().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert!(parallel.initialize().is_err());
    }
}
