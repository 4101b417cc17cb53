//! Scene database built once per render.
//!
//! A `Scene` is immutable after construction: the renderer only ever holds
//! shared references to it. All validation a loader could trip over
//! (dangling material indices, an unusable camera) happens here, before any
//! rendering starts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{SceneError, SceneResult};
use crate::material::{check_radiance, Color, Material};
use crate::primitive::Primitive;

/// Radiance seen by rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// Uniform environment color (black by default).
    Solid { color: Color },
    /// White at the horizon blending to light blue overhead.
    SkyGradient,
}

impl Background {
    /// Radiance arriving from `direction` (unit length).
    pub fn radiance(&self, direction: Vec3) -> Color {
        match self {
            Background::Solid { color } => *color,
            Background::SkyGradient => {
                let a = 0.5 * (direction.y + 1.0);
                let white = Color::new(1.0, 1.0, 1.0);
                let blue = Color::new(0.5, 0.7, 1.0);
                white * (1.0 - a) + blue * a
            }
        }
    }
}

impl Background {
    /// Background radiance must be finite and non-negative.
    pub fn validate(&self) -> SceneResult<()> {
        match self {
            Background::Solid { color } => {
                check_radiance(*color, "color").map_err(SceneError::InvalidBackground)
            }
            Background::SkyGradient => Ok(()),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid { color: Color::ZERO }
    }
}

/// Immutable geometric and material database for one render.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,
    primitives: Vec<Primitive>,
    materials: Vec<Material>,
    camera: Camera,
    background: Background,
}

impl Scene {
    /// Build a scene, validating materials, material references and the camera.
    ///
    /// An empty primitive list is accepted here; the accelerator build is
    /// where an empty scene becomes fatal.
    pub fn new(
        primitives: Vec<Primitive>,
        materials: Vec<Material>,
        mut camera: Camera,
    ) -> SceneResult<Self> {
        if materials.is_empty() && !primitives.is_empty() {
            return Err(SceneError::NoMaterials);
        }
        for (index, material) in materials.iter().enumerate() {
            material
                .validate()
                .map_err(|reason| SceneError::InvalidMaterialParameter {
                    material: index,
                    reason,
                })?;
        }
        for (index, primitive) in primitives.iter().enumerate() {
            if primitive.material() >= materials.len() {
                return Err(SceneError::InvalidMaterial {
                    primitive: index,
                    material: primitive.material(),
                });
            }
        }
        camera.initialize()?;

        log::info!(
            "Scene: {} primitives, {} materials, {}x{} camera",
            primitives.len(),
            materials.len(),
            camera.image_width,
            camera.image_height
        );

        Ok(Self {
            name: String::new(),
            primitives,
            materials,
            camera,
            background: Background::default(),
        })
    }

    /// Set the environment seen by escaping rays.
    pub fn with_background(mut self, background: Background) -> SceneResult<Self> {
        background.validate()?;
        self.background = background;
        Ok(self)
    }

    /// Set the scene name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build a scene from a deserialized description.
    pub fn from_description(description: SceneDescription) -> SceneResult<Self> {
        let primitives = description
            .objects
            .iter()
            .map(ObjectDescription::to_primitive)
            .collect();
        Ok(Self::new(primitives, description.materials, description.camera)?
            .with_background(description.background)?
            .with_name(description.name))
    }

    /// Parse a JSON scene description and build the scene.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        Self::from_description(description)
    }

    /// All primitives, in loader order. Primitive ids are indices into this slice.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Material table.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material by index. Indices are validated at construction.
    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    /// The initialized camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Environment radiance for escaping rays.
    pub fn background(&self) -> &Background {
        &self.background
    }
}

/// Serializable scene, the form a loader hands to [`Scene::from_description`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub name: String,
    pub camera: Camera,
    pub background: Background,
    pub materials: Vec<Material>,
    pub objects: Vec<ObjectDescription>,
}

/// One object of a [`SceneDescription`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: Vec3,
        radius: f32,
        material: usize,
    },
    Triangle {
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        material: usize,
    },
    Cube {
        #[serde(default)]
        translation: Vec3,
        /// Euler angles in degrees
        #[serde(default)]
        rotation: Vec3,
        #[serde(default = "unit_scale")]
        scale: Vec3,
        material: usize,
    },
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl ObjectDescription {
    fn to_primitive(&self) -> Primitive {
        match *self {
            ObjectDescription::Sphere {
                center,
                radius,
                material,
            } => Primitive::sphere(center, radius, material),
            ObjectDescription::Triangle {
                v0,
                v1,
                v2,
                material,
            } => Primitive::triangle(v0, v1, v2, material),
            ObjectDescription::Cube {
                translation,
                rotation,
                scale,
                material,
            } => Primitive::cube(translation, rotation, scale, material),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Shape;

    fn small_camera() -> Camera {
        Camera::new().with_resolution(4, 4)
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new(
            vec![Primitive::sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, 0)],
            vec![Material::default()],
            small_camera(),
        )
        .unwrap();

        assert_eq!(scene.primitives().len(), 1);
        assert_eq!(scene.material(0), &Material::default());
        assert_eq!(scene.background(), &Background::default());
    }

    #[test]
    fn test_dangling_material_rejected() {
        let result = Scene::new(
            vec![
                Primitive::sphere(Vec3::ZERO, 1.0, 0),
                Primitive::sphere(Vec3::ONE, 1.0, 3),
            ],
            vec![Material::default()],
            small_camera(),
        );

        assert!(matches!(
            result,
            Err(SceneError::InvalidMaterial { primitive: 1, material: 3 })
        ));
    }

    #[test]
    fn test_missing_materials_rejected() {
        let result = Scene::new(
            vec![Primitive::sphere(Vec3::ZERO, 1.0, 0)],
            vec![],
            small_camera(),
        );
        assert!(matches!(result, Err(SceneError::NoMaterials)));
    }

    #[test]
    fn test_invalid_materials_rejected() {
        let negative_light = Scene::new(
            vec![Primitive::sphere(Vec3::ZERO, 1.0, 1)],
            vec![
                Material::default(),
                Material::diffuse_light(Color::splat(-2.0)),
            ],
            small_camera(),
        );
        assert!(matches!(
            negative_light,
            Err(SceneError::InvalidMaterialParameter { material: 1, .. })
        ));

        let bright_albedo = Scene::new(
            vec![Primitive::sphere(Vec3::ZERO, 1.0, 0)],
            vec![Material::lambertian(Color::new(0.5, 1.2, 0.5))],
            small_camera(),
        );
        assert!(matches!(
            bright_albedo,
            Err(SceneError::InvalidMaterialParameter { material: 0, .. })
        ));

        // Unreferenced materials are checked too
        let bad_ior = Scene::new(
            vec![Primitive::sphere(Vec3::ZERO, 1.0, 0)],
            vec![Material::default(), Material::dielectric(f32::NAN)],
            small_camera(),
        );
        assert!(bad_ior.is_err());
    }

    #[test]
    fn test_invalid_background_rejected() {
        let scene = Scene::new(
            vec![Primitive::sphere(Vec3::ZERO, 1.0, 0)],
            vec![Material::default()],
            small_camera(),
        )
        .unwrap();

        let negative = scene.clone().with_background(Background::Solid {
            color: Color::new(0.2, -0.1, 0.2),
        });
        assert!(matches!(negative, Err(SceneError::InvalidBackground(_))));

        let infinite = scene.clone().with_background(Background::Solid {
            color: Color::splat(f32::INFINITY),
        });
        assert!(infinite.is_err());

        assert!(scene.with_background(Background::SkyGradient).is_ok());
    }

    #[test]
    fn test_json_material_validated() {
        let json = r#"{
            "camera": { "image_width": 4, "image_height": 4 },
            "materials": [ { "type": "diffuse_light", "emit": [-1.0, 0.0, 0.0] } ],
            "objects": [ { "type": "sphere", "center": [0.0, 0.0, -1.0], "radius": 0.5, "material": 0 } ]
        }"#;
        assert!(matches!(
            Scene::from_json_str(json),
            Err(SceneError::InvalidMaterialParameter { material: 0, .. })
        ));
    }

    #[test]
    fn test_sky_gradient() {
        let sky = Background::SkyGradient;
        let up = sky.radiance(Vec3::Y);
        let down = sky.radiance(-Vec3::Y);

        // Up is blue-ish, down is white
        assert!(up.x < down.x);
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_scene_from_json() {
        let json = r#"{
            "name": "json_box",
            "camera": { "image_width": 8, "image_height": 6 },
            "background": { "type": "sky_gradient" },
            "materials": [
                { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] },
                { "type": "diffuse_light", "emit": [4.0, 4.0, 4.0] }
            ],
            "objects": [
                { "type": "sphere", "center": [0.0, 0.0, -1.0], "radius": 0.5, "material": 0 },
                { "type": "cube", "translation": [0.0, 2.0, -1.0], "material": 1 },
                { "type": "triangle", "v0": [0.0, 0.0, -2.0], "v1": [1.0, 0.0, -2.0], "v2": [0.0, 1.0, -2.0], "material": 0 }
            ]
        }"#;

        let scene = Scene::from_json_str(json).unwrap();
        assert_eq!(scene.name, "json_box");
        assert_eq!(scene.camera().pixel_count(), 48);
        assert_eq!(scene.primitives().len(), 3);
        assert_eq!(scene.background(), &Background::SkyGradient);
        assert!(matches!(scene.primitives()[1].shape(), Shape::Cube { .. }));
        assert!(scene.material(1).is_emissive());
    }

    #[test]
    fn test_scene_from_bad_json() {
        assert!(matches!(
            Scene::from_json_str("{ \"objects\": 3 }"),
            Err(SceneError::Json(_))
        ));
    }
}
