//! Small scenes shared by the renderer's tests.

use wave_core::{Background, Camera, Color, Material, Primitive, Scene};
use wave_math::Vec3;

pub const ALBEDO: Color = Color::new(0.5, 0.25, 0.75);
pub const SKY: Color = Color::new(0.8, 0.9, 1.0);
pub const EMIT: Color = Color::new(4.0, 4.0, 3.0);
/// Material index of the emitter in [`light_and_sphere`].
pub const LIGHT_MATERIAL: u32 = 1;

fn camera_looking_down_z(width: u32, height: u32, vfov: f32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(vfov, 0.0, 1.0)
}

/// One diffuse sphere in the middle of the frame under a uniform sky.
pub fn diffuse_sphere_under_sky(width: u32, height: u32) -> Scene {
    Scene::new(
        vec![Primitive::sphere(Vec3::new(0.0, 0.0, -2.0), 1.0, 0)],
        vec![Material::lambertian(ALBEDO)],
        camera_looking_down_z(width, height, 90.0),
    )
    .unwrap()
    .with_background(Background::Solid { color: SKY })
    .unwrap()
}

/// A diffuse sphere covering every pixel, under a uniform sky.
pub fn sphere_filling_view(width: u32, height: u32) -> Scene {
    Scene::new(
        vec![Primitive::sphere(Vec3::new(0.0, 0.0, -10.0), 5.0, 0)],
        vec![Material::lambertian(ALBEDO)],
        camera_looking_down_z(width, height, 20.0),
    )
    .unwrap()
    .with_background(Background::Solid { color: SKY })
    .unwrap()
}

/// Camera one unit above a wide diffuse floor, looking straight down, under
/// the sky gradient. Every primary ray hits the floor.
pub fn diffuse_floor_under_gradient(width: u32, height: u32) -> Scene {
    let extent = 1000.0;
    let corner = |x: f32, z: f32| Vec3::new(x * extent, 0.0, z * extent);
    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::Y, Vec3::ZERO, Vec3::Z)
        .with_lens(60.0, 0.0, 1.0);

    Scene::new(
        vec![
            Primitive::triangle(corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), 0),
            Primitive::triangle(corner(-1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0), 0),
        ],
        vec![Material::lambertian(ALBEDO)],
        camera,
    )
    .unwrap()
    .with_background(Background::SkyGradient)
    .unwrap()
}

/// Emissive sphere on the left, diffuse sphere on the right, black background.
pub fn light_and_sphere(width: u32, height: u32) -> Scene {
    Scene::new(
        vec![
            Primitive::sphere(Vec3::new(-0.6, 0.0, -2.0), 0.4, LIGHT_MATERIAL as usize),
            Primitive::sphere(Vec3::new(0.6, 0.0, -2.0), 0.4, 0),
        ],
        vec![Material::lambertian(ALBEDO), Material::diffuse_light(EMIT)],
        camera_looking_down_z(width, height, 90.0),
    )
    .unwrap()
}

/// Camera inside a closed mirror cube. Paths never escape.
pub fn mirror_box(width: u32, height: u32) -> Scene {
    Scene::new(
        vec![Primitive::cube(Vec3::ZERO, Vec3::new(0.0, 30.0, 0.0), Vec3::splat(4.0), 0)],
        vec![Material::metal(Color::splat(0.9), 0.0)],
        camera_looking_down_z(width, height, 90.0),
    )
    .unwrap()
}

/// Closed Cornell-style box with a ceiling light, a mirror ball and a glass ball.
pub fn cornell_box(width: u32, height: u32) -> Scene {
    let white = 0;
    let red = 1;
    let green = 2;
    let light = 3;
    let mirror = 4;
    let glass = 5;
    let materials = vec![
        Material::lambertian(Color::splat(0.73)),
        Material::lambertian(Color::new(0.65, 0.05, 0.05)),
        Material::lambertian(Color::new(0.12, 0.45, 0.15)),
        Material::diffuse_light(Color::splat(15.0)),
        Material::metal(Color::splat(0.8), 0.1),
        Material::dielectric(1.5),
    ];

    let wall = |translation: Vec3, scale: Vec3, material: usize| {
        Primitive::cube(translation, Vec3::ZERO, scale, material)
    };
    let primitives = vec![
        wall(Vec3::new(-1.05, 0.0, 0.0), Vec3::new(0.1, 2.2, 2.2), red),
        wall(Vec3::new(1.05, 0.0, 0.0), Vec3::new(0.1, 2.2, 2.2), green),
        wall(Vec3::new(0.0, -1.05, 0.0), Vec3::new(2.2, 0.1, 2.2), white),
        wall(Vec3::new(0.0, 1.05, 0.0), Vec3::new(2.2, 0.1, 2.2), white),
        wall(Vec3::new(0.0, 0.0, 1.05), Vec3::new(2.2, 2.2, 0.1), white),
        // Back wall as two triangles
        Primitive::triangle(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            white,
        ),
        Primitive::triangle(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            white,
        ),
        wall(Vec3::new(0.0, 0.98, -0.2), Vec3::new(0.5, 0.02, 0.5), light),
        Primitive::sphere(Vec3::new(-0.45, -0.65, -0.4), 0.35, mirror),
        Primitive::sphere(Vec3::new(0.45, -0.65, 0.1), 0.35, glass),
        Primitive::cube(
            Vec3::new(0.3, -0.7, -0.6),
            Vec3::new(0.0, 20.0, 0.0),
            Vec3::new(0.5, 0.6, 0.5),
            white,
        ),
    ];

    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(0.0, 0.0, 0.9), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(70.0, 0.0, 1.0);

    Scene::new(primitives, materials, camera)
        .unwrap()
        .with_name("cornell_box")
}
