//! Cornell box example.
//!
//! Renders a Cornell-style box and saves it as PNG. Pass a scene JSON path
//! and optionally a render config JSON path to render something else:
//!
//! ```text
//! RUST_LOG=info cargo run --release --example cornell -- [scene.json] [config.json]
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use wave_core::{Material, ObjectDescription, SceneDescription};
use wave_render::{Background, Camera, Color, RenderConfig, Renderer, Scene, Vec3};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scene = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading scene {}", path))?;
            Scene::from_json_str(&json).with_context(|| format!("loading scene {}", path))?
        }
        None => Scene::from_description(cornell_description())?,
    };
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            RenderConfig::from_json_str(&json)?
        }
        None => RenderConfig {
            samples_per_pixel: 64,
            max_depth: 8,
            stream_compaction: true,
            sort_by_material: true,
            gamma_correction: true,
            ..Default::default()
        },
    };

    let mut renderer = Renderer::new(scene, config)?;

    // Observer thread polls progress while the render runs
    let progress = renderer.progress();
    let finished = Arc::new(AtomicBool::new(false));
    let observer = {
        let finished = finished.clone();
        std::thread::spawn(move || {
            while !finished.load(Ordering::Acquire) {
                let snapshot = progress.snapshot();
                log::info!(
                    "sample {} depth {} ({:?}), {} done",
                    snapshot.sample,
                    snapshot.depth,
                    snapshot.phase,
                    snapshot.completed_samples
                );
                std::thread::sleep(Duration::from_millis(250));
            }
        })
    };

    let image = renderer.render_with(|report, _| {
        log::debug!(
            "sample {}: {} bounces, {} nodes visited",
            report.sample,
            report.bounces,
            report.traversal.nodes_visited
        );
    });
    finished.store(true, Ordering::Release);
    observer
        .join()
        .map_err(|_| anyhow::anyhow!("progress observer panicked"))?;

    let filename = format!("{}.png", renderer.scene().name);
    image::save_buffer(
        &filename,
        &image.to_rgba8(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("saving {}", filename))?;
    log::info!("Saved {}", filename);

    Ok(())
}

fn cornell_description() -> SceneDescription {
    let wall = |translation: Vec3, scale: Vec3, material: usize| ObjectDescription::Cube {
        translation,
        rotation: Vec3::ZERO,
        scale,
        material,
    };

    SceneDescription {
        name: "cornell".to_string(),
        camera: Camera::new()
            .with_resolution(400, 400)
            .with_position(Vec3::new(0.0, 0.0, 3.4), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 3.4),
        background: Background::Solid { color: Color::ZERO },
        materials: vec![
            Material::lambertian(Color::splat(0.73)),
            Material::lambertian(Color::new(0.65, 0.05, 0.05)),
            Material::lambertian(Color::new(0.12, 0.45, 0.15)),
            Material::diffuse_light(Color::splat(15.0)),
            Material::metal(Color::new(0.8, 0.85, 0.88), 0.05),
            Material::dielectric(1.5),
        ],
        objects: vec![
            wall(Vec3::new(-1.05, 0.0, 0.0), Vec3::new(0.1, 2.2, 2.2), 1),
            wall(Vec3::new(1.05, 0.0, 0.0), Vec3::new(0.1, 2.2, 2.2), 2),
            wall(Vec3::new(0.0, -1.05, 0.0), Vec3::new(2.2, 0.1, 2.2), 0),
            wall(Vec3::new(0.0, 1.05, 0.0), Vec3::new(2.2, 0.1, 2.2), 0),
            wall(Vec3::new(0.0, 0.0, -1.05), Vec3::new(2.2, 2.2, 0.1), 0),
            wall(Vec3::new(0.0, 0.99, 0.0), Vec3::new(0.6, 0.01, 0.6), 3),
            ObjectDescription::Cube {
                translation: Vec3::new(0.35, -0.4, -0.3),
                rotation: Vec3::new(0.0, 18.0, 0.0),
                scale: Vec3::new(0.55, 1.2, 0.55),
                material: 0,
            },
            ObjectDescription::Sphere {
                center: Vec3::new(-0.4, -0.65, 0.2),
                radius: 0.35,
                material: 4,
            },
            ObjectDescription::Sphere {
                center: Vec3::new(0.3, -0.8, 0.5),
                radius: 0.2,
                material: 5,
            },
        ],
    }
}
