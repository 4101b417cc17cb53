//! Radiance accumulation and output images.

use wave_core::Color;
use wave_math::{clamp_rgb, Vec3};

use crate::config::RenderConfig;
use crate::path::PathState;

/// Per-pixel radiance sums across every completed sample.
#[derive(Debug, Clone)]
pub struct Film {
    width: u32,
    height: u32,
    radiance: Vec<Color>,
    samples: u32,
}

impl Film {
    /// A black film of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            radiance: vec![Color::ZERO; width as usize * height as usize],
            samples: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Completed full-frame samples.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Raw radiance sums, row-major.
    pub fn radiance(&self) -> &[Color] {
        &self.radiance
    }

    /// Add the radiance of every finished path of one sample.
    ///
    /// Each pixel receives exactly one path per sample, so the result does not
    /// depend on the order paths arrive in.
    pub fn accumulate<'a>(&mut self, paths: impl IntoIterator<Item = &'a PathState>) {
        for path in paths {
            self.radiance[path.pixel as usize] += path.radiance;
        }
        self.samples += 1;
    }

    /// Clear every pixel and the sample count.
    pub fn clear(&mut self) {
        self.radiance.fill(Color::ZERO);
        self.samples = 0;
    }

    /// Average radiance per pixel, gamma mapped if the config asks for it.
    pub fn resolve(&self, config: &RenderConfig) -> Image {
        let scale = if self.samples > 0 {
            1.0 / self.samples as f32
        } else {
            0.0
        };
        let inv_gamma = 1.0 / config.gamma;
        let pixels = self
            .radiance
            .iter()
            .map(|&sum| {
                let mean = sum * scale;
                if config.gamma_correction {
                    clamp_rgb(mean).powf(inv_gamma)
                } else {
                    mean
                }
            })
            .collect();

        Image {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// Normalized image handed to output code at sample boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Row-major linear (or gamma mapped) RGB
    pub pixels: Vec<Vec3>,
}

impl Image {
    /// Pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Flat `[r, g, b, r, g, b, ...]` view.
    pub fn as_rgb_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// 8-bit RGBA with opaque alpha. Channels are clamped to `[0, 1]`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            let c = clamp_rgb(*pixel);
            out.push((c.x * 255.999) as u8);
            out.push((c.y * 255.999) as u8);
            out.push((c.z * 255.999) as u8);
            out.push(255);
        }
        out
    }

    /// Mean over all pixels.
    pub fn mean(&self) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }
        self.pixels.iter().copied().sum::<Vec3>() / self.pixels.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::path_rng;
    use wave_math::Ray;

    fn finished(pixel: u32, radiance: Color) -> PathState {
        let mut path = PathState::new(Ray::new(Vec3::ZERO, Vec3::X), pixel, 1, path_rng(0, 0, pixel));
        path.radiance = radiance;
        path
    }

    #[test]
    fn test_accumulate_and_resolve() {
        let mut film = Film::new(2, 1);
        film.accumulate(&[finished(0, Color::splat(1.0)), finished(1, Color::splat(3.0))]);
        film.accumulate(&[finished(1, Color::splat(1.0)), finished(0, Color::splat(0.0))]);

        let image = film.resolve(&RenderConfig::default());
        assert_eq!(film.samples(), 2);
        assert_eq!(image.get(0, 0), Color::splat(0.5));
        assert_eq!(image.get(1, 0), Color::splat(2.0));
    }

    #[test]
    fn test_gamma_clamps_and_maps() {
        let mut film = Film::new(2, 1);
        film.accumulate(&[finished(0, Color::splat(0.25)), finished(1, Color::splat(4.0))]);

        let config = RenderConfig {
            gamma_correction: true,
            gamma: 2.0,
            ..Default::default()
        };
        let image = film.resolve(&config);
        assert!((image.get(0, 0) - Color::splat(0.5)).length() < 1e-6);
        assert_eq!(image.get(1, 0), Color::ONE);
    }

    #[test]
    fn test_output_layouts() {
        let image = Image {
            width: 2,
            height: 1,
            pixels: vec![Vec3::new(1.0, 0.0, 0.5), Vec3::new(2.0, -1.0, 0.0)],
        };
        assert_eq!(image.as_rgb_f32(), &[1.0, 0.0, 0.5, 2.0, -1.0, 0.0]);
        assert_eq!(image.to_rgba8(), vec![255, 0, 127, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn test_clear() {
        let mut film = Film::new(1, 1);
        film.accumulate(&[finished(0, Color::ONE)]);
        film.clear();
        assert_eq!(film.samples(), 0);
        assert_eq!(film.resolve(&RenderConfig::default()).get(0, 0), Color::ZERO);
    }
}
