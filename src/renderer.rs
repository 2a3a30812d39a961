//! Path tracing core and the sampling driver around it.
//!
//! [`ray_color`] follows one camera sample through the scene. [`render`] averages many of those
//! per pixel, spreading pixels over the rayon thread pool.

use crate::{
    camera::Camera,
    hittable::{Hit, World},
    material::Scatter,
    ray::Ray,
    vec3::{unit_vector, Color, Float},
};
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::info;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;

/// Scattered rays start slightly off the surface to avoid shadow acne
pub const T_MIN: Float = 0.001;
pub const T_MAX: Float = Float::INFINITY;

pub const SKY_HORIZON: Color = Color::new(1.0, 1.0, 1.0);
pub const SKY_ZENITH: Color = Color::new(0.5, 0.7, 1.0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("image width must be at least 1 pixel")]
    ZeroWidth,
    #[error("image height must be at least 1 pixel")]
    ZeroHeight,
    #[error("at least one sample per pixel is required")]
    ZeroSamples,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub image_width: usize,
    pub image_height: usize,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Fixed seed for reproducible renders. A random one is picked when unset.
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let image_width = 384;
        Self {
            image_width,
            image_height: image_width * 9 / 16,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.image_height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> Float {
        self.image_width as Float / self.image_height as Float
    }
}

/// Linear, averaged pixel colors. Row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Image {
    /// `y` counts down from the top row
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }
}

/// Environment light: white at the horizon blending to sky blue straight up
pub fn sky_color(ray: &Ray) -> Color {
    let unit_dir = unit_vector(ray.direction);
    let a = 0.5 * (unit_dir.y + 1.0);
    SKY_HORIZON * (1.0 - a) + SKY_ZENITH * a
}

/// Radiance carried back along `ray`, following at most `depth` bounces.
pub fn ray_color(ray: &Ray, world: &World, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget exhausted, no more light gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(hit) = world.hit(ray, T_MIN, T_MAX) else {
        return sky_color(ray);
    };

    match hit.material.scatter(ray, &hit, rng) {
        Some((attenuation, scattered)) => {
            attenuation * ray_color(&scattered, world, depth - 1, rng)
        }
        None => Color::ZERO, // absorbed
    }
}

/// Spreads the seed over pixel indices so neighbouring pixels get unrelated streams
fn pixel_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Averages `samples_per_pixel` jittered camera samples for pixel `(i, j)`, `j` counting up
/// from the bottom row.
pub fn render_pixel(
    config: &RenderConfig,
    camera: &Camera,
    world: &World,
    i: usize,
    j: usize,
    rng: &mut dyn RngCore,
) -> Color {
    // A single row or column has no span to normalize over
    let width_span = config.image_width.saturating_sub(1).max(1) as Float;
    let height_span = config.image_height.saturating_sub(1).max(1) as Float;

    let total: Color = (0..config.samples_per_pixel)
        .map(|_| {
            let s = (i as Float + rng.gen::<Float>()) / width_span;
            let t = (j as Float + rng.gen::<Float>()) / height_span;
            let ray = camera.get_ray(s, t, rng);
            ray_color(&ray, world, config.max_depth, rng)
        })
        .sum();
    total / config.samples_per_pixel as Float
}

/// Renders every pixel in parallel. Each pixel owns a generator seeded from the config seed and
/// its index, so a fixed seed gives the same image whatever the thread count.
pub fn render(
    config: &RenderConfig,
    camera: &Camera,
    world: &World,
    progress_bar: ProgressBar,
) -> Result<Image, ConfigError> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let (width, height) = (config.image_width, config.image_height);
    info!(
        "Rendering {}x{} at {} sample(s) per pixel, max depth {}, seed {}",
        width, height, config.samples_per_pixel, config.max_depth, seed
    );

    let start = Instant::now();
    let rows: Vec<Vec<Color>> = (0..height)
        .into_par_iter()
        .progress_with(progress_bar)
        .map(|y| {
            let j = height - 1 - y;
            (0..width)
                .map(|i| {
                    let mut rng = StdRng::seed_from_u64(pixel_seed(seed, y * width + i));
                    render_pixel(config, camera, world, i, j, &mut rng)
                })
                .collect()
        })
        .collect();

    let duration = start.elapsed().as_secs_f64();
    let total_rays = width * height * config.samples_per_pixel as usize;
    info!(
        "Rendered in {:.2} seconds, {:.2} million camera rays/second",
        duration,
        total_rays as f64 / 1_000_000.0 / duration.max(Float::EPSILON)
    );

    Ok(Image {
        width,
        height,
        pixels: rows.concat(),
    })
}
