use crate::{
    camera::Camera,
    hittable::World,
    renderer::RenderConfig,
    scenes,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Field of random small spheres around three large ones
    Cover,
    /// Diffuse, metal and glass spheres side by side
    Showcase,
    /// Showcase with a hollow glass sphere
    Hollow,
}

#[derive(Debug, Parser)]
#[command(name = "weekend_tracer")]
#[command(about = "Recursive path tracer for scenes made of spheres")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 384)]
    pub width: usize,

    /// Image height in pixels (defaults to a 16:9 aspect ratio)
    #[arg(long)]
    pub height: Option<usize>,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value_t = 100)]
    pub samples: u32,

    /// Maximum number of bounces per camera ray
    #[arg(long, default_value_t = 50)]
    pub max_depth: u32,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = SceneChoice::Cover)]
    pub scene: SceneChoice,

    /// Output file, .png or .ppm. Use - for PPM on stdout
    #[arg(short, long, default_value = "image.ppm")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            image_width: self.width,
            image_height: self.height.unwrap_or(self.width * 9 / 16),
            samples_per_pixel: self.samples,
            max_depth: self.max_depth,
            seed: self.seed,
        }
    }

    /// Builds the chosen scene and a camera matching the image's aspect ratio
    pub fn scene(&self, config: &RenderConfig) -> (World, Camera) {
        let aspect_ratio = config.aspect_ratio();
        match self.scene {
            SceneChoice::Cover => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                (
                    scenes::random_scene(&mut rng),
                    scenes::cover_camera(aspect_ratio),
                )
            }
            SceneChoice::Showcase => (
                scenes::material_showcase(false),
                scenes::showcase_camera(aspect_ratio),
            ),
            SceneChoice::Hollow => (
                scenes::material_showcase(true),
                scenes::showcase_camera(aspect_ratio),
            ),
        }
    }
}

/// Initialize the logger, `RUST_LOG` is still honored for per-module filters
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
