//! Encoding of rendered images: gamma correction, quantization, and PPM/PNG writers.

use crate::{
    renderer::Image,
    vec3::{Color, Float},
};
use image::{ImageError, RgbImage};
use log::{info, warn};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write image: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] ImageError),
}

/// Take a positive color value in linear space from 0.0 to 1.0 and convert it to gamma 2.
/// Negative and NaN values map to 0.
pub fn linear_to_gamma(linear_color_value: Float) -> Float {
    linear_color_value.max(0.0).sqrt()
}

fn to_byte(linear_color_value: Float) -> u8 {
    (linear_to_gamma(linear_color_value).clamp(0.0, 1.0) * 255.999) as u8
}

/// Gamma-corrected 8-bit RGB for one averaged linear color
pub fn to_rgb8(color: Color) -> [u8; 3] {
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Plain-text PPM (P3), one pixel per line, top row first
pub fn write_ppm<W: Write>(image: &Image, out: W) -> io::Result<()> {
    let mut buf_writer = BufWriter::new(out);
    write!(buf_writer, "P3\n{} {}\n255\n", image.width, image.height)?;
    for color in image.pixels.iter() {
        let [r, g, b] = to_rgb8(*color);
        writeln!(buf_writer, "{} {} {}", r, g, b)?;
    }
    buf_writer.flush()
}

pub fn to_rgb_image(image: &Image) -> RgbImage {
    let mut buffer = RgbImage::new(image.width as u32, image.height as u32);
    for (pixel, color) in buffer.pixels_mut().zip(image.pixels.iter()) {
        pixel.0 = to_rgb8(*color);
    }
    buffer
}

pub fn write_png(image: &Image, path: &Path) -> Result<(), OutputError> {
    to_rgb_image(image).save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Writes `image` to `path`, picking the format from the extension.
/// `-` writes PPM to stdout.
pub fn save(image: &Image, path: &Path) -> Result<(), OutputError> {
    if path.as_os_str() == "-" {
        write_ppm(image, io::stdout().lock())?;
        return Ok(());
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => write_png(image, path)?,
        Some("ppm") => write_ppm(image, File::create(path)?)?,
        other => {
            warn!(
                "Unrecognized extension {:?} for {}, writing PPM",
                other,
                path.display()
            );
            write_ppm(image, File::create(path)?)?
        }
    }
    info!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
