//! # Output Module
//!
//! Writes a finished [`FrameBuffer`] to disk:
//! - PNG: sRGB transfer curve, clamped, 8-bit RGBA
//! - EXR: linear 32-bit float RGBA, no tone mapping
//!
//! The format is picked from the file extension by [`save_image`].

use std::path::Path;

use exr::prelude::write_rgba_file;
use image::{ImageBuffer, Rgba};
use log::info;
use thiserror::Error;

use crate::framebuffer::FrameBuffer;

/// Failure while writing an image.
#[derive(Debug, Error)]
pub enum OutputError {
    /// PNG encoding or file I/O failed.
    #[error("failed to save PNG: {0}")]
    Png(#[from] image::ImageError),

    /// EXR encoding or file I/O failed.
    #[error("failed to save EXR: {0}")]
    Exr(#[from] exr::error::Error),

    /// The extension is neither `.png` nor `.exr`.
    #[error("unsupported file extension '{0}', only .png and .exr are supported")]
    UnsupportedFormat(String),
}

/// sRGB transfer function with the linear segment for very dark values.
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        // Gamma curve: 1.055 * linear^(1/2.4) - 0.055
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

fn to_u8(linear: f32) -> u8 {
    (linear_to_gamma(linear.clamp(0.0, 1.0)) * 255.0) as u8
}

/// Save as 8-bit PNG with sRGB gamma correction.
///
/// Values outside [0, 1] are clamped, so overexposed areas become white.
pub fn save_png(frame: &FrameBuffer, output_path: &Path) -> Result<(), OutputError> {
    let u8_image: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
            let pixel = frame.get(x, y).unwrap_or_default();
            Rgba([
                to_u8(pixel.x),
                to_u8(pixel.y),
                to_u8(pixel.z),
                (pixel.w.clamp(0.0, 1.0) * 255.0) as u8,
            ])
        });

    u8_image.save(output_path)?;
    info!("Image saved as {}", output_path.display());
    Ok(())
}

/// Save as EXR with full HDR precision.
///
/// Linear values are written untouched: no tone mapping, no gamma.
pub fn save_exr(frame: &FrameBuffer, output_path: &Path) -> Result<(), OutputError> {
    let width = frame.width() as usize;
    let pixels = frame.pixels();

    write_rgba_file(output_path, width, frame.height() as usize, |x, y| {
        let p = pixels[y * width + x];
        (p.x, p.y, p.z, p.w)
    })?;

    info!("HDR image saved as EXR: {}", output_path.display());
    Ok(())
}

/// Save based on the file extension.
pub fn save_image(frame: &FrameBuffer, output_path: &Path) -> Result<(), OutputError> {
    let extension = output_path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => save_png(frame, output_path),
        "exr" => save_exr(frame, output_path),
        _ => Err(OutputError::UnsupportedFormat(extension)),
    }
}
