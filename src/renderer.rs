//! Frame orchestration: one primary ray per pixel, dispatched to the marcher
//! or the path tracer, written into a cached frame buffer.
//!
//! Pixels are independent, so rows are rendered in parallel with rayon. The
//! scene, parameters and sky are only borrowed for the duration of a pass;
//! the frame buffer is borrowed mutably by the pass and handed out only once
//! every row is finished.

use std::time::Instant;

use glam::{Vec2, Vec3};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::framebuffer::FrameBuffer;
use crate::marcher::RayMarcher;
use crate::params::{RenderMode, RenderParameters};
use crate::pathtracer::PathTracer;
use crate::random::PixelSampler;
use crate::scene::Scene;
use crate::skybox::Skybox;

/// Everything a render pass reads.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    /// Scene snapshot for this frame.
    pub scene: &'a Scene,
    /// Render parameters, validated at the start of the pass.
    pub params: &'a RenderParameters,
    /// Environment seen by escaping rays.
    pub skybox: &'a dyn Skybox,
    /// Camera matrices.
    pub camera: &'a Camera,
    /// Algorithm to run for every pixel.
    pub mode: RenderMode,
}

/// Renders frames into a buffer it keeps between frames.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    target: Option<FrameBuffer>,
    complete: bool,
    allocations: u64,
    show_progress: bool,
}

impl FrameRenderer {
    /// Renderer without a frame buffer; one is allocated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar on the terminal while rendering.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The last fully rendered frame.
    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.target.as_ref().filter(|_| self.complete)
    }

    /// Number of frame buffers allocated so far.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Render one `width x height` frame.
    ///
    /// Parameters are validated before any pixel work starts. A failing pass
    /// returns the error and leaves no frame available.
    pub fn render(&mut self, frame: &FrameInputs<'_>, width: u32, height: u32) -> Result<&FrameBuffer> {
        self.complete = false;
        if width == 0 || height == 0 {
            return Err(RenderError::degenerate(
                "viewport",
                format!("dimensions must be positive, got {width}x{height}"),
            ));
        }
        frame.params.validate()?;

        info!(
            "Rendering {}x{} {} frame using {} CPU cores...",
            width,
            height,
            frame.mode.as_str(),
            rayon::current_num_threads()
        );
        let generation_start = Instant::now();

        let pb = if self.show_progress {
            ProgressBar::new(u64::from(height))
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            pb.set_style(style);
        }

        let target = self.ensure_target(width, height);

        let marcher = RayMarcher::new(frame.scene, frame.params);
        let tracer = PathTracer::new(frame.scene, frame.params, frame.skybox);

        // Parallel scanline processing
        target
            .pixels_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .try_for_each(|(y, row)| -> Result<()> {
                for (x, slot) in row.iter_mut().enumerate() {
                    let color = shade_pixel(frame, &marcher, &tracer, x as u32, y as u32, width, height)?;
                    *slot = color.extend(1.0);
                }
                pb.inc(1);
                Ok(())
            })?;

        pb.finish_and_clear();
        info!("Frame rendered in {:.2?}", generation_start.elapsed());

        self.complete = true;
        self.target
            .as_ref()
            .ok_or_else(|| RenderError::degenerate("viewport", "frame buffer was not allocated"))
    }

    /// Reuse the cached buffer when the size matches, otherwise release it and
    /// allocate a new one.
    fn ensure_target(&mut self, width: u32, height: u32) -> &mut FrameBuffer {
        if let Some(old) = self.target.take_if(|t| t.dimensions() != (width, height)) {
            debug!("Releasing {}x{} frame buffer", old.width(), old.height());
            drop(old);
        }
        if self.target.is_none() {
            debug!("Allocating {}x{} frame buffer", width, height);
            self.allocations += 1;
        }
        self.target.get_or_insert_with(|| FrameBuffer::new(width, height))
    }
}

/// Radiance for one pixel.
fn shade_pixel(
    frame: &FrameInputs<'_>,
    marcher: &RayMarcher<'_>,
    tracer: &PathTracer<'_>,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<Vec3> {
    let pixel = Vec2::new(x as f32, y as f32);
    match frame.mode {
        RenderMode::RayMarch => {
            let ray = frame.camera.primary_ray(pixel + Vec2::splat(0.5), width, height)?;
            Ok(marcher.radiance(&ray, frame.scene.light(), frame.skybox))
        }
        RenderMode::PathTrace => {
            let samples = frame.params.samples_per_pixel;
            let mut sampler = PixelSampler::for_pixel(frame.params.seed, x, y, width);
            let mut pixel_color = Vec3::ZERO;

            // Sample multiple rays per pixel for anti-aliasing
            for _ in 0..samples {
                let offset = sampler.pixel_offset(samples);
                let ray = frame.camera.primary_ray(pixel + offset, width, height)?;
                pixel_color += tracer.trace(&ray)?;
            }
            Ok(pixel_color / samples as f32)
        }
    }
}
