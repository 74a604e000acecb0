//! Linear RGBA float image written once per frame.

use glam::Vec4;

/// Row-major `width x height` grid of linear RGBA values, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl FrameBuffer {
    /// Allocate a buffer cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Vec4] {
        &mut self.pixels
    }
}
