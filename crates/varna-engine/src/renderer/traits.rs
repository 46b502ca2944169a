//! Minimal 2D drawing capability the renderer targets.
//!
//! The browser bridge implements it over Canvas2D; `PixelSurface` implements
//! it in software for tests and native hosts. All coordinates are physical
//! pixels.

use glam::Vec2;

use crate::api::error::VarnaError;
use crate::renderer::color::Rgba;

/// How a draw call combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (src-alpha, one-minus-src-alpha).
    #[default]
    Alpha,
    /// Additive blending for glow (src-alpha, one).
    Additive,
}

impl BlendMode {
    /// Canvas2D `globalCompositeOperation` for this mode.
    pub fn composite_operation(self) -> &'static str {
        match self {
            Self::Alpha => "source-over",
            Self::Additive => "lighter",
        }
    }
}

/// Raw RGBA8 frame, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, VarnaError> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(VarnaError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }
}

pub trait DrawSurface {
    /// Backing-store size in physical pixels.
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba, blend: BlendMode);

    /// Stroke a straight segment with round-ish ends.
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba, blend: BlendMode);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, blend: BlendMode);

    /// Snapshot the current frame.
    fn read_pixels(&self) -> Result<PixelBuffer, VarnaError>;

    /// Replace the current frame. Dimensions must match `size()`.
    fn write_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), VarnaError>;
}
