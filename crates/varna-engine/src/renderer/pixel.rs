//! Software RGBA8 surface: hard-edged coverage, alpha and additive blending.

use glam::Vec2;

use crate::api::error::VarnaError;
use crate::renderer::color::Rgba;
use crate::renderer::traits::{BlendMode, DrawSurface, PixelBuffer};

/// Opaque near-black the field is drawn over.
pub const BACKGROUND: [u8; 4] = [2, 8, 6, 255];

pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// The frame as contiguous RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixels that differ from the background.
    pub fn painted_count(&self) -> usize {
        self.pixels.iter().filter(|&&px| px != BACKGROUND).count()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, blend: BlendMode) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let alpha = color.a.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let src = [color.r, color.g, color.b];
        let px = &mut self.pixels[(y as u32 * self.width + x as u32) as usize];
        for c in 0..3 {
            let dst = px[c] as f32 / 255.0;
            let out = match blend {
                BlendMode::Alpha => src[c] * alpha + dst * (1.0 - alpha),
                BlendMode::Additive => dst + src[c] * alpha,
            };
            px[c] = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        px[3] = 255;
    }

    /// Visit every pixel whose center lies inside `[min, max)` and passes `inside`.
    fn cover(
        &mut self,
        min: Vec2,
        max: Vec2,
        color: Rgba,
        blend: BlendMode,
        inside: impl Fn(Vec2) -> bool,
    ) {
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = (max.x.ceil() as i64).min(self.width as i64);
        let y1 = (max.y.ceil() as i64).min(self.height as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, color, blend);
                }
            }
        }
    }
}

impl DrawSurface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba, blend: BlendMode) {
        let min = Vec2::new(x, y);
        let max = min + Vec2::new(width, height);
        self.cover(min, max, color, blend, |c| c.cmpge(min).all() && c.cmplt(max).all());
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba, blend: BlendMode) {
        let half = (width * 0.5).max(0.5);
        let span = to - from;
        let len_sq = span.length_squared();
        let reach = Vec2::splat(half);
        self.cover(from.min(to) - reach, from.max(to) + reach, color, blend, |c| {
            let t = if len_sq > 0.0 {
                ((c - from).dot(span) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (from + span * t).distance_squared(c) <= half * half
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, blend: BlendMode) {
        let radius = radius.max(0.5);
        let reach = Vec2::splat(radius);
        self.cover(center - reach, center + reach, color, blend, |c| {
            c.distance_squared(center) <= radius * radius
        });
    }

    fn read_pixels(&self) -> Result<PixelBuffer, VarnaError> {
        PixelBuffer::new(self.width, self.height, self.as_bytes().to_vec())
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), VarnaError> {
        let expected = PixelBuffer::byte_len(self.width, self.height);
        if pixels.width != self.width || pixels.height != self.height || pixels.data.len() != expected {
            return Err(VarnaError::BufferSize {
                expected,
                actual: pixels.data.len(),
            });
        }
        self.pixels.copy_from_slice(bytemuck::cast_slice(&pixels.data));
        Ok(())
    }
}
