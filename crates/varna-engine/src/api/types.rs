use glam::Vec2;
use serde::Deserialize;

/// The three dials pushed by the UI layer. Each is an integer in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dials {
    /// Entropy: assembly aggressiveness and flow-field turbulence.
    pub chaos: u8,
    /// Density: orbital vortex strength and lattice jitter.
    pub complexity: u8,
    /// Hue rotation added to every particle, in degrees.
    pub color_mode: u8,
}

impl Default for Dials {
    fn default() -> Self {
        Self {
            chaos: 35,
            complexity: 50,
            color_mode: 50,
        }
    }
}

impl Dials {
    pub const MAX: u8 = 100;

    /// Build dials from raw host integers, clamping each into 0..=100.
    pub fn new(chaos: u32, complexity: u32, color_mode: u32) -> Self {
        let clamp = |v: u32| v.min(Self::MAX as u32) as u8;
        Self {
            chaos: clamp(chaos),
            complexity: clamp(complexity),
            color_mode: clamp(color_mode),
        }
    }

    /// Same dials with every value forced into range.
    pub fn clamped(self) -> Self {
        Self::new(self.chaos as u32, self.complexity as u32, self.color_mode as u32)
    }
}

/// Output surface geometry: backing-store pixels plus the device pixel ratio.
///
/// Particles live in logical pixels (`physical / dpr`); the renderer scales
/// back up when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(800, 450, 1.0)
    }
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, dpr: f32) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self { width, height, dpr }
    }

    /// Size a backing store for a container measured in CSS pixels.
    pub fn from_css(css_width: f32, css_height: f32, dpr: f32) -> Self {
        let scale = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let physical = |css: f32| (css.max(0.0) * scale).round() as u32;
        Self::new(physical(css_width), physical(css_height), scale)
    }

    /// Simulation bounds in logical pixels.
    pub fn logical(&self) -> Vec2 {
        Vec2::new(self.width as f32 / self.dpr, self.height as f32 / self.dpr)
    }

    /// Integer raster size used for glyph sampling.
    pub fn logical_pixels(&self) -> (u32, u32) {
        let logical = self.logical();
        (logical.x.round() as u32, logical.y.round() as u32)
    }
}
