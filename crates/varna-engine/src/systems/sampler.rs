//! Glyph sampling: rasterize a label off-screen and scatter points over its lit pixels.
//!
//! Rasterization is platform work (a browser canvas, a font library), so it
//! sits behind [`GlyphRasterizer`]. Everything after the coverage mask is pure.

use glam::Vec2;

use crate::api::error::VarnaError;
use crate::api::types::SurfaceSize;
use crate::systems::rng::Rng;

/// Coverage above this value counts as a lit pixel.
pub const OPACITY_THRESHOLD: u8 = 128;
/// Scan density: aim for this many candidate points per requested point.
pub const OVERSAMPLE: usize = 6;

/// Font settings a rasterizer draws the label with.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphStyle {
    pub family: String,
    pub weight: u16,
}

impl GlyphStyle {
    /// Large enough to fill the surface without clipping a short label.
    pub fn font_size(&self, width: u32, height: u32) -> f32 {
        (width as f32 * 0.55).min(height as f32 * 0.72)
    }

    /// CSS shorthand, e.g. `900 198px serif`.
    pub fn css_font(&self, width: u32, height: u32) -> String {
        format!("{} {}px {}", self.weight, self.font_size(width, height), self.family)
    }
}

/// Single-channel coverage raster, row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self, VarnaError> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(VarnaError::BufferSize {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self { width, height, alpha })
    }

    /// A fully transparent mask.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    /// Keep only the alpha channel of an RGBA8 buffer (canvas `ImageData` layout).
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, VarnaError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(VarnaError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Ok(Self { width, height, alpha })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, alpha: u8) {
        if x < self.width && y < self.height {
            self.alpha[(y * self.width + x) as usize] = alpha;
        }
    }

    pub fn is_lit(&self, x: u32, y: u32) -> bool {
        self.alpha_at(x, y) > OPACITY_THRESHOLD
    }

    pub fn lit_count(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > OPACITY_THRESHOLD).count()
    }
}

/// Draws a label into a coverage mask.
pub trait GlyphRasterizer {
    /// Render `text` centered in a `width` x `height` raster.
    fn rasterize(
        &mut self,
        text: &str,
        width: u32,
        height: u32,
        style: &GlyphStyle,
    ) -> Result<AlphaMask, VarnaError>;
}

/// Scan stride that yields roughly `OVERSAMPLE * target_count` candidates.
pub fn sampling_stride(width: u32, height: u32, target_count: usize) -> u32 {
    let area = width as f64 * height as f64;
    let wanted = (target_count.max(1) * OVERSAMPLE) as f64;
    ((area / wanted).sqrt().floor() as u32).max(1)
}

fn scan(mask: &AlphaMask, stride: u32) -> Vec<Vec2> {
    let mut lit = Vec::new();
    for y in (0..mask.height).step_by(stride as usize) {
        for x in (0..mask.width).step_by(stride as usize) {
            if mask.is_lit(x, y) {
                lit.push(Vec2::new(x as f32, y as f32));
            }
        }
    }
    lit
}

/// Up to `target_count` lit positions in random order.
///
/// Empty only when the mask has no lit pixel at all: a glyph thinner than the
/// stride is rescanned at full resolution rather than reported as blank.
pub fn sample_points(mask: &AlphaMask, target_count: usize, rng: &mut Rng) -> Vec<Vec2> {
    if target_count == 0 {
        return Vec::new();
    }
    let stride = sampling_stride(mask.width, mask.height, target_count);
    let mut lit = scan(mask, stride);
    if lit.is_empty() && stride > 1 {
        lit = scan(mask, 1);
    }
    rng.shuffle(&mut lit);
    lit.truncate(target_count);
    lit
}

/// Rasterize `text` at the surface's logical resolution and sample it.
///
/// Returns `EmptySample` when nothing lit was found, so callers keep their
/// previous pool instead of building an empty one.
pub fn sample_glyph<R: GlyphRasterizer + ?Sized>(
    rasterizer: &mut R,
    text: &str,
    size: SurfaceSize,
    target_count: usize,
    style: &GlyphStyle,
    rng: &mut Rng,
) -> Result<Vec<Vec2>, VarnaError> {
    let (width, height) = size.logical_pixels();
    let points = if width == 0 || height == 0 {
        Vec::new()
    } else {
        let mask = rasterizer.rasterize(text, width, height, style)?;
        sample_points(&mask, target_count, rng)
    };
    if points.is_empty() {
        return Err(VarnaError::EmptySample {
            label: text.to_string(),
        });
    }
    Ok(points)
}


#[cfg(test)]
mod tests {
    use super::testing::BlockRasterizer;
    use super::*;

    fn style() -> GlyphStyle {
        GlyphStyle {
            family: "serif".into(),
            weight: 900,
        }
    }

    #[test]
    fn css_font_uses_smaller_axis() {
        let style = style();
        assert_eq!(style.font_size(1000, 100), 72.0);
        assert_eq!(style.css_font(100, 1000), "900 55px serif");
    }

    #[test]
    fn mask_validates_length() {
        assert!(AlphaMask::new(4, 4, vec![0; 15]).is_err());
        let err = AlphaMask::from_rgba(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(err, VarnaError::BufferSize { expected: 16, actual: 15 }));
    }

    #[test]
    fn mask_from_rgba_keeps_alpha() {
        let rgba = [255, 255, 255, 200, 0, 0, 0, 10];
        let mask = AlphaMask::from_rgba(2, 1, &rgba).unwrap();
        assert!(mask.is_lit(0, 0));
        assert!(!mask.is_lit(1, 0));
        assert_eq!(mask.lit_count(), 1);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut mask = AlphaMask::blank(2, 1);
        mask.set(0, 0, OPACITY_THRESHOLD);
        mask.set(1, 0, OPACITY_THRESHOLD + 1);
        assert!(!mask.is_lit(0, 0));
        assert!(mask.is_lit(1, 0));
    }

    #[test]
    fn stride_targets_oversampled_count() {
        // 600x300 for 3200 points: sqrt(180000 / 19200) = 3.06
        assert_eq!(sampling_stride(600, 300, 3200), 3);
        assert_eq!(sampling_stride(10, 10, 3200), 1);
        assert_eq!(sampling_stride(100, 100, 0), 40);
    }

    #[test]
    fn never_more_than_requested() {
        let mut raster = BlockRasterizer::default();
        let mask = raster.rasterize("আলো", 400, 200, &style()).unwrap();
        let mut rng = Rng::new(1);
        for n in [1, 10, 500, 3200, 100_000] {
            let points = sample_points(&mask, n, &mut rng);
            assert!(points.len() <= n);
            assert!(!points.is_empty());
        }
    }

    #[test]
    fn points_lie_on_lit_pixels() {
        let mut raster = BlockRasterizer::default();
        let mask = raster.rasterize("আলো", 400, 200, &style()).unwrap();
        let points = sample_points(&mask, 800, &mut Rng::new(5));
        for p in &points {
            assert!(mask.is_lit(p.x as u32, p.y as u32), "{p:?} is dark");
        }
    }

    #[test]
    fn blank_mask_gives_no_points() {
        let mask = AlphaMask::blank(300, 200);
        assert!(sample_points(&mask, 100, &mut Rng::new(1)).is_empty());
    }

    #[test]
    fn sub_stride_glyph_is_still_found() {
        let mut mask = AlphaMask::blank(400, 400);
        // Stride is 51 for 10 points; this pixel sits between grid lines
        mask.set(17, 23, 255);
        let points = sample_points(&mask, 10, &mut Rng::new(1));
        assert_eq!(points, vec![Vec2::new(17.0, 23.0)]);
    }

    #[test]
    fn fixed_seed_reproduces_points() {
        let mut raster = BlockRasterizer::default();
        let mask = raster.rasterize("আলো", 300, 150, &style()).unwrap();
        let a = sample_points(&mask, 200, &mut Rng::new(77));
        let b = sample_points(&mask, 200, &mut Rng::new(77));
        assert_eq!(a, b);
    }

    #[test]
    fn sample_glyph_uses_logical_resolution() {
        let mut raster = BlockRasterizer::default();
        let size = SurfaceSize::new(800, 400, 2.0);
        let points =
            sample_glyph(&mut raster, "আলো", size, 500, &style(), &mut Rng::new(3)).unwrap();
        assert!(points.iter().all(|p| p.x < 400.0 && p.y < 200.0));
    }

    #[test]
    fn whitespace_label_is_an_empty_sample() {
        let mut raster = BlockRasterizer::default();
        let size = SurfaceSize::new(300, 150, 1.0);
        let err = sample_glyph(&mut raster, "   ", size, 100, &style(), &mut Rng::new(3))
            .unwrap_err();
        assert!(matches!(err, VarnaError::EmptySample { .. }));
    }

    #[test]
    fn unsupported_glyph_is_an_empty_sample() {
        let mut raster = BlockRasterizer::with_missing(&['\u{E000}']);
        let size = SurfaceSize::new(300, 150, 1.0);
        let result = sample_glyph(&mut raster, "\u{E000}", size, 100, &style(), &mut Rng::new(3));
        assert!(matches!(result, Err(VarnaError::EmptySample { .. })));
        assert_eq!(raster.calls, 1);
    }

    #[test]
    fn zero_sized_surface_skips_rasterizer() {
        let mut raster = BlockRasterizer::default();
        let size = SurfaceSize::new(0, 150, 1.0);
        let result = sample_glyph(&mut raster, "আলো", size, 100, &style(), &mut Rng::new(3));
        assert!(result.is_err());
        assert_eq!(raster.calls, 0);
    }
}
