//! Canvas2D implementation of the engine's drawing surface.

use std::f64::consts::TAU;

use glam::Vec2;
use varna_engine::{BlendMode, DrawSurface, PixelBuffer, Rgba, SurfaceSize, VarnaError};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

pub(crate) fn js_error(err: JsValue) -> VarnaError {
    VarnaError::Canvas(format!("{:?}", err))
}

/// The 2D context of `canvas`.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// CSS box (`width`, `height`) that maps one canvas pixel onto one device pixel.
pub fn css_size(size: SurfaceSize) -> (String, String) {
    let logical = size.logical();
    (format!("{}px", logical.x), format!("{}px", logical.y))
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }

    /// Resize the backing store to device pixels and pin the CSS box to the
    /// logical size. The canvas clears itself.
    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), JsValue> {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        let (width, height) = css_size(size);
        let style = self.canvas.style();
        style.set_property("width", &width)?;
        style.set_property("height", &height)
    }

    fn blend(&self, blend: BlendMode) {
        // Only fails for unknown operation names.
        let _ = self.ctx.set_global_composite_operation(blend.composite_operation());
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba, blend: BlendMode) {
        self.blend(blend);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba, blend: BlendMode) {
        self.blend(blend);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, blend: BlendMode) {
        self.blend(blend);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn read_pixels(&self) -> Result<PixelBuffer, VarnaError> {
        let (width, height) = self.size();
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(js_error)?;
        PixelBuffer::new(width, height, image.data().0)
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), VarnaError> {
        let (width, height) = self.size();
        let expected = PixelBuffer::byte_len(width, height);
        if pixels.width != width || pixels.height != height || pixels.data.len() != expected {
            return Err(VarnaError::BufferSize {
                expected,
                actual: pixels.data.len(),
            });
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.data.as_slice()), width, height)
            .map_err(js_error)?;
        self.ctx.put_image_data(&image, 0.0, 0.0).map_err(js_error)
    }
}
