//! Glyph rasterization on an off-screen canvas using the page's fonts.

use varna_engine::{AlphaMask, GlyphRasterizer, GlyphStyle, VarnaError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::canvas::{context_2d, js_error};

pub struct CanvasRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRasterizer {
    /// Create a detached canvas; it is never attached to the page.
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }
}

impl GlyphRasterizer for CanvasRasterizer {
    fn rasterize(
        &mut self,
        text: &str,
        width: u32,
        height: u32,
        style: &GlyphStyle,
    ) -> Result<AlphaMask, VarnaError> {
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let (w, h) = (width as f64, height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str("#fff");
        self.ctx.set_font(&style.css_font(width, height));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx
            .fill_text(text, w / 2.0, h / 2.0)
            .map_err(|err| VarnaError::Raster(format!("{:?}", err)))?;

        let image = self.ctx.get_image_data(0.0, 0.0, w, h).map_err(js_error)?;
        AlphaMask::from_rgba(width, height, &image.data())
    }
}
