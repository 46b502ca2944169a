//! Browser bridge for `varna-engine`: a Canvas2D surface and rasterizer,
//! a font readiness gate, a cancelable frame loop, and the exported API the
//! page calls.

pub mod canvas;
pub mod fonts;
pub mod frame_loop;
pub mod raster;
pub mod runner;

use std::cell::RefCell;

use varna_engine::{AnimationDriver, ControlEvent, Dials, FieldConfig, SurfaceSize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

pub use canvas::CanvasSurface;
pub use frame_loop::FrameLoop;
pub use raster::CanvasRasterizer;
pub use runner::WebRunner;

thread_local! {
    static RUNNER: RefCell<Option<WebRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` before `varna_init`.
fn with_runner<T>(f: impl FnOnce(&mut WebRunner) -> T) -> Option<T> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn to_js(err: varna_engine::VarnaError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Seed for the particle RNG when the config does not pin one.
fn host_seed() -> u64 {
    let random = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
    random ^ (js_sys::Date::now() as u64).rotate_left(32)
}

fn on_frame(timestamp: f64) {
    with_runner(|r| r.on_animation_frame(timestamp));
}

/// Attach the field to the canvas with id `canvas_id`.
///
/// `config_json` is an optional, possibly partial `FieldConfig` in camelCase.
/// Calling it again replaces the previous field and stops its loop.
#[wasm_bindgen]
pub fn varna_init(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut config = match config_json {
        Some(json) => FieldConfig::from_json(&json).map_err(to_js)?,
        None => FieldConfig::default(),
    };
    if config.seed.is_none() {
        config.seed = Some(host_seed());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)?;

    // The canvas fills its container; measure the container, not the canvas.
    let (css_width, css_height) = match canvas.parent_element() {
        Some(parent) => (parent.client_width(), parent.client_height()),
        None => (canvas.client_width(), canvas.client_height()),
    };
    let size = SurfaceSize::from_css(
        css_width as f32,
        css_height as f32,
        window.device_pixel_ratio() as f32,
    );
    let mut surface = CanvasSurface::new(canvas)?;
    surface.resize(size)?;
    let rasterizer = CanvasRasterizer::new(&document)?;
    let wait_for_fonts = config.wait_for_fonts;
    let particle_count = config.particle_count;
    let driver = AnimationDriver::new(config, rasterizer, size);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(WebRunner::new(driver, surface));
    });

    if wait_for_fonts {
        fonts::when_fonts_ready(&document, || {
            with_runner(|r| r.push(ControlEvent::FontsReady));
        });
    }
    log::info!(
        "varna: initialized on #{} ({}x{} @{}x, {} particles)",
        canvas_id,
        size.width,
        size.height,
        size.dpr,
        particle_count
    );
    Ok(())
}

#[wasm_bindgen]
pub fn varna_set_text(text: &str) {
    with_runner(|r| r.push(ControlEvent::SetText(text.to_string())));
}

/// Dial values above 100 are clamped.
#[wasm_bindgen]
pub fn varna_set_dials(chaos: u32, complexity: u32, color_mode: u32) {
    with_runner(|r| r.push(ControlEvent::SetDials(Dials::new(chaos, complexity, color_mode))));
}

#[wasm_bindgen]
pub fn varna_set_generating(generating: bool) {
    with_runner(|r| r.push(ControlEvent::SetGenerating(generating)));
}

/// The container now measures `css_width` x `css_height` CSS pixels at `dpr`.
#[wasm_bindgen]
pub fn varna_resize(css_width: f32, css_height: f32, dpr: f32) -> Result<(), JsValue> {
    let size = SurfaceSize::from_css(css_width, css_height, dpr);
    with_runner(|r| r.resize(size)).unwrap_or(Ok(()))
}

#[wasm_bindgen]
pub fn varna_start() -> Result<(), JsValue> {
    with_runner(|r| r.start(on_frame)).unwrap_or(Ok(()))
}

#[wasm_bindgen]
pub fn varna_stop() {
    with_runner(|r| r.stop());
}

/// Tear the field down: cancels any pending frame and frees the runner, its
/// canvas handles and the frame closure. Calls after this are no-ops until the
/// next `varna_init`.
#[wasm_bindgen]
pub fn varna_destroy() {
    // Dropped outside the borrow so the frame loop's Drop never re-enters RUNNER.
    let runner = RUNNER.with(|cell| cell.borrow_mut().take());
    if let Some(runner) = runner {
        drop(runner);
        log::info!("varna: destroyed");
    }
}

/// `"assembling"`, `"alive"` or `"dissolving"`; `undefined` until the first pool is built.
#[wasm_bindgen]
pub fn varna_phase() -> Option<String> {
    with_runner(|r| r.phase_name().map(str::to_string)).flatten()
}

/// PNG bytes of the current frame; empty when there is nothing to export.
#[cfg(feature = "png")]
#[wasm_bindgen]
pub fn varna_export_png() -> Vec<u8> {
    match with_runner(|r| r.export_png()) {
        Some(Ok(png)) => png,
        Some(Err(err)) => {
            log::error!("varna: export failed: {}", err);
            Vec::new()
        }
        None => Vec::new(),
    }
}
