use varna_engine::{AnimationDriver, ControlEvent, SurfaceSize};
#[cfg(feature = "png")]
use varna_engine::{export_png, DrawSurface, VarnaError};
use wasm_bindgen::JsValue;

use crate::canvas::CanvasSurface;
use crate::frame_loop::FrameLoop;
use crate::raster::CanvasRasterizer;

/// Longest frame delta fed to the driver, in seconds. Longer gaps (a
/// backgrounded tab) are treated as a pause.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Seconds between two `requestAnimationFrame` timestamps, clamped to `0..=MAX_FRAME_DT`.
/// The first frame after a (re)start has no predecessor and advances nothing.
pub fn frame_delta(last_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_ms {
        Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT as f64) as f32,
        None => 0.0,
    }
}

/// Browser-side owner of the driver, its canvas and the frame loop.
///
/// Lives in a `thread_local!` in the crate root; the exported free functions
/// and the frame callback reach it through `with_runner`.
pub struct WebRunner {
    driver: AnimationDriver<CanvasRasterizer>,
    surface: CanvasSurface,
    frame_loop: Option<FrameLoop>,
    running: bool,
    last_timestamp: Option<f64>,
}

impl WebRunner {
    pub fn new(driver: AnimationDriver<CanvasRasterizer>, surface: CanvasSurface) -> Self {
        Self {
            driver,
            surface,
            frame_loop: None,
            running: false,
            last_timestamp: None,
        }
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.driver.push(event);
    }

    /// Resize the canvas and force a resample. Any pending frame is cancelled
    /// first and rescheduled afterwards.
    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), JsValue> {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.cancel();
        }
        self.surface.resize(size)?;
        self.driver.push(ControlEvent::Resize(size));
        self.last_timestamp = None;
        if self.running {
            self.request_frame()?;
        }
        Ok(())
    }

    /// Begin (or resume) the frame loop. `on_frame` becomes the animation
    /// frame callback the first time the loop is started.
    pub fn start(&mut self, on_frame: impl FnMut(f64) + 'static) -> Result<(), JsValue> {
        if self.frame_loop.is_none() {
            self.frame_loop = Some(FrameLoop::new(on_frame));
        }
        if !self.running {
            self.running = true;
            self.last_timestamp = None;
            self.request_frame()?;
            log::info!("frame loop started");
        }
        Ok(())
    }

    /// Stop scheduling frames. Takes effect immediately.
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.cancel();
        }
        log::info!("frame loop stopped");
    }

    /// Animation frame callback body.
    pub fn on_animation_frame(&mut self, timestamp: f64) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.fired();
        }
        if !self.running {
            return;
        }
        let dt = frame_delta(self.last_timestamp, timestamp);
        self.last_timestamp = Some(timestamp);
        self.driver.frame(dt, &mut self.surface);

        if let Err(err) = self.request_frame() {
            log::error!("failed to schedule next frame: {:?}", err);
            self.running = false;
        }
    }

    pub fn phase_name(&self) -> Option<&'static str> {
        self.driver.phase().map(|phase| phase.name())
    }

    /// Encode what is currently on the canvas.
    #[cfg(feature = "png")]
    pub fn export_png(&self) -> Result<Vec<u8>, VarnaError> {
        let frame = self.surface.read_pixels()?;
        export_png(&frame)
    }

    fn request_frame(&mut self) -> Result<(), JsValue> {
        match self.frame_loop.as_mut() {
            Some(frame_loop) => frame_loop.request(),
            None => Ok(()),
        }
    }
}
