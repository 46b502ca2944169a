//! Cancelable `requestAnimationFrame` scheduling.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// Owns the frame callback and at most one pending frame request.
///
/// Dropping the loop cancels the pending request before the closure is freed.
pub struct FrameLoop {
    callback: Closure<dyn FnMut(f64)>,
    handle: Option<i32>,
}

impl FrameLoop {
    pub fn new(on_frame: impl FnMut(f64) + 'static) -> Self {
        Self {
            callback: Closure::wrap(Box::new(on_frame) as Box<dyn FnMut(f64)>),
            handle: None,
        }
    }

    /// Schedule the callback for the next display refresh. No-op if one is already pending.
    pub fn request(&mut self) -> Result<(), JsValue> {
        if self.is_scheduled() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let handle = window.request_animation_frame(self.callback.as_ref().unchecked_ref())?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Drop the pending request, if any. Takes effect before the next refresh.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    /// Mark the pending request as delivered. Call first thing in the callback.
    pub fn fired(&mut self) {
        self.handle = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
