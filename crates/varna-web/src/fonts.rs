//! One-shot wait for `document.fonts.ready`.

use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::Document;

/// Run `on_ready` once the document's fonts have loaded.
/// A rejected or missing promise still calls `on_ready`.
pub fn when_fonts_ready(document: &Document, on_ready: impl FnOnce() + 'static) {
    let ready = document.fonts().ready();
    spawn_local(async move {
        match ready {
            Ok(promise) => {
                if let Err(err) = JsFuture::from(promise).await {
                    log::warn!("font loading failed: {:?}", err);
                }
            }
            Err(err) => log::warn!("document.fonts unavailable: {:?}", err),
        }
        on_ready();
    });
}
