//! Viewport size read from the browser window.

use driftfield_core::{Surface, Viewport};
use wasm_bindgen::JsValue;
use web_sys::Window;

/// `window.innerWidth` × `window.innerHeight`.
pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Viewport for WindowViewport {
    fn size(&self) -> Surface {
        let read = |v: Result<JsValue, JsValue>| dimension(v.ok().and_then(|v| v.as_f64()));
        Surface::new(read(self.window.inner_width()), read(self.window.inner_height()))
    }
}

/// Whole CSS pixels; unreadable or negative sizes collapse to zero.
fn dimension(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}
