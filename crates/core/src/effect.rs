//! The `Effect` trait every animated page layer implements.
//!
//! The trait is object-safe so hosts can hold `Box<dyn Effect>` and switch
//! effects at runtime.

use glam::DVec2;
use serde_json::Value;

use crate::draw::DrawSurface;
use crate::surface::{Surface, Viewport};

/// A per-frame animated layer.
///
/// An effect owns its simulation state and the dimensions of the surface it
/// draws into; the host owns the [`DrawSurface`] and the frame schedule
/// (see [`Animation`](crate::frame::Animation)).
pub trait Effect {
    /// Dimensions the effect currently simulates in.
    fn surface(&self) -> Surface;

    /// Syncs the stored dimensions with the viewport. Never spawns or
    /// discards simulation state.
    fn resize(&mut self, viewport: &dyn Viewport);

    /// Full reaction to a viewport resize notification.
    ///
    /// Defaults to [`resize`](Effect::resize); effects whose state depends on
    /// the surface size extend it (the particle field regenerates).
    fn on_viewport_change(&mut self, viewport: &dyn Viewport) {
        self.resize(viewport);
    }

    /// Advances one frame and draws it.
    fn tick(&mut self, canvas: &mut dyn DrawSurface);

    /// Pointer moved to `position` in surface coordinates. Ignored by default.
    fn set_pointer(&mut self, _position: DVec2) {}

    /// Pointer left the page. Ignored by default.
    fn clear_pointer(&mut self) {}

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}
