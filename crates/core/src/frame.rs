//! Frame-loop driver with explicit cancellation.
//!
//! An [`Animation`] pairs an [`Effect`] with the [`DrawSurface`] it renders
//! into. The host calls [`Animation::frame`] once per display refresh and
//! schedules the next call only while it returns [`FrameStatus::Continue`].
//! Cancelling the [`CancelToken`] (directly or via [`Animation::teardown`])
//! stops the loop; simulation state is left intact.
//!
//! Everything here is single-threaded: the token is an `Rc<Cell<bool>>`.

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;
use log::{debug, trace};

use crate::draw::DrawSurface;
use crate::effect::Effect;
use crate::surface::Viewport;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Whether the host should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// An effect bound to a drawing surface and a cancellation token.
pub struct Animation<E, S> {
    effect: E,
    canvas: S,
    token: CancelToken,
    frames: u64,
}

impl<E: Effect, S: DrawSurface> Animation<E, S> {
    /// Binds `effect` to `canvas`, sizing the canvas to the effect's surface.
    pub fn start(effect: E, mut canvas: S) -> Self {
        canvas.resize(effect.surface());
        Self {
            effect,
            canvas,
            token: CancelToken::new(),
            frames: 0,
        }
    }

    /// Runs one tick unless cancelled.
    pub fn frame(&mut self) -> FrameStatus {
        if self.token.is_cancelled() {
            return FrameStatus::Stopped;
        }
        self.effect.tick(&mut self.canvas);
        self.frames += 1;
        trace!("frame {}", self.frames);
        FrameStatus::Continue
    }

    /// Drives up to `frames` ticks back to back; returns how many ran.
    pub fn run_for(&mut self, frames: u64) -> u64 {
        let mut ran = 0;
        while ran < frames && self.frame() == FrameStatus::Continue {
            ran += 1;
        }
        ran
    }

    /// Forwards a viewport resize to the effect and resizes the canvas to match.
    pub fn resize(&mut self, viewport: &dyn Viewport) {
        self.effect.on_viewport_change(viewport);
        let size = self.effect.surface();
        self.canvas.resize(size);
        debug!("animation resized to {}x{}", size.width, size.height);
    }

    pub fn set_pointer(&mut self, position: DVec2) {
        self.effect.set_pointer(position);
    }

    pub fn clear_pointer(&mut self) {
        self.effect.clear_pointer();
    }

    /// Stops the loop. Idempotent.
    pub fn teardown(&self) {
        if !self.token.is_cancelled() {
            debug!("animation torn down after {} frames", self.frames);
        }
        self.token.cancel();
    }

    /// A handle the host can keep to cancel the loop later.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn canvas(&self) -> &S {
        &self.canvas
    }

    /// Splits the animation back into its effect and canvas.
    pub fn into_parts(self) -> (E, S) {
        (self.effect, self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DrawCommand, Recorder};
    use crate::surface::Surface;
    use serde_json::{json, Value};

    struct Counter {
        size: Surface,
        ticks: u64,
        pointer: Option<DVec2>,
    }

    impl Effect for Counter {
        fn surface(&self) -> Surface {
            self.size
        }

        fn resize(&mut self, viewport: &dyn Viewport) {
            self.size = viewport.size();
        }

        fn tick(&mut self, canvas: &mut dyn DrawSurface) {
            self.ticks += 1;
            canvas.clear();
        }

        fn set_pointer(&mut self, position: DVec2) {
            self.pointer = Some(position);
        }

        fn clear_pointer(&mut self) {
            self.pointer = None;
        }

        fn params(&self) -> Value {
            json!({})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    fn animation() -> Animation<Counter, Recorder> {
        let effect = Counter {
            size: Surface::new(30, 20),
            ticks: 0,
            pointer: None,
        };
        Animation::start(effect, Recorder::default())
    }

    #[test]
    fn start_sizes_canvas_to_effect() {
        let anim = animation();
        assert_eq!(anim.canvas().size(), Surface::new(30, 20));
        assert!(anim.is_running());
    }

    #[test]
    fn frame_ticks_until_cancelled() {
        let mut anim = animation();
        assert_eq!(anim.frame(), FrameStatus::Continue);
        assert_eq!(anim.frame(), FrameStatus::Continue);
        anim.teardown();
        assert_eq!(anim.frame(), FrameStatus::Stopped);
        assert_eq!(anim.effect().ticks, 2);
        assert_eq!(anim.frames(), 2);
    }

    #[test]
    fn external_token_cancels_loop() {
        let mut anim = animation();
        let token = anim.token();
        assert_eq!(anim.run_for(3), 3);
        token.cancel();
        assert!(!anim.is_running());
        assert_eq!(anim.run_for(10), 0);
        assert_eq!(anim.effect().ticks, 3);
    }

    #[test]
    fn teardown_is_idempotent() {
        let anim = animation();
        anim.teardown();
        anim.teardown();
        assert!(!anim.is_running());
    }

    #[test]
    fn resize_updates_effect_and_canvas() {
        let mut anim = animation();
        anim.resize(&Surface::new(64, 48));
        assert_eq!(anim.effect().surface(), Surface::new(64, 48));
        assert_eq!(anim.canvas().size(), Surface::new(64, 48));
        assert_eq!(
            anim.canvas().commands().last(),
            Some(&DrawCommand::Resize(Surface::new(64, 48)))
        );
    }

    #[test]
    fn pointer_is_forwarded() {
        let mut anim = animation();
        anim.set_pointer(DVec2::new(3.0, 4.0));
        assert_eq!(anim.effect().pointer, Some(DVec2::new(3.0, 4.0)));
        anim.clear_pointer();
        assert_eq!(anim.effect().pointer, None);
    }

    #[test]
    fn into_parts_preserves_state() {
        let mut anim = animation();
        anim.run_for(5);
        let (effect, canvas) = anim.into_parts();
        assert_eq!(effect.ticks, 5);
        assert_eq!(canvas.commands().len(), 6); // initial resize + 5 clears
    }
}
