//! An [`Animation`] driven by `requestAnimationFrame`, with its DOM listeners.
//!
//! The frame closure reschedules itself until the animation's token is
//! cancelled. [`LiveLayer::teardown`] cancels the token and the pending
//! frame, removes every listener, and drops the closures.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use driftfield_core::{Animation, Effect, EngineError, FrameStatus};
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, Window};

use crate::canvas2d::Canvas2d;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub struct LiveLayer<E: Effect + 'static> {
    window: Window,
    animation: Rc<RefCell<Animation<E, Canvas2d>>>,
    frame: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
}

impl<E: Effect + 'static> LiveLayer<E> {
    /// Binds `effect` to `canvas` and schedules the first frame.
    pub fn start(window: Window, effect: E, canvas: Canvas2d) -> Self {
        let animation = Rc::new(RefCell::new(Animation::start(effect, canvas)));
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let frame_id = Rc::new(Cell::new(None));

        let (anim, again, id, win) = (
            animation.clone(),
            frame.clone(),
            frame_id.clone(),
            window.clone(),
        );
        *frame.borrow_mut() = Some(Closure::new(move || {
            id.set(None);
            if anim.borrow_mut().frame() == FrameStatus::Stopped {
                return;
            }
            if let Some(ref cb) = *again.borrow() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(next) => id.set(Some(next)),
                    Err(e) => warn!("driftfield: requestAnimationFrame failed: {e:?}"),
                }
            }
        }));

        if let Some(ref cb) = *frame.borrow() {
            match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(first) => frame_id.set(Some(first)),
                Err(e) => warn!("driftfield: requestAnimationFrame failed: {e:?}"),
            }
        }

        Self {
            window,
            animation,
            frame,
            frame_id,
            listeners: Vec::new(),
        }
    }

    /// Registers `handler` for `kind` events on `target` until teardown.
    pub fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        mut handler: impl FnMut(&mut Animation<E, Canvas2d>, &Event) + 'static,
    ) -> Result<(), EngineError> {
        let anim = self.animation.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Ok(mut anim) = anim.try_borrow_mut() {
                handler(&mut *anim, &event);
            }
        });
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| EngineError::SurfaceUnavailable(format!("cannot listen for {kind}: {e:?}")))?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    /// Runs `f` against the effect.
    pub fn with_effect<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(self.animation.borrow_mut().effect_mut())
    }

    pub fn is_running(&self) -> bool {
        self.animation.borrow().is_running()
    }

    /// Stops the loop and detaches from the page. Idempotent.
    pub fn teardown(&mut self) {
        self.animation.borrow().teardown();
        if let Some(id) = self.frame_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!("driftfield: cancelAnimationFrame failed: {e:?}");
            }
        }
        for l in self.listeners.drain(..) {
            if let Err(e) = l
                .target
                .remove_event_listener_with_callback(l.kind, l.callback.as_ref().unchecked_ref())
            {
                warn!("driftfield: cannot remove {} listener: {e:?}", l.kind);
            }
        }
        if self.frame.borrow_mut().take().is_some() {
            debug!("driftfield: layer detached");
        }
    }
}

impl<E: Effect + 'static> Drop for LiveLayer<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
