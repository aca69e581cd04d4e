// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` loop.
//!
//! Each callback's `DOMHighResTimeStamp` goes through a [`FrameClock`], so
//! the tick handed to the user carries a clamped step. A tab returning from
//! the background therefore advances springs by at most one clamped step.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use kinesis_core::frame::{FrameClock, FrameClockConfig, FrameTick};

use crate::ms_to_host_time;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// A self-rescheduling `requestAnimationFrame` loop.
///
/// Call [`start`](Self::start) to begin; the loop runs until
/// [`stop`](Self::stop) or drop.
pub struct RafLoop {
    state: Rc<LoopState>,
}

struct LoopState {
    /// The registered JS function. Lives apart from `on_frame` so a frame
    /// can re-request itself while the user callback is borrowed.
    js_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    on_frame: RefCell<Box<dyn FnMut(FrameTick)>>,
    clock: RefCell<FrameClock>,
    running: Cell<bool>,
    /// Handle of the outstanding request, if any.
    pending: Cell<Option<i32>>,
}

impl LoopState {
    fn request_next(&self) {
        if let Some(f) = self.js_callback.borrow().as_ref() {
            self.pending
                .set(Some(request_animation_frame(f.as_ref().unchecked_ref())));
        }
    }

    fn frame(&self, timestamp_ms: f64) {
        self.pending.set(None);
        if !self.running.get() {
            return;
        }
        let tick = self.clock.borrow_mut().tick(ms_to_host_time(timestamp_ms));
        (self.on_frame.borrow_mut())(tick);
        if self.running.get() {
            self.request_next();
        }
    }
}

impl RafLoop {
    /// Creates a stopped loop.
    pub fn new(on_frame: impl FnMut(FrameTick) + 'static, config: FrameClockConfig) -> Self {
        Self {
            state: Rc::new(LoopState {
                js_callback: RefCell::new(None),
                on_frame: RefCell::new(Box::new(on_frame)),
                clock: RefCell::new(FrameClock::new(config, crate::timebase())),
                running: Cell::new(false),
                pending: Cell::new(None),
            }),
        }
    }

    /// Starts the loop. No-op if already running.
    ///
    /// After a [`stop`](Self::stop), the first tick reports a zero step.
    pub fn start(&self) {
        if self.state.running.replace(true) {
            return;
        }
        self.state.clock.borrow_mut().pause();

        if self.state.js_callback.borrow().is_none() {
            // Weak, so the JS function does not keep the loop alive.
            let weak = Rc::downgrade(&self.state);
            let js_callback = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                if let Some(state) = weak.upgrade() {
                    state.frame(timestamp_ms);
                }
            }) as Box<dyn FnMut(f64)>);
            *self.state.js_callback.borrow_mut() = Some(js_callback);
        }
        if self.state.pending.get().is_none() {
            self.state.request_next();
        }
    }

    /// Stops the loop and cancels the outstanding request.
    pub fn stop(&self) {
        self.state.running.set(false);
        if let Some(id) = self.state.pending.take() {
            cancel_animation_frame(id);
        }
    }

    /// Returns whether the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
