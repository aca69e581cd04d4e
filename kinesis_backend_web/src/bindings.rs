// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser event subscriptions feeding a [`KineticContext`].
//!
//! Subscriptions are shared: one window listener per event kind and one
//! `ResizeObserver` serve every surface, no matter how many are registered.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, OnceCell, RefCell};

use js_sys::Array;
use kurbo::Point;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    AddEventListenerOptions, DeviceOrientationEvent, Element, Event, EventTarget, MouseEvent,
    ResizeObserver, ResizeObserverEntry, Window,
};

use kinesis_core::KineticContext;
use kinesis_core::frame::FrameTick;
use kinesis_core::geometry::{GeometryRegistry, MeasureReport, Registered, Registration, SurfaceKey};
use kinesis_core::input::{InputModality, OrientationSample};
use kinesis_core::trace::{
    FrameEvent, MeasureEvent, RegistrationEvent, SampleEvent, TraceSink, Tracer,
};

use crate::element::DomElement;
use crate::{now, permission, probe};

/// Attribute carrying a surface's key on its observed element.
pub const KEY_ATTRIBUTE: &str = "data-kinesis-key";

/// A trace sink shared between the bindings' callbacks.
pub type SharedSink = Rc<RefCell<dyn TraceSink>>;

/// Delay before the post-mount settle pass, in milliseconds.
const SETTLE_DELAY_MS: i32 = 250;

/// State reachable from every callback.
struct Shared {
    ctx: Rc<RefCell<KineticContext>>,
    sink: Option<SharedSink>,
    /// Strong references for registered elements; the registry only holds
    /// weak ones.
    elements: RefCell<BTreeMap<SurfaceKey, Rc<DomElement>>>,
    /// Set once, right after construction.
    observer: OnceCell<ResizeObserver>,
    settle_pending: Cell<bool>,
}

impl Shared {
    fn trace(&self, emit: impl FnOnce(&mut Tracer<'_>)) {
        if let Some(sink) = &self.sink {
            let mut sink = sink.borrow_mut();
            emit(&mut Tracer::new(&mut *sink));
        }
    }

    /// Traces a measurement pass and forgets elements the pass dropped.
    fn after_pass(&self, report: &MeasureReport) {
        let e = MeasureEvent::new(now(), report);
        self.trace(|t| t.measure(&e));
        if report.dropped == 0 {
            return;
        }
        let stale = {
            let ctx = self.ctx.borrow();
            prune_unregistered(&mut *self.elements.borrow_mut(), ctx.registry())
        };
        for handle in stale {
            if let Some(observer) = self.observer.get() {
                observer.unobserve(handle.element());
            }
            let _ = handle.element().remove_attribute(KEY_ATTRIBUTE);
        }
    }
}

/// Removes entries whose key the registry no longer tracks and returns them.
fn prune_unregistered<V>(
    elements: &mut BTreeMap<SurfaceKey, V>,
    registry: &GeometryRegistry,
) -> Vec<V> {
    let stale: Vec<SurfaceKey> = elements
        .keys()
        .filter(|key| !registry.contains(key.as_str()))
        .cloned()
        .collect();
    stale
        .iter()
        .filter_map(|key| elements.remove(key))
        .collect()
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Window listeners and element observation for one [`KineticContext`].
///
/// Construct once per page. Dropping the bindings removes every listener,
/// disconnects the observer and cancels a pending settle pass.
pub struct KineticBindings {
    window: Window,
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
    observer: ResizeObserver,
    _observer_callback: Closure<dyn FnMut(Array)>,
    settle_callback: Closure<dyn FnMut()>,
    settle_handle: Cell<Option<i32>>,
}

impl KineticBindings {
    /// Subscribes to the window's pointer, orientation, scroll and resize
    /// events.
    ///
    /// For orientation-driven contexts the permission starts at whatever the
    /// browser reports via [`initial_permission`](crate::initial_permission).
    ///
    /// # Errors
    ///
    /// Fails if the `ResizeObserver` cannot be created or a listener cannot
    /// be attached.
    pub fn new(
        window: Window,
        ctx: Rc<RefCell<KineticContext>>,
        sink: Option<SharedSink>,
    ) -> Result<Self, JsValue> {
        let shared = Rc::new(Shared {
            ctx,
            sink,
            elements: RefCell::new(BTreeMap::new()),
            observer: OnceCell::new(),
            settle_pending: Cell::new(false),
        });

        if shared.ctx.borrow().modality() == InputModality::Orientation {
            let change = shared
                .ctx
                .borrow_mut()
                .set_orientation_permission(permission::initial_permission());
            if let Some(e) = change {
                shared.trace(|t| t.permission(&e));
            }
        }

        let observer_callback = {
            let shared = Rc::clone(&shared);
            Closure::wrap(Box::new(move |entries: Array| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() else {
                        continue;
                    };
                    let Some(key) = entry.target().get_attribute(KEY_ATTRIBUTE) else {
                        continue;
                    };
                    let report = shared.ctx.borrow_mut().on_element_resized(&key);
                    shared.after_pass(&report);
                }
            }) as Box<dyn FnMut(Array)>)
        };
        let observer = ResizeObserver::new(observer_callback.as_ref().unchecked_ref())?;
        let _ = shared.observer.set(observer.clone());

        let settle_callback = {
            let shared = Rc::clone(&shared);
            Closure::wrap(Box::new(move || {
                shared.settle_pending.set(false);
                let report = shared.ctx.borrow_mut().settle();
                shared.after_pass(&report);
            }) as Box<dyn FnMut()>)
        };

        let mut bindings = Self {
            window,
            shared,
            listeners: Vec::new(),
            observer,
            _observer_callback: observer_callback,
            settle_callback,
            settle_handle: Cell::new(None),
        };
        bindings.attach_window_listeners()?;
        Ok(bindings)
    }

    fn attach_window_listeners(&mut self) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        self.listen("pointermove", false, move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let client = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
            let t = now();
            let outcome = shared.ctx.borrow_mut().on_pointer_move(client, t);
            let e = SampleEvent {
                now: t,
                modality: InputModality::Pointer,
                outcome,
            };
            shared.trace(|tr| tr.sample(&e));
        })?;

        let shared = Rc::clone(&self.shared);
        self.listen("deviceorientation", false, move |event| {
            let Some(orientation) = event.dyn_ref::<DeviceOrientationEvent>() else {
                return;
            };
            let sample = OrientationSample {
                beta: orientation.beta(),
                gamma: orientation.gamma(),
            };
            let t = now();
            let outcome = shared.ctx.borrow_mut().on_orientation(sample, t);
            let e = SampleEvent {
                now: t,
                modality: InputModality::Orientation,
                outcome,
            };
            shared.trace(|tr| tr.sample(&e));
        })?;

        let shared = Rc::clone(&self.shared);
        let window = self.window.clone();
        self.listen("scroll", true, move |_| {
            let report = shared
                .ctx
                .borrow_mut()
                .on_scroll(probe::scroll_offset(&window));
            shared.after_pass(&report);
        })?;

        let shared = Rc::clone(&self.shared);
        let window = self.window.clone();
        self.listen("resize", false, move |_| {
            let report = shared
                .ctx
                .borrow_mut()
                .on_resize(probe::viewport_size(&window));
            shared.after_pass(&report);
        })?;

        Ok(())
    }

    fn listen(
        &mut self,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let target: EventTarget = self.window.clone().into();
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
        } else {
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        }
        self.listeners.push(Listener {
            target,
            kind,
            closure,
        });
        Ok(())
    }

    /// Returns the shared context.
    #[must_use]
    pub fn context(&self) -> &Rc<RefCell<KineticContext>> {
        &self.shared.ctx
    }

    /// Registers `element` as the surface `key` and starts observing its size.
    ///
    /// Calling again with the same element is cheap and leaves the
    /// observation untouched. A different element replaces the old one,
    /// which stops being observed. Each call schedules a deferred settle
    /// pass so late layout (fonts, images) is picked up.
    ///
    /// # Errors
    ///
    /// Fails if the key attribute cannot be set on `element`.
    pub fn observe(&self, key: &str, element: &Element) -> Result<Registered, JsValue> {
        let handle = {
            let elements = self.shared.elements.borrow();
            match elements.get(key) {
                Some(existing) if existing.element() == element => Rc::clone(existing),
                _ => Rc::new(DomElement::new(element.clone())),
            }
        };

        let registered = self.shared.ctx.borrow_mut().register_surface(key, &handle);

        if registered.registration != Registration::Unchanged {
            element.set_attribute(KEY_ATTRIBUTE, key)?;
            let previous = self
                .shared
                .elements
                .borrow_mut()
                .insert(SurfaceKey::new(key), handle);
            if let Some(previous) = previous {
                self.observer.unobserve(previous.element());
            }
            self.observer.observe(element);
        }

        let e = RegistrationEvent::from(&registered);
        self.shared.trace(|t| t.registration(&e));
        self.shared.after_pass(&registered.report);
        self.schedule_settle();
        Ok(registered)
    }

    /// Stops observing the surface `key` and forgets it.
    ///
    /// Returns whether the key was registered.
    pub fn unobserve(&self, key: &str) -> bool {
        if let Some(previous) = self.shared.elements.borrow_mut().remove(key) {
            self.observer.unobserve(previous.element());
            let _ = previous.element().remove_attribute(KEY_ATTRIBUTE);
        }
        self.shared.ctx.borrow_mut().unregister_surface(key)
    }

    /// Requests orientation access and applies the answer to the context.
    ///
    /// Must be called from a user-gesture handler (click, tap). The request
    /// completes asynchronously; the context keeps ignoring orientation
    /// samples until the browser answers.
    pub fn request_orientation_permission(&self) {
        let shared = Rc::clone(&self.shared);
        wasm_bindgen_futures::spawn_local(async move {
            let answer = permission::request_permission().await;
            let current = shared.ctx.borrow().permission();
            let state = permission::apply_answer(current, answer);
            let change = shared.ctx.borrow_mut().set_orientation_permission(state);
            if let Some(e) = change {
                shared.trace(|t| t.permission(&e));
            }
        });
    }

    /// Traces a frame tick from the host's render loop.
    ///
    /// With the `trace-rich` feature this also traces every registered
    /// surface's resolved motion for that frame.
    pub fn trace_frame(&self, tick: &FrameTick) {
        self.shared.trace(|t| {
            t.frame(&FrameEvent::from(tick));
            #[cfg(feature = "trace-rich")]
            for (id, motion) in self.shared.ctx.borrow().resolve_all() {
                t.surface(&kinesis_core::trace::SurfaceEvent {
                    frame_index: tick.frame_index,
                    id,
                    motion,
                });
            }
        });
    }

    fn schedule_settle(&self) {
        if self.shared.settle_pending.get() {
            return;
        }
        if let Ok(handle) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.settle_callback.as_ref().unchecked_ref(),
                SETTLE_DELAY_MS,
            )
        {
            self.shared.settle_pending.set(true);
            self.settle_handle.set(Some(handle));
        }
    }
}

impl Drop for KineticBindings {
    fn drop(&mut self) {
        for l in self.listeners.drain(..) {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
        }
        self.observer.disconnect();
        if self.shared.settle_pending.get()
            && let Some(handle) = self.settle_handle.take()
        {
            self.window.clear_timeout_with_handle(handle);
        }
        self.shared.elements.borrow_mut().clear();
        self.shared.ctx.borrow_mut().teardown();
    }
}

impl core::fmt::Debug for KineticBindings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KineticBindings")
            .field("listeners", &self.listeners.len())
            .field("surfaces", &self.shared.elements.borrow().len())
            .field("settle_pending", &self.shared.settle_pending.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use kurbo::{Rect, Size};

    use kinesis_core::host::ElementHandle;

    use super::*;

    struct Boxed(Cell<Option<Rect>>);

    impl ElementHandle for Boxed {
        fn bounding_rect(&self) -> Option<Rect> {
            self.0.get()
        }
    }

    #[test]
    fn pruning_follows_dropped_registry_entries() {
        let mut registry = GeometryRegistry::new(Size::new(800.0, 600.0));
        let kept = Rc::new(Boxed(Cell::new(Some(Rect::new(0.0, 0.0, 10.0, 10.0)))));
        let gone = Rc::new(Boxed(Cell::new(Some(Rect::new(0.0, 0.0, 10.0, 10.0)))));
        let _ = registry.register("kept", &kept);
        let _ = registry.register("gone", &gone);

        let mut elements: BTreeMap<SurfaceKey, String> = BTreeMap::new();
        elements.insert(SurfaceKey::new("kept"), String::from("kept-el"));
        elements.insert(SurfaceKey::new("gone"), String::from("gone-el"));

        gone.0.set(None);
        let report = registry.on_resize(Size::new(400.0, 300.0));
        assert_eq!(report.dropped, 1);

        let stale = prune_unregistered(&mut elements, &registry);
        assert_eq!(stale, ["gone-el"]);
        assert_eq!(elements.len(), 1);
        assert!(elements.contains_key("kept"));
        assert!(prune_unregistered(&mut elements, &registry).is_empty());
    }
}
