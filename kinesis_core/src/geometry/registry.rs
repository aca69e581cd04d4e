// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage for tracked element geometry with event-driven measurement.

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{SurfaceId, SurfaceKey};
use crate::dirty;
use crate::host::ElementHandle;

/// What a [`GeometryRegistry::register`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Registration {
    /// The key was new; the host should start observing the element.
    Inserted,
    /// The key existed with a different handle, which was swapped in.
    Replaced,
    /// The key existed with the same handle; nothing new to observe.
    Unchanged,
}

/// Which event triggered a measurement pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasureCause {
    /// A surface was registered.
    Register,
    /// The document scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
    /// An element-resize observation fired.
    Observed,
    /// The deferred post-mount settle pass ran.
    Settle,
}

/// Summary of one measurement pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureReport {
    /// Why the pass ran.
    pub cause: MeasureCause,
    /// Entries whose rectangle was re-read.
    pub measured: u32,
    /// Entries removed because their element was dropped or detached.
    pub dropped: u32,
    /// Entries kept without a rectangle because their element has never
    /// been laid out.
    pub unmeasured: u32,
}

impl MeasureReport {
    const fn empty(cause: MeasureCause) -> Self {
        Self {
            cause,
            measured: 0,
            dropped: 0,
            unmeasured: 0,
        }
    }
}

/// Result of [`GeometryRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registered {
    /// Handle for allocation-free lookups.
    pub id: SurfaceId,
    /// Whether the entry was inserted, replaced or left unchanged.
    pub registration: Registration,
    /// The immediate measurement pass.
    pub report: MeasureReport,
}

/// Reflow-avoiding cache of tracked element rectangles.
///
/// Entries are addressed by [`SurfaceKey`] (or the [`SurfaceId`] returned from
/// registration). Rectangles are stored in document coordinates, i.e. the
/// viewport-relative bounding box plus the scroll offset at measurement time,
/// so scrolling alone never invalidates them.
///
/// Reads ([`rect`](Self::rect), [`rect_of`](Self::rect_of)) never measure.
/// Every event entry point measures synchronously before returning, so the
/// next read after an event reflects post-event geometry.
#[derive(Debug)]
pub struct GeometryRegistry {
    // -- Per-slot state --
    keys: Vec<Option<SurfaceKey>>,
    handles: Vec<Option<Weak<dyn ElementHandle>>>,
    rects: Vec<Option<Rect>>,

    // -- Allocation --
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
    index: BTreeMap<SurfaceKey, u32>,

    // -- Invalidation --
    dirty: DirtyTracker<u32>,

    // -- Layout context --
    scroll: Vec2,
    viewport: Size,
}

impl GeometryRegistry {
    /// Creates an empty registry for the given viewport.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            keys: Vec::new(),
            handles: Vec::new(),
            rects: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            index: BTreeMap::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            scroll: Vec2::ZERO,
            viewport,
        }
    }

    // -- Registration API --

    /// Registers (or re-registers) an element under `key` and measures it.
    ///
    /// Only a weak reference to `handle` is kept. Registering the same key
    /// with the same handle again is a no-op apart from the re-measurement.
    pub fn register<H: ElementHandle + 'static>(
        &mut self,
        key: &str,
        handle: &Rc<H>,
    ) -> Registered {
        let weak: Weak<dyn ElementHandle> = Rc::<H>::downgrade(handle);

        let (idx, registration) = if let Some(&idx) = self.index.get(key) {
            let slot = &mut self.handles[idx as usize];
            let same = slot.as_ref().is_some_and(|w| Weak::ptr_eq(w, &weak));
            if same {
                (idx, Registration::Unchanged)
            } else {
                *slot = Some(weak);
                self.rects[idx as usize] = None;
                self.dirty.mark(idx, dirty::SETTLE);
                (idx, Registration::Replaced)
            }
        } else {
            let idx = self.allocate(SurfaceKey::new(key), weak);
            self.dirty.mark(idx, dirty::SETTLE);
            (idx, Registration::Inserted)
        };

        let id = SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        };
        self.dirty.mark(idx, dirty::MEASURE);
        let report = self.flush(MeasureCause::Register);
        Registered {
            id,
            registration,
            report,
        }
    }

    /// Removes the entry for `key`. Returns whether an entry existed.
    pub fn unregister(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.release(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        for idx in 0..self.len {
            if self.keys[idx as usize].is_some() {
                self.release(idx);
            }
        }
    }

    // -- Read API (never measures) --

    /// Returns the cached document rectangle for `key`.
    ///
    /// `None` if the key is unknown or its element has not been laid out
    /// yet. Entries whose element detached after a successful measurement
    /// are removed.
    #[must_use]
    pub fn rect(&self, key: &str) -> Option<Rect> {
        let &idx = self.index.get(key)?;
        self.rects[idx as usize]
    }

    /// Returns the cached document rectangle for a registration handle.
    ///
    /// A stale handle yields `None`.
    #[must_use]
    pub fn rect_of(&self, id: SurfaceId) -> Option<Rect> {
        if !self.is_live(id) {
            return None;
        }
        self.rects[id.idx as usize]
    }

    /// Returns the current [`SurfaceId`] for `key`, if registered.
    #[must_use]
    pub fn id(&self, key: &str) -> Option<SurfaceId> {
        let &idx = self.index.get(key)?;
        Some(SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Returns whether `id` still refers to a registered entry.
    #[must_use]
    pub fn is_live(&self, id: SurfaceId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.keys[id.idx as usize].is_some()
    }

    /// Returns whether `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the registered keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &SurfaceKey> {
        self.index.keys()
    }

    /// Returns the scroll offset of the last scroll event.
    #[must_use]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Returns the viewport size of the last resize event.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    // -- Event API (measures synchronously) --

    /// Records a new scroll offset and re-measures every entry.
    pub fn on_scroll(&mut self, offset: Vec2) -> MeasureReport {
        self.scroll = offset;
        self.mark_all();
        self.flush(MeasureCause::Scroll)
    }

    /// Records a new viewport size and re-measures every entry.
    pub fn on_resize(&mut self, viewport: Size) -> MeasureReport {
        self.viewport = viewport;
        self.mark_all();
        self.flush(MeasureCause::Resize)
    }

    /// Re-measures one entry after a resize observation.
    ///
    /// Unknown keys are ignored.
    pub fn on_element_resized(&mut self, key: &str) -> MeasureReport {
        let Some(&idx) = self.index.get(key) else {
            return MeasureReport::empty(MeasureCause::Observed);
        };
        self.dirty.mark(idx, dirty::MEASURE);
        self.flush(MeasureCause::Observed)
    }

    /// Re-measures entries registered since the previous settle pass.
    pub fn settle(&mut self) -> MeasureReport {
        let pending: Vec<u32> = self
            .dirty
            .drain(dirty::SETTLE)
            .deterministic()
            .run()
            .collect();
        for idx in pending {
            if self.keys[idx as usize].is_some() {
                self.dirty.mark(idx, dirty::MEASURE);
            }
        }
        self.flush(MeasureCause::Settle)
    }

    // -- Internal helpers --

    fn allocate(&mut self, key: SurfaceKey, handle: Weak<dyn ElementHandle>) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.keys[idx as usize] = Some(key.clone());
            self.handles[idx as usize] = Some(handle);
            self.rects[idx as usize] = None;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.keys.push(Some(key.clone()));
            self.handles.push(Some(handle));
            self.rects.push(None);
            self.generation.push(0);
            idx
        };
        self.index.insert(key, idx);
        idx
    }

    /// Frees a slot and bumps its generation so old handles go stale.
    fn release(&mut self, idx: u32) {
        let slot = idx as usize;
        if let Some(key) = self.keys[slot].take() {
            self.index.remove(&key);
        }
        self.handles[slot] = None;
        self.rects[slot] = None;
        self.generation[slot] = self.generation[slot].wrapping_add(1);
        self.dirty.remove_key(idx);
        self.free_list.push(idx);
    }

    fn mark_all(&mut self) {
        for idx in 0..self.len {
            if self.keys[idx as usize].is_some() {
                self.dirty.mark(idx, dirty::MEASURE);
            }
        }
    }

    /// Drains the MEASURE channel, reading each element once.
    fn flush(&mut self, cause: MeasureCause) -> MeasureReport {
        let pending: Vec<u32> = self
            .dirty
            .drain(dirty::MEASURE)
            .deterministic()
            .run()
            .collect();
        let mut report = MeasureReport::empty(cause);
        for idx in pending {
            let slot = idx as usize;
            if self.keys[slot].is_none() {
                continue;
            }
            let Some(handle) = self.handles[slot].as_ref().and_then(Weak::upgrade) else {
                self.release(idx);
                report.dropped += 1;
                continue;
            };
            match handle.bounding_rect() {
                Some(viewport_rect) => {
                    self.rects[slot] = Some(viewport_rect + self.scroll);
                    report.measured += 1;
                }
                // Measured before, so the element has since detached.
                None if self.rects[slot].is_some() => {
                    self.release(idx);
                    report.dropped += 1;
                }
                // Not in layout yet. Keep the entry for a later pass.
                None => report.unmeasured += 1,
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    /// Test double that counts layout reads.
    struct TestElement {
        rect: Cell<Option<Rect>>,
        reads: Cell<u32>,
    }

    impl TestElement {
        fn new(rect: Rect) -> Rc<Self> {
            Rc::new(Self {
                rect: Cell::new(Some(rect)),
                reads: Cell::new(0),
            })
        }
    }

    impl ElementHandle for TestElement {
        fn bounding_rect(&self) -> Option<Rect> {
            self.reads.set(self.reads.get() + 1);
            self.rect.get()
        }
    }

    fn registry() -> GeometryRegistry {
        GeometryRegistry::new(Size::new(1000.0, 800.0))
    }

    #[test]
    fn register_measures_immediately() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(100.0, 100.0, 300.0, 300.0));
        let r = reg.register("card", &el);
        assert_eq!(r.registration, Registration::Inserted);
        assert_eq!(r.report.measured, 1);
        assert_eq!(reg.rect("card"), Some(Rect::new(100.0, 100.0, 300.0, 300.0)));
        assert_eq!(reg.rect_of(r.id), reg.rect("card"));
    }

    #[test]
    fn register_twice_is_idempotent() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let first = reg.register("card", &el);
        let second = reg.register("card", &el);
        assert_eq!(second.registration, Registration::Unchanged);
        assert_eq!(first.id, second.id);
        assert_eq!(reg.len(), 1, "no duplicate entries");
    }

    #[test]
    fn register_with_new_handle_replaces() {
        let mut reg = registry();
        let a = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = TestElement::new(Rect::new(50.0, 50.0, 70.0, 70.0));
        let _ = reg.register("card", &a);
        let r = reg.register("card", &b);
        assert_eq!(r.registration, Registration::Replaced);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.rect("card"), Some(Rect::new(50.0, 50.0, 70.0, 70.0)));
    }

    #[test]
    fn reads_never_measure() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = reg.register("card", &el);
        let reads = el.reads.get();
        for _ in 0..100 {
            let _ = reg.rect("card");
        }
        assert_eq!(el.reads.get(), reads, "rect() must not touch layout");
    }

    #[test]
    fn cache_is_stale_until_layout_event() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = reg.register("card", &el);

        el.rect.set(Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
        assert_eq!(reg.rect("card"), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let report = reg.on_resize(Size::new(500.0, 500.0));
        assert_eq!(report.measured, 1);
        assert_eq!(reg.rect("card"), Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn scroll_keeps_document_coordinates() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(100.0, 500.0, 200.0, 600.0));
        let _ = reg.register("card", &el);

        // Scrolling down 300px moves the element up in the viewport.
        el.rect.set(Some(Rect::new(100.0, 200.0, 200.0, 300.0)));
        let _ = reg.on_scroll(Vec2::new(0.0, 300.0));
        assert_eq!(reg.rect("card"), Some(Rect::new(100.0, 500.0, 200.0, 600.0)));
        assert_eq!(reg.scroll(), Vec2::new(0.0, 300.0));
    }

    #[test]
    fn dropped_handles_are_removed() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let id = reg.register("card", &el).id;
        drop(el);

        let report = reg.on_resize(Size::new(1.0, 1.0));
        assert_eq!(report.dropped, 1);
        assert!(!reg.contains("card"));
        assert_eq!(reg.rect("card"), None);
        assert_eq!(reg.rect_of(id), None);
    }

    #[test]
    fn detached_elements_are_removed_on_observation() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = reg.register("card", &el);
        el.rect.set(None);

        let report = reg.on_element_resized("card");
        assert_eq!(report.cause, MeasureCause::Observed);
        assert_eq!(report.dropped, 1);
        assert!(reg.is_empty());
    }

    #[test]
    fn unmeasured_entry_survives_until_settle() {
        let mut reg = registry();
        let el = Rc::new(TestElement {
            rect: Cell::new(None),
            reads: Cell::new(0),
        });
        let r = reg.register("card", &el);
        assert_eq!(r.report.unmeasured, 1);
        assert_eq!(r.report.dropped, 0);
        assert!(reg.contains("card"));
        assert_eq!(reg.rect("card"), None);

        // Appended to the document after registration.
        el.rect.set(Some(Rect::new(10.0, 20.0, 110.0, 120.0)));
        assert_eq!(reg.settle().measured, 1);
        assert_eq!(reg.rect("card"), Some(Rect::new(10.0, 20.0, 110.0, 120.0)));
        assert_eq!(reg.rect_of(r.id), reg.rect("card"));
    }

    #[test]
    fn unmeasured_entry_is_dropped_with_its_handle() {
        let mut reg = registry();
        let el = Rc::new(TestElement {
            rect: Cell::new(None),
            reads: Cell::new(0),
        });
        let _ = reg.register("card", &el);
        assert_eq!(reg.on_scroll(Vec2::new(0.0, 10.0)).unmeasured, 1);
        drop(el);
        assert_eq!(reg.on_resize(Size::new(1.0, 1.0)).dropped, 1);
        assert!(reg.is_empty());
    }

    #[test]
    fn observation_remeasures_only_that_entry() {
        let mut reg = registry();
        let a = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = reg.register("a", &a);
        let _ = reg.register("b", &b);
        let before = b.reads.get();

        let report = reg.on_element_resized("a");
        assert_eq!(report.measured, 1);
        assert_eq!(b.reads.get(), before);
        assert_eq!(reg.on_element_resized("missing").measured, 0);
    }

    #[test]
    fn settle_remeasures_new_entries_once() {
        let mut reg = registry();
        let el = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = reg.register("card", &el);

        // Font load shifts the card after mount.
        el.rect.set(Some(Rect::new(0.0, 40.0, 10.0, 50.0)));
        assert_eq!(reg.settle().measured, 1);
        assert_eq!(reg.rect("card"), Some(Rect::new(0.0, 40.0, 10.0, 50.0)));
        assert_eq!(reg.settle().measured, 0, "settle is one-shot per registration");
    }

    #[test]
    fn stale_id_after_slot_reuse() {
        let mut reg = registry();
        let a = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = TestElement::new(Rect::new(5.0, 5.0, 15.0, 15.0));
        let old = reg.register("a", &a).id;
        assert!(reg.unregister("a"));
        let new = reg.register("b", &b).id;

        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert_eq!(reg.rect_of(old), None);
        assert_eq!(reg.rect_of(new), Some(Rect::new(5.0, 5.0, 15.0, 15.0)));
    }

    #[test]
    fn clear_empties_registry() {
        let mut reg = registry();
        let a = TestElement::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = reg.register("a", &a);
        let _ = reg.register("b", &a);
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.keys().count(), 0);
    }
}
