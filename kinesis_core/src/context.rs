// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The kinetic context: shared state for one page or window.

use alloc::rc::Rc;

use kurbo::{Point, Size, Vec2};

use crate::frame::FrameClockConfig;
use crate::geometry::{GeometryRegistry, MeasureReport, Registered, SurfaceId};
use crate::host::ElementHandle;
use crate::input::{
    InputFusion, InputModality, OrientationSample, PermissionState, PointerCapability,
    SampleOutcome, TiltCalibration,
};
use crate::resolve::{RelativeMotion, resolve};
use crate::time::{HostTime, Timebase};
use crate::trace::PermissionEvent;
use crate::velocity::{VelocityConfig, VelocityTracker};

/// Construction parameters for a [`KineticContext`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KineticConfig {
    /// Result of the host's capability probe.
    pub capability: PointerCapability,
    /// Tilt-to-viewport mapping for orientation input.
    pub calibration: TiltCalibration,
    /// Velocity staleness.
    pub velocity: VelocityConfig,
    /// Frame step clamping for the host loop.
    pub frame: FrameClockConfig,
    /// Interpretation of [`HostTime`] ticks.
    pub timebase: Timebase,
}

impl KineticConfig {
    /// Fine pointer, microsecond timestamps.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            capability: PointerCapability::Fine,
            calibration: TiltCalibration::DEFAULT,
            velocity: VelocityConfig::DEFAULT,
            frame: FrameClockConfig::DEFAULT,
            timebase: Timebase::MICROS,
        }
    }

    /// Coarse pointer (device tilt), microsecond timestamps.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            capability: PointerCapability::Coarse,
            ..Self::desktop()
        }
    }

    /// Picks [`desktop`](Self::desktop) or [`touch`](Self::touch).
    #[must_use]
    pub const fn for_capability(capability: PointerCapability) -> Self {
        match capability {
            PointerCapability::Fine => Self::desktop(),
            PointerCapability::Coarse => Self::touch(),
        }
    }
}

impl Default for KineticConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Owns the fused signal, its velocity and the geometry registry.
///
/// Event entry points (`on_*`, [`settle`](Self::settle),
/// [`register_surface`](Self::register_surface)) mutate state and may measure
/// geometry. Everything else is a read and is safe to call every frame.
#[derive(Debug)]
pub struct KineticContext {
    config: KineticConfig,
    input: InputFusion,
    velocity: VelocityTracker,
    registry: GeometryRegistry,
}

impl KineticContext {
    /// Creates a context for a viewport of the given size.
    #[must_use]
    pub fn new(config: KineticConfig, viewport: Size) -> Self {
        Self {
            input: InputFusion::new(config.capability, config.calibration, viewport),
            velocity: VelocityTracker::new(config.velocity, config.timebase),
            registry: GeometryRegistry::new(viewport),
            config,
        }
    }

    // -- Reads --

    /// Returns the construction config.
    #[must_use]
    pub fn config(&self) -> &KineticConfig {
        &self.config
    }

    /// Returns the fused signal in viewport pixels.
    #[must_use]
    pub fn fused_position(&self) -> Point {
        self.input.position()
    }

    /// Returns the signal velocity in pixels per second as seen at `now`.
    #[must_use]
    pub fn velocity(&self, now: HostTime) -> Vec2 {
        self.velocity.velocity_at(now)
    }

    /// Returns the signal speed in pixels per second as seen at `now`.
    #[must_use]
    pub fn speed(&self, now: HostTime) -> f64 {
        self.velocity.speed_at(now)
    }

    /// Returns the active input modality.
    #[must_use]
    pub fn modality(&self) -> InputModality {
        self.input.modality()
    }

    /// Returns the orientation permission state.
    #[must_use]
    pub fn permission(&self) -> PermissionState {
        self.input.permission()
    }

    /// Returns the geometry registry.
    #[must_use]
    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    /// Resolves the signal against the surface registered as `key`.
    ///
    /// Unknown or unmeasured surfaces resolve to [`RelativeMotion::NEUTRAL`].
    #[must_use]
    pub fn resolve_relative_motion(&self, key: &str) -> RelativeMotion {
        resolve(
            self.input.position(),
            self.registry.rect(key),
            self.registry.scroll(),
        )
    }

    /// Like [`resolve_relative_motion`](Self::resolve_relative_motion), by
    /// slot handle. Stale handles resolve to [`RelativeMotion::NEUTRAL`].
    #[must_use]
    pub fn resolve_by_id(&self, id: SurfaceId) -> RelativeMotion {
        resolve(
            self.input.position(),
            self.registry.rect_of(id),
            self.registry.scroll(),
        )
    }

    /// Resolves every registered surface, in key order.
    pub fn resolve_all(&self) -> impl Iterator<Item = (SurfaceId, RelativeMotion)> + '_ {
        self.registry
            .keys()
            .filter_map(|key| self.registry.id(key.as_str()))
            .map(|id| (id, self.resolve_by_id(id)))
    }

    // -- Registration --

    /// Registers a surface and measures it. Idempotent per key and handle.
    pub fn register_surface<H: ElementHandle + 'static>(
        &mut self,
        key: &str,
        handle: &Rc<H>,
    ) -> Registered {
        self.registry.register(key, handle)
    }

    /// Forgets a surface. Returns whether it was registered.
    pub fn unregister_surface(&mut self, key: &str) -> bool {
        self.registry.unregister(key)
    }

    // -- Events --

    /// Feeds a pointer-move at client coordinates `client`.
    pub fn on_pointer_move(&mut self, client: Point, now: HostTime) -> SampleOutcome {
        let outcome = self.input.pointer_move(client);
        if let Some(p) = outcome.applied() {
            self.velocity.update(p, now);
        }
        outcome
    }

    /// Feeds a device-orientation reading.
    pub fn on_orientation(&mut self, sample: OrientationSample, now: HostTime) -> SampleOutcome {
        let outcome = self.input.orientation(sample);
        if let Some(p) = outcome.applied() {
            self.velocity.update(p, now);
        }
        outcome
    }

    /// Records a document scroll and re-measures every surface.
    pub fn on_scroll(&mut self, offset: Vec2) -> MeasureReport {
        self.registry.on_scroll(offset)
    }

    /// Records a viewport resize and re-measures every surface.
    pub fn on_resize(&mut self, viewport: Size) -> MeasureReport {
        self.input.resize(viewport);
        self.registry.on_resize(viewport)
    }

    /// Re-measures one surface after an element-resize observation.
    pub fn on_element_resized(&mut self, key: &str) -> MeasureReport {
        self.registry.on_element_resized(key)
    }

    /// Runs the deferred post-mount measurement pass.
    pub fn settle(&mut self) -> MeasureReport {
        self.registry.settle()
    }

    /// Updates the orientation permission.
    ///
    /// Returns the transition, or `None` if the state did not change.
    pub fn set_orientation_permission(&mut self, state: PermissionState) -> Option<PermissionEvent> {
        let from = self.input.permission();
        if from == state {
            return None;
        }
        self.input.set_permission(state);
        if !state.allows_samples() {
            self.velocity.reset();
        }
        Some(PermissionEvent { from, to: state })
    }

    /// Drops every registered surface and forgets velocity history.
    ///
    /// Host subscriptions are owned by the host and released separately.
    pub fn teardown(&mut self) {
        self.registry.clear();
        self.velocity.reset();
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use kurbo::Rect;

    use super::*;
    use crate::geometry::Registration;
    use crate::input::IgnoreReason;
    use crate::spring::{Spring2d, SpringConfig};

    struct Element(Cell<Option<Rect>>);

    impl Element {
        fn at(rect: Rect) -> Rc<Self> {
            Rc::new(Self(Cell::new(Some(rect))))
        }
    }

    impl ElementHandle for Element {
        fn bounding_rect(&self) -> Option<Rect> {
            self.0.get()
        }
    }

    fn desktop() -> KineticContext {
        KineticContext::new(KineticConfig::desktop(), Size::new(1000.0, 800.0))
    }

    #[test]
    fn resolve_all_walks_surfaces_in_key_order() {
        let mut ctx = desktop();
        let b = Element::at(Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = Element::at(Rect::new(500.0, 500.0, 600.0, 600.0));
        let id_b = ctx.register_surface("b", &b).id;
        let id_a = ctx.register_surface("a", &a).id;
        let _ = ctx.on_pointer_move(Point::new(50.0, 25.0), HostTime(0));

        let all: alloc::vec::Vec<_> = ctx.resolve_all().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], (id_a, RelativeMotion::NEUTRAL));
        assert_eq!(all[1].0, id_b);
        assert_eq!(all[1].1.rel, Point::new(0.5, 0.25));
        assert!(all[1].1.is_over);
    }

    #[test]
    fn end_to_end_card() {
        let mut ctx = desktop();
        let card = Element::at(Rect::new(100.0, 100.0, 300.0, 300.0));
        let _ = ctx.register_surface("card", &card);

        let _ = ctx.on_pointer_move(Point::new(150.0, 150.0), HostTime(0));
        let m = ctx.resolve_relative_motion("card");
        assert_eq!(m.rel, Point::new(0.25, 0.25));
        assert!(m.is_over);

        let mut spring = Spring2d::new(SpringConfig::card(), Point::new(0.5, 0.5));
        spring.set_target(m.target());
        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }
        let held = spring.position();
        assert!((held.x - 0.25).abs() < 0.01, "smoothed {held:?}");

        let _ = ctx.on_pointer_move(Point::new(50.0, 50.0), HostTime(2_000_000));
        let m = ctx.resolve_relative_motion("card");
        assert!(!m.is_over);
        spring.set_target(m.target());

        // Relaxes toward the centre over several frames instead of snapping.
        let first = spring.step(1.0 / 60.0);
        assert!(first.x > held.x && first.x < 0.5, "first step {first:?}");
        let mut prev = first.x;
        for _ in 0..10 {
            let p = spring.step(1.0 / 60.0);
            assert!(p.x >= prev);
            prev = p.x;
        }
        assert!(prev < 0.5);
    }

    #[test]
    fn unknown_surface_is_neutral() {
        let mut ctx = desktop();
        let _ = ctx.on_pointer_move(Point::new(10.0, 10.0), HostTime(0));
        assert_eq!(ctx.resolve_relative_motion("nope"), RelativeMotion::NEUTRAL);
    }

    #[test]
    fn re_registration_does_not_duplicate() {
        let mut ctx = desktop();
        let el = Element::at(Rect::new(0.0, 0.0, 10.0, 10.0));
        let a = ctx.register_surface("x", &el);
        let b = ctx.register_surface("x", &el);
        assert_eq!(a.registration, Registration::Inserted);
        assert_eq!(b.registration, Registration::Unchanged);
        assert_eq!(ctx.registry().len(), 1);
        assert_eq!(ctx.resolve_by_id(a.id), ctx.resolve_relative_motion("x"));
    }

    #[test]
    fn resize_is_visible_before_next_frame() {
        let mut ctx = desktop();
        let el = Element::at(Rect::new(0.0, 0.0, 100.0, 100.0));
        let _ = ctx.register_surface("x", &el);
        let _ = ctx.on_pointer_move(Point::new(150.0, 50.0), HostTime(0));
        assert!(!ctx.resolve_relative_motion("x").is_over);

        el.0.set(Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
        let _ = ctx.on_resize(Size::new(500.0, 800.0));
        let m = ctx.resolve_relative_motion("x");
        assert!(m.is_over);
        assert_eq!(m.rel, Point::new(0.75, 0.5));
    }

    #[test]
    fn scroll_moves_surface_under_static_pointer() {
        let mut ctx = desktop();
        let el = Element::at(Rect::new(0.0, 400.0, 100.0, 500.0));
        let _ = ctx.register_surface("x", &el);
        let _ = ctx.on_pointer_move(Point::new(50.0, 150.0), HostTime(0));
        assert!(!ctx.resolve_relative_motion("x").is_over);

        el.0.set(Some(Rect::new(0.0, 100.0, 100.0, 200.0)));
        let _ = ctx.on_scroll(Vec2::new(0.0, 300.0));
        assert!(ctx.resolve_relative_motion("x").is_over);
    }

    #[test]
    fn velocity_tracks_pointer_and_goes_stale() {
        let mut ctx = desktop();
        let _ = ctx.on_pointer_move(Point::new(0.0, 0.0), HostTime(0));
        let _ = ctx.on_pointer_move(Point::new(30.0, 40.0), HostTime(10_000));
        assert!((ctx.speed(HostTime(10_000)) - 5000.0).abs() < 1e-6);
        assert_eq!(ctx.velocity(HostTime(500_000)), Vec2::ZERO);
    }

    #[test]
    fn touch_waits_for_permission() {
        let mut ctx = KineticContext::new(KineticConfig::touch(), Size::new(400.0, 800.0));
        assert_eq!(ctx.fused_position(), Point::new(200.0, 400.0));

        let evt = ctx.set_orientation_permission(PermissionState::Prompt);
        assert_eq!(evt.map(|e| e.to), Some(PermissionState::Prompt));
        let tilt = OrientationSample {
            beta: Some(60.0),
            gamma: Some(15.0),
        };
        assert_eq!(
            ctx.on_orientation(tilt, HostTime(0)),
            SampleOutcome::Ignored(IgnoreReason::PermissionPending)
        );
        assert_eq!(ctx.fused_position(), Point::new(200.0, 400.0));

        let _ = ctx.set_orientation_permission(PermissionState::Granted);
        assert!(ctx.on_orientation(tilt, HostTime(1_000)).applied().is_some());
        assert_eq!(ctx.fused_position(), Point::new(400.0, 800.0));
        assert!(ctx.set_orientation_permission(PermissionState::Granted).is_none());
    }

    #[test]
    fn pointer_events_ignored_on_touch() {
        let mut ctx = KineticContext::new(KineticConfig::touch(), Size::new(400.0, 800.0));
        assert_eq!(
            ctx.on_pointer_move(Point::new(1.0, 1.0), HostTime(0)),
            SampleOutcome::Ignored(IgnoreReason::WrongModality)
        );
    }

    #[test]
    fn teardown_forgets_surfaces() {
        let mut ctx = desktop();
        let el = Element::at(Rect::new(0.0, 0.0, 10.0, 10.0));
        let _ = ctx.register_surface("x", &el);
        ctx.teardown();
        assert!(ctx.registry().is_empty());
        assert_eq!(ctx.resolve_relative_motion("x"), RelativeMotion::NEUTRAL);
    }
}
