// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for input, measurement and frame events.
//!
//! [`TraceSink`] has one method per event kind, each defaulting to a no-op.
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`: with the `trace`
//! feature off every method compiles away, with it on each call is a single
//! `Option` branch.
//!
//! The engine itself never traces. Event entry points return report values
//! ([`SampleOutcome`], [`MeasureReport`], [`FrameTick`]) and hosts forward
//! them, which keeps the core free of sink plumbing.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies.
//! - `trace-rich` (implies `trace`) gates [`SurfaceEvent`] and
//!   [`TraceSink::on_surface`].

use crate::frame::FrameTick;
use crate::geometry::{MeasureCause, MeasureReport, Registered, Registration, SurfaceId};
use crate::input::{InputModality, PermissionState, SampleOutcome};
#[cfg(feature = "trace-rich")]
use crate::resolve::RelativeMotion;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// An input sample reached the fusion source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleEvent {
    /// Host time of the sample.
    pub now: HostTime,
    /// Which source produced it.
    pub modality: InputModality,
    /// What the fusion source did with it.
    pub outcome: SampleOutcome,
}

/// A measurement pass ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureEvent {
    /// Host time of the triggering event.
    pub now: HostTime,
    /// Why the pass ran.
    pub cause: MeasureCause,
    /// Entries re-read.
    pub measured: u32,
    /// Entries removed.
    pub dropped: u32,
    /// Entries kept without a rectangle.
    pub unmeasured: u32,
}

impl MeasureEvent {
    /// Creates an event from a pass report.
    #[must_use]
    pub fn new(now: HostTime, report: &MeasureReport) -> Self {
        Self {
            now,
            cause: report.cause,
            measured: report.measured,
            dropped: report.dropped,
            unmeasured: report.unmeasured,
        }
    }
}

/// A surface was registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistrationEvent {
    /// Slot handle of the entry.
    pub id: SurfaceId,
    /// Inserted, replaced or unchanged.
    pub registration: Registration,
}

impl From<&Registered> for RegistrationEvent {
    fn from(r: &Registered) -> Self {
        Self {
            id: r.id,
            registration: r.registration,
        }
    }
}

/// The orientation permission changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionEvent {
    /// State before the change.
    pub from: PermissionState,
    /// State after the change.
    pub to: PermissionState,
}

/// A frame tick was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time of the callback.
    pub now: HostTime,
    /// Clamped step.
    pub delta: Duration,
}

impl From<&FrameTick> for FrameEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            delta: tick.delta,
        }
    }
}

/// Resolved motion of one surface in one frame (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceEvent {
    /// Frame the motion was resolved in.
    pub frame_index: u64,
    /// Slot handle of the surface.
    pub id: SurfaceId,
    /// Resolver output.
    pub motion: RelativeMotion,
}

// ---------------------------------------------------------------------------
// TraceSink
// ---------------------------------------------------------------------------

/// Receiver for engine events. Every method defaults to a no-op.
pub trait TraceSink {
    /// Called for each pointer or orientation sample.
    fn on_sample(&mut self, e: &SampleEvent) {
        _ = e;
    }

    /// Called after each measurement pass.
    fn on_measure(&mut self, e: &MeasureEvent) {
        _ = e;
    }

    /// Called after each surface registration.
    fn on_registration(&mut self, e: &RegistrationEvent) {
        _ = e;
    }

    /// Called when the orientation permission changes.
    fn on_permission(&mut self, e: &PermissionEvent) {
        _ = e;
    }

    /// Called once per frame tick.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called with per-surface motion (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_surface(&mut self, e: &SurfaceEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self::none()
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SampleEvent`].
    #[inline]
    pub fn sample(&mut self, e: &SampleEvent) {
        dispatch!(self, on_sample, e);
    }

    /// Emits a [`MeasureEvent`].
    #[inline]
    pub fn measure(&mut self, e: &MeasureEvent) {
        dispatch!(self, on_measure, e);
    }

    /// Emits a [`RegistrationEvent`].
    #[inline]
    pub fn registration(&mut self, e: &RegistrationEvent) {
        dispatch!(self, on_registration, e);
    }

    /// Emits a [`PermissionEvent`].
    #[inline]
    pub fn permission(&mut self, e: &PermissionEvent) {
        dispatch!(self, on_permission, e);
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        dispatch!(self, on_frame, e);
    }

    /// Emits a [`SurfaceEvent`].
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn surface(&mut self, e: &SurfaceEvent) {
        dispatch!(self, on_surface, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameClock, FrameClockConfig};
    use crate::time::Timebase;

    fn sample_tick() -> FrameTick {
        let mut clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);
        let _ = clock.tick(HostTime(0));
        clock.tick(HostTime(16_000))
    }

    #[test]
    fn frame_event_from_tick() {
        let evt = FrameEvent::from(&sample_tick());
        assert_eq!(evt.frame_index, 1);
        assert_eq!(evt.now, HostTime(16_000));
        assert_eq!(evt.delta, Duration(16_000));
    }

    #[test]
    fn measure_event_copies_report() {
        let report = MeasureReport {
            cause: MeasureCause::Scroll,
            measured: 3,
            dropped: 1,
            unmeasured: 2,
        };
        let evt = MeasureEvent::new(HostTime(5), &report);
        assert_eq!(evt.cause, MeasureCause::Scroll);
        assert_eq!((evt.measured, evt.dropped, evt.unmeasured), (3, 1, 2));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame(&FrameEvent::from(&sample_tick()));
        tracer.permission(&PermissionEvent {
            from: PermissionState::Prompt,
            to: PermissionState::Granted,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame(&mut self, e: &FrameEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame(&FrameEvent::from(&sample_tick()));
        drop(tracer);
        assert_eq!(sink.frames, &[1]);
    }
}
