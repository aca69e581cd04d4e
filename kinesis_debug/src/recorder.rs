// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps a copy of every event
//! in arrival order. All event types are `Copy`, so recording never
//! allocates beyond the backing `Vec`.

use kinesis_core::trace::{
    FrameEvent, MeasureEvent, PermissionEvent, RegistrationEvent, SampleEvent, SurfaceEvent,
    TraceSink,
};

/// One recorded event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// An input sample.
    Sample(SampleEvent),
    /// A measurement pass.
    Measure(MeasureEvent),
    /// A surface registration.
    Registration(RegistrationEvent),
    /// A permission transition.
    Permission(PermissionEvent),
    /// A frame tick.
    Frame(FrameEvent),
    /// Per-surface resolved motion.
    Surface(SurfaceEvent),
}

/// A [`TraceSink`] that records every event.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_sample(&mut self, e: &SampleEvent) {
        self.events.push(RecordedEvent::Sample(*e));
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        self.events.push(RecordedEvent::Measure(*e));
    }

    fn on_registration(&mut self, e: &RegistrationEvent) {
        self.events.push(RecordedEvent::Registration(*e));
    }

    fn on_permission(&mut self, e: &PermissionEvent) {
        self.events.push(RecordedEvent::Permission(*e));
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.events.push(RecordedEvent::Frame(*e));
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        self.events.push(RecordedEvent::Surface(*e));
    }
}
