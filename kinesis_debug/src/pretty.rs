// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use kinesis_core::input::SampleOutcome;
use kinesis_core::time::{HostTime, Timebase};
use kinesis_core::trace::{
    FrameEvent, MeasureEvent, PermissionEvent, RegistrationEvent, SampleEvent, SurfaceEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    /// Print every sample instead of only ignored ones.
    verbose_samples: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("verbose_samples", &self.verbose_samples)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            verbose_samples: false,
        }
    }

    /// Also prints applied samples. Pointer input arrives at event rate, so
    /// this is off by default.
    #[must_use]
    pub fn verbose_samples(mut self, verbose: bool) -> Self {
        self.verbose_samples = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1e6
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_sample(&mut self, e: &SampleEvent) {
        match e.outcome {
            SampleOutcome::Applied(p) if self.verbose_samples => {
                let _ = writeln!(
                    self.writer,
                    "[sample] {:?} at {:.3}ms -> ({:.1}, {:.1})",
                    e.modality,
                    self.ms(e.now),
                    p.x,
                    p.y,
                );
            }
            SampleOutcome::Applied(_) => {}
            SampleOutcome::Ignored(reason) => {
                let _ = writeln!(
                    self.writer,
                    "[sample] {:?} at {:.3}ms ignored: {reason:?}",
                    e.modality,
                    self.ms(e.now),
                );
            }
        }
    }

    fn on_measure(&mut self, e: &MeasureEvent) {
        let _ = writeln!(
            self.writer,
            "[measure] {:?} at {:.3}ms measured={} dropped={} unmeasured={}",
            e.cause,
            self.ms(e.now),
            e.measured,
            e.dropped,
            e.unmeasured,
        );
    }

    fn on_registration(&mut self, e: &RegistrationEvent) {
        let _ = writeln!(
            self.writer,
            "[register] {:?} {:?}",
            e.id, e.registration,
        );
    }

    fn on_permission(&mut self, e: &PermissionEvent) {
        let _ = writeln!(self.writer, "[permission] {:?} -> {:?}", e.from, e.to);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] #{} at {:.3}ms dt={:.3}ms",
            e.frame_index,
            self.ms(e.now),
            self.ms(HostTime(e.delta.ticks())),
        );
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        let over = if e.motion.is_over { "over" } else { "away" };
        let _ = writeln!(
            self.writer,
            "[surface] #{} {:?} rel=({:.3}, {:.3}) {over}",
            e.frame_index, e.id, e.motion.rel.x, e.motion.rel.y,
        );
    }
}
