// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic simulated host for kinesis tests and demos.
//!
//! - [`FakeElement`]: an [`ElementHandle`] whose rectangle and attachment are
//!   set by the test.
//! - [`PointerScript`]: a piecewise-linear pointer path over time.
//! - [`FrameDriver`]: a fixed-interval frame loop with stall injection.
//! - [`drive`]: plays a script into a [`KineticContext`] frame by frame.
//! - [`SettleTracker`]: letter-graded settle quality for smoothed outputs.

#![no_std]

extern crate alloc;

mod settle;

pub use settle::{SettleGrade, SettleReport, SettleSample, SettleTracker};

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::{Point, Rect, Vec2};

use kinesis_core::KineticContext;
use kinesis_core::frame::{FrameClock, FrameClockConfig, FrameTick};
use kinesis_core::host::ElementHandle;
use kinesis_core::input::InputModality;
use kinesis_core::time::{Duration, HostTime, Timebase};
use kinesis_core::trace::{FrameEvent, SampleEvent, Tracer};

// ---------------------------------------------------------------------------
// FakeElement
// ---------------------------------------------------------------------------

/// A scripted element. Reports its rectangle until detached.
#[derive(Debug)]
pub struct FakeElement {
    rect: Cell<Rect>,
    attached: Cell<bool>,
}

impl FakeElement {
    /// Creates an attached element at `rect` (viewport coordinates).
    #[must_use]
    pub fn new(rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            rect: Cell::new(rect),
            attached: Cell::new(true),
        })
    }

    /// Moves or resizes the element. The registry sees the change on its
    /// next measurement pass.
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Shifts the element, e.g. to mimic a scroll of `-offset`.
    pub fn translate(&self, offset: Vec2) {
        self.rect.set(self.rect.get() + offset);
    }

    /// Removes the element from the simulated document.
    pub fn detach(&self) {
        self.attached.set(false);
    }

    /// Returns the current rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect.get()
    }
}

impl ElementHandle for FakeElement {
    fn bounding_rect(&self) -> Option<Rect> {
        self.attached.get().then(|| self.rect.get())
    }
}

// ---------------------------------------------------------------------------
// PointerScript
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Leg {
    to: Point,
    secs: f64,
}

/// A pointer path made of straight timed legs.
#[derive(Clone, Debug)]
pub struct PointerScript {
    start: Point,
    legs: Vec<Leg>,
}

impl PointerScript {
    /// Starts a path at `start`.
    #[must_use]
    pub fn starting_at(start: Point) -> Self {
        Self {
            start,
            legs: Vec::new(),
        }
    }

    /// Moves in a straight line to `to` over `secs` seconds. Zero or
    /// negative durations jump.
    #[must_use]
    pub fn move_to(mut self, to: Point, secs: f64) -> Self {
        self.legs.push(Leg {
            to,
            secs: secs.max(0.0),
        });
        self
    }

    /// Stays put for `secs` seconds.
    #[must_use]
    pub fn hold(self, secs: f64) -> Self {
        let here = self.end();
        self.move_to(here, secs)
    }

    /// Returns the total duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.legs.iter().map(|l| l.secs).sum()
    }

    /// Returns the final position.
    #[must_use]
    pub fn end(&self) -> Point {
        self.legs.last().map_or(self.start, |l| l.to)
    }

    /// Returns the position `t` seconds into the path, clamped to its ends.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point {
        let mut from = self.start;
        let mut remaining = t.max(0.0);
        for leg in &self.legs {
            if remaining < leg.secs {
                return from.lerp(leg.to, remaining / leg.secs);
            }
            remaining -= leg.secs;
            from = leg.to;
        }
        from
    }
}

// ---------------------------------------------------------------------------
// FrameDriver
// ---------------------------------------------------------------------------

/// A fixed-interval frame loop on a simulated clock starting at zero.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    clock: FrameClock,
    now: HostTime,
    interval: Duration,
}

impl FrameDriver {
    /// Creates a driver ticking every `interval_secs`.
    #[must_use]
    pub fn new(interval_secs: f64, config: FrameClockConfig, timebase: Timebase) -> Self {
        Self {
            clock: FrameClock::new(config, timebase),
            now: HostTime(0),
            interval: Duration::from_secs_f64(interval_secs, timebase),
        }
    }

    /// A 60 Hz driver with microsecond ticks and default clamping.
    #[must_use]
    pub fn at_60hz() -> Self {
        Self::new(1.0 / 60.0, FrameClockConfig::DEFAULT, Timebase::MICROS)
    }

    /// Returns the simulated time of the next tick.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Returns the simulated time of the next tick in seconds.
    #[must_use]
    pub fn now_secs(&self) -> f64 {
        self.now.as_secs_f64(self.clock.timebase())
    }

    /// Ticks at the current time, then advances by one interval.
    pub fn step(&mut self, tracer: &mut Tracer<'_>) -> FrameTick {
        let tick = self.clock.tick(self.now);
        tracer.frame(&FrameEvent::from(&tick));
        self.now = self.now + self.interval;
        tick
    }

    /// Simulates a host stall: time jumps by `secs` before the next tick.
    pub fn stall(&mut self, secs: f64) {
        self.now = self.now + Duration::from_secs_f64(secs, self.clock.timebase());
    }
}

// ---------------------------------------------------------------------------
// drive
// ---------------------------------------------------------------------------

/// Plays `script` as pointer input into `ctx`, one sample per frame, for
/// the script's duration.
///
/// Each frame the pointer is sampled at the driver's time (measured from the
/// driver's current time at the call), fed into the context, and then
/// `frame` is called with the new tick. With the `trace-rich` feature, every
/// registered surface's resolved motion is traced after the tick. Returns the
/// number of frames run.
pub fn drive(
    ctx: &mut KineticContext,
    driver: &mut FrameDriver,
    script: &PointerScript,
    tracer: &mut Tracer<'_>,
    mut frame: impl FnMut(&KineticContext, &FrameTick),
) -> u64 {
    let origin = driver.now_secs();
    let mut frames = 0;
    loop {
        let t = driver.now_secs() - origin;
        let now = driver.now();
        let outcome = ctx.on_pointer_move(script.position_at(t), now);
        tracer.sample(&SampleEvent {
            now,
            modality: InputModality::Pointer,
            outcome,
        });
        let tick = driver.step(tracer);
        #[cfg(feature = "trace-rich")]
        for (id, motion) in ctx.resolve_all() {
            tracer.surface(&kinesis_core::trace::SurfaceEvent {
                frame_index: tick.frame_index,
                id,
                motion,
            });
        }
        frame(ctx, &tick);
        frames += 1;
        if t >= script.duration() {
            return frames;
        }
    }
}
