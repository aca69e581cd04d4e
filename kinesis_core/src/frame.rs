// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variable-timestep frame clock.
//!
//! Host render loops hand their callback timestamps to a [`FrameClock`],
//! which turns them into [`FrameTick`]s. The tick carries the step that
//! springs should advance by, clamped so a throttled or backgrounded host
//! does not produce one enormous step on resume.

use crate::time::{Duration, HostTime, Timebase};

/// Tuning for [`FrameClock`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClockConfig {
    /// Largest step a single tick may report, in seconds.
    pub max_delta_secs: f64,
}

impl FrameClockConfig {
    /// 50 ms, i.e. three frames at 60 Hz.
    pub const DEFAULT: Self = Self {
        max_delta_secs: 0.050,
    };
}

impl Default for FrameClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One frame of the host loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
    /// Host time of the callback.
    pub now: HostTime,
    /// Clamped step since the previous tick (zero on the first tick).
    pub delta: Duration,
    /// `delta` in seconds.
    pub dt: f64,
    /// Seconds since the clock's first tick, excluding clamped-away time.
    pub elapsed: f64,
}

/// Converts host timestamps into [`FrameTick`]s.
#[derive(Clone, Debug)]
pub struct FrameClock {
    config: FrameClockConfig,
    timebase: Timebase,
    last: Option<HostTime>,
    next_index: u64,
    elapsed: f64,
}

impl FrameClock {
    /// Creates a clock that has not ticked yet.
    #[must_use]
    pub fn new(config: FrameClockConfig, timebase: Timebase) -> Self {
        Self {
            config,
            timebase,
            last: None,
            next_index: 0,
            elapsed: 0.0,
        }
    }

    /// Returns the timebase used to interpret host times.
    #[must_use]
    pub fn timebase(&self) -> Timebase {
        self.timebase
    }

    /// Produces the tick for a callback at `now`.
    ///
    /// A timestamp earlier than the previous one yields a zero step.
    pub fn tick(&mut self, now: HostTime) -> FrameTick {
        let max = Duration::from_secs_f64(self.config.max_delta_secs, self.timebase);
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last).min(max),
            None => Duration::ZERO,
        };
        if self.last.is_none_or(|last| now >= last) {
            self.last = Some(now);
        }
        let dt = delta.as_secs_f64(self.timebase);
        self.elapsed += dt;

        let tick = FrameTick {
            frame_index: self.next_index,
            now,
            delta,
            dt,
            elapsed: self.elapsed,
        };
        self.next_index += 1;
        tick
    }

    /// Forgets the previous timestamp so the next tick has a zero step.
    ///
    /// Frame numbering and elapsed time continue.
    pub fn pause(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FrameClock {
        FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS)
    }

    #[test]
    fn first_tick_has_zero_step() {
        let mut c = clock();
        let t = c.tick(HostTime(1_000_000));
        assert_eq!(t.frame_index, 0);
        assert_eq!(t.delta, Duration::ZERO);
        assert_eq!(t.dt, 0.0);
    }

    #[test]
    fn steps_follow_timestamps() {
        let mut c = clock();
        let _ = c.tick(HostTime(0));
        let t = c.tick(HostTime(16_667));
        assert_eq!(t.frame_index, 1);
        assert_eq!(t.delta, Duration(16_667));
        assert!((t.elapsed - 0.016_667).abs() < 1e-9);
    }

    #[test]
    fn long_gap_is_clamped() {
        let mut c = clock();
        let _ = c.tick(HostTime(0));
        let t = c.tick(HostTime(5_000_000));
        assert_eq!(t.delta, Duration(50_000));
        assert!((t.dt - 0.05).abs() < 1e-12);
    }

    #[test]
    fn backwards_time_is_zero_step() {
        let mut c = clock();
        let _ = c.tick(HostTime(100_000));
        assert_eq!(c.tick(HostTime(90_000)).delta, Duration::ZERO);
        assert_eq!(c.tick(HostTime(110_000)).delta, Duration(10_000));
    }

    #[test]
    fn pause_resets_step_but_not_numbering() {
        let mut c = clock();
        let _ = c.tick(HostTime(0));
        let _ = c.tick(HostTime(10_000));
        c.pause();
        let t = c.tick(HostTime(40_000));
        assert_eq!(t.frame_index, 2);
        assert_eq!(t.delta, Duration::ZERO);
    }
}
