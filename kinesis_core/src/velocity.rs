// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Velocity of the fused signal.
//!
//! [`VelocityTracker`] differentiates successive applied samples over their
//! host timestamps. Reads are stateless: [`velocity_at`](VelocityTracker::velocity_at)
//! reports zero once the last sample is older than the configured staleness
//! window, so a pointer that stopped moving does not keep its last speed.

use kurbo::{Point, Vec2};

use crate::time::{Duration, HostTime, Timebase};

/// Tuning for [`VelocityTracker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityConfig {
    /// Velocity reads later than this after the last sample report zero.
    pub stale_after_secs: f64,
}

impl VelocityConfig {
    /// 30 ms staleness window.
    pub const DEFAULT: Self = Self {
        stale_after_secs: 0.030,
    };
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tracks the instantaneous derivative of the fused signal.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    config: VelocityConfig,
    timebase: Timebase,
    last: Option<(Point, HostTime)>,
    velocity: Vec2,
}

impl VelocityTracker {
    /// Creates a tracker with no samples.
    #[must_use]
    pub fn new(config: VelocityConfig, timebase: Timebase) -> Self {
        Self {
            config,
            timebase,
            last: None,
            velocity: Vec2::ZERO,
        }
    }

    /// Folds in a new position sample.
    ///
    /// A sample whose timestamp does not advance updates the reference
    /// position but keeps the previous velocity.
    pub fn update(&mut self, position: Point, at: HostTime) {
        if let Some((prev, prev_t)) = self.last {
            let dt = (at - prev_t).as_secs_f64(self.timebase);
            if dt > 0.0 {
                self.velocity = (position - prev) / dt;
            }
        }
        self.last = Some((position, at));
    }

    /// Returns the last derivative, ignoring staleness.
    #[inline]
    #[must_use]
    pub fn last_velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Returns the velocity in pixels per second as seen at `now`.
    #[must_use]
    pub fn velocity_at(&self, now: HostTime) -> Vec2 {
        let Some((_, last_t)) = self.last else {
            return Vec2::ZERO;
        };
        let stale = Duration::from_secs_f64(self.config.stale_after_secs, self.timebase);
        if now.saturating_duration_since(last_t) > stale {
            Vec2::ZERO
        } else {
            self.velocity
        }
    }

    /// Returns the speed (velocity magnitude) at `now`.
    #[inline]
    #[must_use]
    pub fn speed_at(&self, now: HostTime) -> f64 {
        self.velocity_at(now).hypot()
    }

    /// Forgets all samples.
    pub fn reset(&mut self) {
        self.last = None;
        self.velocity = Vec2::ZERO;
    }
}

/// Maps a speed onto `[0, 1]` as `min(1, speed / full_speed)`.
///
/// Returns 0 for a non-positive `full_speed`.
#[inline]
#[must_use]
pub fn intensity(speed: f64, full_speed: f64) -> f64 {
    if full_speed <= 0.0 || !speed.is_finite() {
        return 0.0;
    }
    (speed / full_speed).clamp(0.0, 1.0)
}

/// Returns the heading of a velocity in degrees, `atan2(vy, vx)`.
#[inline]
#[must_use]
pub fn heading_degrees(velocity: Vec2) -> f64 {
    libm::atan2(velocity.y, velocity.x).to_degrees()
}
