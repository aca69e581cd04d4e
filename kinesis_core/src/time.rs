// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic sample timestamps.
//!
//! [`HostTime`] is a point in time as host-native monotonic ticks (the web
//! backend uses microseconds derived from `performance.now()`). [`Timebase`]
//! carries the rational ticks-to-nanoseconds factor, and [`Duration`] is a
//! tick count between two host times.
//!
//! Springs and velocity work in seconds, so the conversions that matter here
//! are [`Duration::as_secs_f64`] and [`Duration::from_secs_f64`].

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as host-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration since `earlier`, or zero if `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Returns this time as seconds since the host's time origin.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self, timebase: Timebase) -> f64 {
        Duration(self.0).as_secs_f64(timebase)
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// Ticks are nanoseconds.
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Ticks are microseconds (the web backend's `performance.now()` scale).
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a timebase.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must be non-zero");
        Self { numer, denom }
    }

    /// Converts ticks to nanoseconds using a `u128` intermediate.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        (ticks as u128 * self.numer as u128 / self.denom as u128) as u64
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::MICROS
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A span of host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Converts to fractional seconds.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self, timebase: Timebase) -> f64 {
        self.0 as f64 * f64::from(timebase.numer) / f64::from(timebase.denom) * 1e-9
    }

    /// Converts fractional seconds to ticks, saturating at zero for negative
    /// or NaN input.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped to be non-negative; sub-tick precision is dropped"
    )]
    pub fn from_secs_f64(secs: f64, timebase: Timebase) -> Self {
        let ticks = secs * 1e9 * f64::from(timebase.denom) / f64::from(timebase.numer);
        if ticks.is_nan() || ticks <= 0.0 {
            Self::ZERO
        } else {
            Self(ticks as u64)
        }
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_timebase_converts_to_seconds() {
        let d = Duration(16_667);
        let secs = d.as_secs_f64(Timebase::MICROS);
        assert!((secs - 0.016_667).abs() < 1e-9, "got {secs}");
    }

    #[test]
    fn seconds_round_trip_through_ticks() {
        let d = Duration::from_secs_f64(0.25, Timebase::MICROS);
        assert_eq!(d, Duration(250_000));
        assert_eq!(Duration::from_secs_f64(1.0, Timebase::NANOS), Duration(1_000_000_000));
    }

    #[test]
    fn negative_seconds_saturate_to_zero() {
        assert_eq!(Duration::from_secs_f64(-1.0, Timebase::MICROS), Duration::ZERO);
        assert_eq!(
            Duration::from_secs_f64(f64::NAN, Timebase::MICROS),
            Duration::ZERO
        );
    }

    #[test]
    fn host_time_subtraction_saturates() {
        let a = HostTime(100);
        let b = HostTime(250);
        assert_eq!(b - a, Duration(150));
        assert_eq!(a - b, Duration::ZERO);
        assert_eq!(a + Duration(50), HostTime(150));
    }

    #[test]
    fn ticks_to_nanos_uses_wide_intermediate() {
        let tb = Timebase::new(2, 2);
        assert_eq!(tb.ticks_to_nanos(u64::MAX), u64::MAX);
        assert_eq!(Timebase::MICROS.ticks_to_nanos(3), 3000);
    }

    #[test]
    #[should_panic(expected = "timebase denominator must be non-zero")]
    fn zero_denominator_panics() {
        let _ = Timebase::new(1, 0);
    }
}
