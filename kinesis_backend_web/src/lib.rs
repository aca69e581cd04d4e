// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for kinesis.
//!
//! - [`KineticBindings`]: window listeners (pointer, orientation, scroll,
//!   resize) and a `ResizeObserver` feeding a shared
//!   [`KineticContext`](kinesis_core::KineticContext). Dropping the bindings
//!   removes every subscription.
//! - [`DomElement`]: [`ElementHandle`](kinesis_core::host::ElementHandle) for
//!   DOM elements.
//! - [`RafLoop`]: `requestAnimationFrame` loop emitting clamped
//!   [`FrameTick`](kinesis_core::frame::FrameTick)s.
//! - [`probe_capability`], [`initial_permission`] and
//!   [`request_permission`]: startup probes and the gesture-gated orientation
//!   permission request.
//! - [`style`]: writes layer transforms into element styles.

#![no_std]

extern crate alloc;

mod bindings;
mod element;
mod permission;
mod probe;
mod raf;
pub mod style;

pub use bindings::{KEY_ATTRIBUTE, KineticBindings, SharedSink};
pub use element::DomElement;
pub use permission::{initial_permission, request_permission};
pub use probe::{probe_capability, scroll_offset, viewport_size};
pub use raf::RafLoop;

use kinesis_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`, in microsecond
/// ticks.
#[must_use]
pub fn now() -> HostTime {
    ms_to_host_time(raf::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

/// Converts a `DOMHighResTimeStamp` (ms) to microsecond ticks.
pub(crate) fn ms_to_host_time(ms: f64) -> HostTime {
    if !ms.is_finite() || ms <= 0.0 {
        return HostTime(0);
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive finite timestamp; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_microsecond() {
        assert_eq!(timebase().ticks_to_nanos(1), 1000);
    }

    #[test]
    fn timestamps_convert_to_micros() {
        assert_eq!(ms_to_host_time(16.5), HostTime(16_500));
        assert_eq!(ms_to_host_time(-3.0), HostTime(0));
        assert_eq!(ms_to_host_time(f64::NAN), HostTime(0));
    }
}
