// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for the geometry registry.
//!
//! The [`GeometryRegistry`](crate::geometry::GeometryRegistry) uses
//! [`understory_dirty`] to record which tracked elements need a fresh
//! bounding-box read. Both channels are local-only: an element's geometry
//! never invalidates another element's geometry, so no dependency edges are
//! ever added.
//!
//! # Channels
//!
//! - [`MEASURE`]: marked by layout-affecting events (registration, scroll,
//!   resize, resize observation) and drained synchronously by the same event
//!   call, so cached rectangles are fresh before the next frame reads them.
//! - [`SETTLE`]: marked on registration and left pending until the host
//!   calls [`settle`](crate::geometry::GeometryRegistry::settle) shortly after
//!   mount, absorbing late layout shifts from fonts and images.
//!
//! # Consumption
//!
//! Frame-time readers never look at dirty state. Only event entry points
//! drain channels, which keeps measurement out of the frame path.

use understory_dirty::Channel;

/// Element geometry must be re-read before the event call returns.
pub const MEASURE: Channel = Channel::new(0);

/// Element was registered and still owes its post-mount settle measurement.
pub const SETTLE: Channel = Channel::new(1);
