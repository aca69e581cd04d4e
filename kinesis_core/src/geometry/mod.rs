// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reflow-avoiding geometry registry.
//!
//! Frame-time code must never force a layout read. The registry caches each
//! tracked element's rectangle and re-measures only on the events that can
//! move it (registration, scroll, viewport resize, element-resize
//! observation, and one deferred settle pass).

mod id;
mod registry;

pub use id::{INVALID, SurfaceId, SurfaceKey};
pub use registry::{GeometryRegistry, MeasureCause, MeasureReport, Registered, Registration};
