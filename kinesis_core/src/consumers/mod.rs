// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made kinetic consumers.
//!
//! Each consumer owns its spring state and reads the shared
//! [`KineticContext`](crate::KineticContext) by reference once per frame.
//! They are built only from the public pieces of this crate, so they double
//! as worked examples of wiring a custom effect.

mod aura;
mod magnetic;
mod rings;
mod surface;

pub use aura::{AuraConfig, AuraFrame, CursorAura};
pub use magnetic::{Magnetic, MagneticConfig};
pub use rings::{RingAssembly, RingConfig, SpatialNode};
pub use surface::{KineticSurface, SpeedShine, SurfaceConfig, SurfaceFrame};
