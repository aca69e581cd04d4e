// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input fusion, geometry registry, spring smoothing and depth-layer
//! composition for kinetic surfaces.
//!
//! `kinesis_core` turns one pointer-like input signal into per-surface,
//! depth-scaled transforms. It is `no_std` compatible (with `alloc`) and has
//! no opinion on what is drawn: hosts feed it events and read transforms back.
//!
//! # Architecture
//!
//! Events and frames travel two separate paths through a [`KineticContext`]:
//!
//! ```text
//!   pointer-move / orientation ──► InputFusion ──► FusedSignal
//!                                       │               │
//!                                       ▼               │
//!                                VelocityTracker        │
//!                                                       ▼
//!   scroll / resize / observer ──► GeometryRegistry ──► resolve() ──► RelativeMotion
//!                                                                          │
//!                 ┌────────────────────────────────────────────────────────┘
//!                 ▼
//!   FrameTick ──► Spring2d::step() ──► LayerStack::compose() ──► LayerTransform
//! ```
//!
//! Event callbacks are the only place geometry is measured; the frame path
//! only reads cached rectangles and advances springs.
//!
//! **[`input`]**: Fuses pointer and orientation-tilt input into one signal.
//!
//! **[`velocity`]**: Derivative of the fused signal.
//!
//! **[`geometry`]**: Reflow-avoiding registry of tracked element rectangles
//! in document coordinates, invalidated through `understory_dirty` channels
//! (see [`dirty`]).
//!
//! **[`resolve`]**: Pure mapping from signal + rectangle to normalized local
//! position and an "is over" flag.
//!
//! **[`spring`]**: Closed-form damped-oscillator smoothing.
//!
//! **[`compose`]**: Depth-proportional tilt/parallax transforms, falloff and
//! idle breathing.
//!
//! **[`consumers`]**: Ready-made surfaces built from the pieces above: a
//! tilting card, a magnetic button, a cursor aura and a ring assembly.
//!
//! **[`frame`]**: Variable-timestep frame clock for host render loops.
//!
//! **[`host`]**: The [`ElementHandle`](host::ElementHandle) trait that
//! platform backends implement for measurable elements.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-surface
//!   motion events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod compose;
pub mod consumers;
pub mod context;
pub mod dirty;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod input;
pub mod resolve;
pub mod spring;
pub mod time;
pub mod trace;
pub mod transform;
pub mod velocity;

pub use context::{KineticConfig, KineticContext};
