// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! Kinesis splits platform-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Event source**: Subscribes to pointer-move, device-orientation,
//!   scroll, resize and element-resize notifications and forwards them to the
//!   matching [`KineticContext`] entry point. Setup and teardown differ
//!   fundamentally across platforms, so this is not abstracted by a trait.
//!
//! - **Capability probe**: Decides between fine and coarse pointer input once
//!   at startup ([`PointerCapability`]).
//!
//! - **Element handles**: Implements [`ElementHandle`] for whatever the
//!   platform uses to represent a measurable element (a DOM `Element`, a
//!   native view, a test double).
//!
//! - **Frame source**: Produces [`FrameTick`] values through a
//!   [`FrameClock`] from the platform's animation callback.
//!
//! # Crate boundaries
//!
//! `kinesis_core` owns the data model, derivations and this contract module.
//! Backend crates depend on `kinesis_core` and provide platform glue.
//! Application code depends on both and wires them together.
//!
//! [`KineticContext`]: crate::KineticContext
//! [`PointerCapability`]: crate::input::PointerCapability
//! [`FrameTick`]: crate::frame::FrameTick
//! [`FrameClock`]: crate::frame::FrameClock

use kurbo::Rect;

/// A host element whose bounding box can be measured.
///
/// The [`GeometryRegistry`](crate::geometry::GeometryRegistry) only holds
/// weak references to handles, so dropping the last strong reference
/// unregisters the element at the next measurement pass.
///
/// # Measurement pseudocode
///
/// ```rust,ignore
/// impl ElementHandle for DomElement {
///     fn bounding_rect(&self) -> Option<Rect> {
///         if !self.0.is_connected() {
///             return None;
///         }
///         let r = self.0.get_bounding_client_rect();
///         Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
///     }
/// }
/// ```
pub trait ElementHandle {
    /// Reads the element's current bounding box in viewport coordinates.
    ///
    /// This is the layout-synchronizing read the registry exists to avoid
    /// during frames; it is only called from event entry points. Returns
    /// `None` when the element is detached.
    fn bounding_rect(&self) -> Option<Rect>;
}
