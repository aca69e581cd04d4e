// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked-surface identity types.

use alloc::rc::Rc;
use core::fmt;

/// Sentinel value indicating "no slot" in index fields.
pub const INVALID: u32 = u32::MAX;

/// An opaque, process-unique key naming a tracked surface.
///
/// Keys are chosen by the host (typically one per mounted component) and may
/// be registered again on every re-render. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceKey(Rc<str>);

impl SurfaceKey {
    /// Creates a key from a string.
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(Rc::from(key))
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl core::borrow::Borrow<str> for SurfaceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceKey({:?})", &*self.0)
    }
}

impl fmt::Display for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A handle to a slot in a [`GeometryRegistry`](super::GeometryRegistry).
///
/// Contains both a slot index and a generation counter so that a handle kept
/// past [`unregister`](super::GeometryRegistry::unregister) resolves as
/// unknown instead of reading a reused slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SurfaceId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({}@gen{})", self.idx, self.generation)
    }
}
