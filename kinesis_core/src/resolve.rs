// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relative motion resolution.
//!
//! Maps the fused signal (viewport pixels) onto a tracked surface's cached
//! document rectangle, producing a clamped local position and an "over" flag.
//! The computation is pure; it reads nothing but its arguments.

use kurbo::{Point, Rect, Vec2};

/// Where the fused signal sits relative to one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelativeMotion {
    /// Local position in `[0, 1]²`, clamped.
    pub rel: Point,
    /// Whether the signal is inside the surface's bounds (edges inclusive).
    pub is_over: bool,
}

impl RelativeMotion {
    /// Result for an unknown surface: centred and not over.
    pub const NEUTRAL: Self = Self {
        rel: Point::new(0.5, 0.5),
        is_over: false,
    };

    /// Returns the smoothing target: `rel` while over, the centre otherwise.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Point {
        if self.is_over {
            self.rel
        } else {
            Self::NEUTRAL.rel
        }
    }
}

impl Default for RelativeMotion {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Resolves `signal` against a document-coordinate `rect` under `scroll`.
///
/// A missing rect, or one with non-positive or non-finite extent, yields
/// [`RelativeMotion::NEUTRAL`].
#[must_use]
pub fn resolve(signal: Point, rect: Option<Rect>, scroll: Vec2) -> RelativeMotion {
    let Some(rect) = rect else {
        return RelativeMotion::NEUTRAL;
    };
    let width = rect.width();
    let height = rect.height();
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return RelativeMotion::NEUTRAL;
    }

    let left = rect.x0 - scroll.x;
    let top = rect.y0 - scroll.y;
    let rel_x = ((signal.x - left) / width).clamp(0.0, 1.0);
    let rel_y = ((signal.y - top) / height).clamp(0.0, 1.0);
    let is_over = signal.x >= left
        && signal.x <= left + width
        && signal.y >= top
        && signal.y <= top + height;

    RelativeMotion {
        rel: Point::new(rel_x, rel_y),
        is_over,
    }
}
