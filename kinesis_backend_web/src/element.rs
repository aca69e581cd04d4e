// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element handles.

use kurbo::Rect;
use web_sys::Element;

use kinesis_core::host::ElementHandle;

/// A measurable DOM element.
///
/// Measurement calls `getBoundingClientRect()`, which forces layout; the
/// registry only does so from event callbacks.
#[derive(Clone, PartialEq, Eq)]
pub struct DomElement {
    element: Element,
}

impl DomElement {
    /// Wraps `element`.
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Returns the wrapped element.
    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl ElementHandle for DomElement {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.element.is_connected() {
            return None;
        }
        let r = self.element.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
    }
}

impl core::fmt::Debug for DomElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomElement")
            .field("tag", &self.element.tag_name())
            .finish()
    }
}
