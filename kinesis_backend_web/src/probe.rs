// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Startup probes and window geometry reads.

use kurbo::{Size, Vec2};
use web_sys::Window;

use kinesis_core::input::PointerCapability;

/// Decides between fine and coarse pointer input via
/// `matchMedia("(pointer: coarse)")`.
///
/// Falls back to [`PointerCapability::Fine`] when the query is unavailable.
#[must_use]
pub fn probe_capability(window: &Window) -> PointerCapability {
    let coarse = window
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    if coarse {
        PointerCapability::Coarse
    } else {
        PointerCapability::Fine
    }
}

/// Reads `innerWidth`/`innerHeight`. Unreadable values are 0.
#[must_use]
pub fn viewport_size(window: &Window) -> Size {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size::new(read(window.inner_width()), read(window.inner_height()))
}

/// Reads `scrollX`/`scrollY`. Unreadable values are 0.
#[must_use]
pub fn scroll_offset(window: &Window) -> Vec2 {
    Vec2::new(
        window.scroll_x().unwrap_or(0.0),
        window.scroll_y().unwrap_or(0.0),
    )
}
