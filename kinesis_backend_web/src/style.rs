// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing composed transforms into element styles.
//!
//! Only `transform`, `opacity` and two custom properties are touched, so
//! frame-time writes never invalidate layout.

use alloc::format;
use alloc::string::String;
use core::fmt::Write as _;

use kurbo::Point;
use web_sys::HtmlElement;

use kinesis_core::compose::LayerTransform;
use kinesis_core::transform::Transform3d;

/// Custom property holding the highlight's horizontal position.
pub const HIGHLIGHT_X: &str = "--kinesis-highlight-x";
/// Custom property holding the highlight's vertical position.
pub const HIGHLIGHT_Y: &str = "--kinesis-highlight-y";

/// Formats a transform as a CSS `matrix3d(...)` value.
#[must_use]
pub fn matrix3d(t: &Transform3d) -> String {
    let mut css = String::from("matrix3d(");
    for (i, v) in t.to_array().iter().enumerate() {
        if i > 0 {
            css.push(',');
        }
        let _ = write!(css, "{v}");
    }
    css.push(')');
    css
}

/// Sets `transform` to `t`.
pub fn apply_transform(el: &HtmlElement, t: &Transform3d) {
    let _ = el.style().set_property("transform", &matrix3d(t));
}

/// Sets `transform` and `opacity` from a composed layer.
pub fn apply_layer(el: &HtmlElement, layer: &LayerTransform) {
    apply_transform(el, &layer.to_transform3d());
    let _ = el
        .style()
        .set_property("opacity", &format!("{}", layer.opacity));
}

/// Publishes the highlight position (as percentages) and its opacity.
///
/// Stylesheets read the position through [`HIGHLIGHT_X`] and
/// [`HIGHLIGHT_Y`], e.g. in a `radial-gradient`.
pub fn apply_highlight(el: &HtmlElement, highlight: Point, opacity: f64) {
    let s = el.style();
    let _ = s.set_property(HIGHLIGHT_X, &format!("{}%", highlight.x * 100.0));
    let _ = s.set_property(HIGHLIGHT_Y, &format!("{}%", highlight.y * 100.0));
    let _ = s.set_property("opacity", &format!("{opacity}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix3d_lists_columns() {
        let css = matrix3d(&Transform3d::from_translation(3.0, 4.0, -5.0));
        assert_eq!(css, "matrix3d(1,0,0,0,0,1,0,0,0,0,1,0,3,4,-5,1)");
    }
}
