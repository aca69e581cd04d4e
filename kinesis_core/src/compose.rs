// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-layer composition.
//!
//! One smoothed local position fans out into any number of layers, each
//! reacting in proportion to its `depth`. Positive depths sit toward the
//! viewer, negative depths are recessed. Nothing here is stored between
//! frames; callers recompute transforms from their own spring state.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::transform::Transform3d;

/// Linear coefficients mapping depth and deviation to motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositionParams {
    /// Degrees of tilt per unit depth at full deviation.
    pub rotation_per_depth: f64,
    /// Pixels of parallax drift per unit depth at full deviation.
    pub translation_per_depth: f64,
}

impl CompositionParams {
    /// Tilt and drift.
    pub const DEFAULT: Self = Self {
        rotation_per_depth: 0.1,
        translation_per_depth: 0.2,
    };

    /// Drift only, for layers inside a surface that already tilts as a whole.
    pub const PARALLAX: Self = Self {
        rotation_per_depth: 0.0,
        translation_per_depth: 0.2,
    };
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Derived per-frame transform for one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTransform {
    /// Tilt about the X axis, degrees.
    pub rotate_x: f64,
    /// Tilt about the Y axis, degrees.
    pub rotate_y: f64,
    /// Planar offset, pixels.
    pub translate: Vec2,
    /// Offset along the view axis, pixels.
    pub translate_z: f64,
    /// Uniform planar scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Specular highlight position in local `[0, 1]²`.
    pub highlight: Point,
}

impl LayerTransform {
    /// No motion, fully opaque, highlight centred.
    pub const IDENTITY: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
        translate: Vec2::ZERO,
        translate_z: 0.0,
        scale: 1.0,
        opacity: 1.0,
        highlight: Point::new(0.5, 0.5),
    };

    /// Multiplies the scale, e.g. by [`Breathing::scale_at`].
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale *= factor;
        self
    }

    /// Applies index-based falloff for assemblies of `total` elements.
    #[must_use]
    pub fn with_falloff(mut self, index: u32, total: u32, opacity: Falloff, scale: Falloff) -> Self {
        self.opacity = opacity.at(index, total).clamp(0.0, 1.0);
        self.scale *= scale.at(index, total);
        self
    }

    /// Converts to a matrix, `T · Ry · Rx · S`.
    #[must_use]
    pub fn to_transform3d(&self) -> Transform3d {
        Transform3d::from_translation(self.translate.x, self.translate.y, self.translate_z)
            * Transform3d::from_rotation_y(self.rotate_y)
            * Transform3d::from_rotation_x(self.rotate_x)
            * Transform3d::from_scale(self.scale, self.scale, 1.0)
    }
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Returns how far `smoothed` sits from the centre, per axis, in `[-1, 1]`.
#[inline]
#[must_use]
pub fn deviation(smoothed: Point) -> Vec2 {
    Vec2::new(
        ((smoothed.x - 0.5) * 2.0).clamp(-1.0, 1.0),
        ((smoothed.y - 0.5) * 2.0).clamp(-1.0, 1.0),
    )
}

/// Derives the transform of a layer at `depth` for a smoothed local position.
///
/// Rotation and translation are linear in both depth and deviation. A
/// pointer toward the right edge turns the surface right (`rotate_y > 0`)
/// and drifts near layers left, away from the pointer.
#[must_use]
pub fn layer_transform(smoothed: Point, depth: f64, params: &CompositionParams) -> LayerTransform {
    let d = deviation(smoothed);
    let tilt = depth * params.rotation_per_depth;
    LayerTransform {
        rotate_x: -d.y * tilt,
        rotate_y: d.x * tilt,
        translate: -d * depth * params.translation_per_depth,
        translate_z: depth,
        highlight: Point::new(smoothed.x.clamp(0.0, 1.0), smoothed.y.clamp(0.0, 1.0)),
        ..LayerTransform::IDENTITY
    }
}

/// Linear falloff over an index range: `base - (index / total) * span`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Falloff {
    /// Value at index 0.
    pub base: f64,
    /// Total decrease across the range.
    pub span: f64,
}

impl Falloff {
    /// Constant 1.
    pub const NONE: Self = Self {
        base: 1.0,
        span: 0.0,
    };

    /// Ring opacity: 0.7 in front, fading by 0.5 toward the back.
    pub const RING_OPACITY: Self = Self {
        base: 0.7,
        span: 0.5,
    };

    /// Evaluates at `index` of `total`. An empty range yields `base`.
    #[must_use]
    pub fn at(&self, index: u32, total: u32) -> f64 {
        if total == 0 {
            return self.base;
        }
        self.base - (f64::from(index) / f64::from(total)) * self.span
    }
}

/// Idle scale oscillation, phase-shifted per instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breathing {
    /// Peak scale deviation.
    pub amplitude: f64,
    /// Time divisor inside the sine, seconds.
    pub period_secs: f64,
    /// Phase offset added per instance index, seconds.
    pub phase_step_secs: f64,
}

impl Breathing {
    /// A barely perceptible pulse.
    pub const SUBTLE: Self = Self {
        amplitude: 0.003,
        period_secs: 4.0,
        phase_step_secs: 0.5,
    };

    /// Returns `1 + sin((t + index * phase_step) / period) * amplitude`.
    #[must_use]
    pub fn scale_at(&self, t_secs: f64, index: u32) -> f64 {
        if self.period_secs <= 0.0 {
            return 1.0;
        }
        let phase = (t_secs + f64::from(index) * self.phase_step_secs) / self.period_secs;
        1.0 + libm::sin(phase) * self.amplitude
    }
}

impl Default for Breathing {
    fn default() -> Self {
        Self::SUBTLE
    }
}

/// Depth layers of one surface, kept in render order.
///
/// Layers are ordered by ascending `|depth|`; layers with equal magnitude
/// keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    depths: Vec<f64>,
}

impl LayerStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack from depths in any order.
    #[must_use]
    pub fn from_depths(depths: &[f64]) -> Self {
        let mut stack = Self::new();
        for &d in depths {
            stack.push(d);
        }
        stack
    }

    /// Inserts a layer. Non-finite depths are stored as 0.
    pub fn push(&mut self, depth: f64) {
        let depth = if depth.is_finite() { depth } else { 0.0 };
        let at = self.depths.partition_point(|d| d.abs() <= depth.abs());
        self.depths.insert(at, depth);
    }

    /// Returns the depths in render order.
    #[must_use]
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Returns whether the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Derives every layer's transform, in render order.
    pub fn compose<'a>(
        &'a self,
        smoothed: Point,
        params: &'a CompositionParams,
    ) -> impl Iterator<Item = LayerTransform> + 'a {
        self.depths
            .iter()
            .map(move |&depth| layer_transform(smoothed, depth, params))
    }
}
