// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor aura that trails the signal and stretches with speed.

use kurbo::Point;

use crate::KineticContext;
use crate::frame::FrameTick;
use crate::spring::{Spring2d, SpringConfig};
use crate::transform::Transform3d;
use crate::velocity::{heading_degrees, intensity};

/// Tuning for [`CursorAura`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuraConfig {
    /// Follow smoothing.
    pub spring: SpringConfig,
    /// Speed (px/s) at which deformation saturates.
    pub full_speed: f64,
    /// Scale along the heading at full speed.
    pub max_stretch: f64,
    /// Scale across the heading at full speed.
    pub min_squash: f64,
}

impl AuraConfig {
    /// Saturates at 3000 px/s with 1.8× stretch and 0.6× squash.
    pub const DEFAULT: Self = Self {
        spring: SpringConfig::cursor(),
        full_speed: 3000.0,
        max_stretch: 1.8,
        min_squash: 0.6,
    };
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Output of one [`CursorAura::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuraFrame {
    /// Smoothed position, viewport pixels.
    pub position: Point,
    /// Scale along the direction of travel.
    pub stretch: f64,
    /// Scale across the direction of travel.
    pub squash: f64,
    /// Direction of travel, degrees.
    pub rotation: f64,
}

impl AuraFrame {
    /// Converts to a matrix: translate, rotate to heading, then deform.
    #[must_use]
    pub fn to_transform3d(&self) -> Transform3d {
        Transform3d::from_translation(self.position.x, self.position.y, 0.0)
            * Transform3d::from_rotation_z(self.rotation)
            * Transform3d::from_scale(self.stretch, self.squash, 1.0)
    }
}

/// A blob that follows the fused signal.
#[derive(Clone, Debug)]
pub struct CursorAura {
    config: AuraConfig,
    spring: Spring2d,
    rotation: f64,
}

impl CursorAura {
    /// Creates an aura resting at `initial`.
    #[must_use]
    pub fn new(config: AuraConfig, initial: Point) -> Self {
        Self {
            spring: Spring2d::new(config.spring, initial),
            config,
            rotation: 0.0,
        }
    }

    /// Advances by one frame.
    ///
    /// At rest the aura keeps its last heading instead of snapping to 0°.
    pub fn update(&mut self, ctx: &KineticContext, tick: &FrameTick) -> AuraFrame {
        self.spring.set_target(ctx.fused_position());
        let position = self.spring.step(tick.dt);

        let velocity = ctx.velocity(tick.now);
        let k = intensity(velocity.hypot(), self.config.full_speed);
        if k > 0.0 {
            self.rotation = heading_degrees(velocity);
        }
        AuraFrame {
            position,
            stretch: 1.0 + (self.config.max_stretch - 1.0) * k,
            squash: 1.0 + (self.config.min_squash - 1.0) * k,
            rotation: self.rotation,
        }
    }
}
