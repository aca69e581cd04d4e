// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buttons that lean toward a nearby pointer.

use kurbo::{Point, Vec2};

use crate::KineticContext;
use crate::frame::FrameTick;
use crate::geometry::SurfaceKey;
use crate::spring::{Spring2d, SpringConfig};

/// Tuning for [`Magnetic`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticConfig {
    /// Attraction range from the element centre, pixels.
    pub radius: f64,
    /// Fraction of the pointer offset applied at the centre.
    pub strength: f64,
    /// Smoothing of the offset.
    pub spring: SpringConfig,
}

impl MagneticConfig {
    /// 180 px radius, 0.35 strength.
    pub const DEFAULT: Self = Self {
        radius: 180.0,
        strength: 0.35,
        spring: SpringConfig::button(),
    };

    /// Returns the raw (unsmoothed) offset for a pointer `delta` from the
    /// element centre.
    #[must_use]
    pub fn pull(&self, delta: Vec2) -> Vec2 {
        let distance = delta.hypot();
        if !distance.is_finite() || self.radius <= 0.0 || distance >= self.radius {
            return Vec2::ZERO;
        }
        delta * self.strength * (1.0 - distance / self.radius)
    }
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Smoothed magnetic offset for one registered element.
#[derive(Clone, Debug)]
pub struct Magnetic {
    key: SurfaceKey,
    config: MagneticConfig,
    spring: Spring2d,
}

impl Magnetic {
    /// Creates a magnet for the registry entry `key`, at rest.
    #[must_use]
    pub fn new(key: SurfaceKey, config: MagneticConfig) -> Self {
        Self {
            key,
            spring: Spring2d::new(config.spring, Point::ZERO),
            config,
        }
    }

    /// Returns the registry key.
    #[must_use]
    pub fn key(&self) -> &SurfaceKey {
        &self.key
    }

    /// Advances by one frame and returns the offset to apply, in pixels.
    ///
    /// Unknown geometry pulls toward zero.
    pub fn update(&mut self, ctx: &KineticContext, tick: &FrameTick) -> Vec2 {
        let registry = ctx.registry();
        let target = match registry.rect(self.key.as_str()) {
            Some(rect) => {
                let centre = rect.center() - registry.scroll();
                self.config.pull(ctx.fused_position() - centre)
            }
            None => Vec2::ZERO,
        };
        self.spring.set_target(target.to_point());
        self.spring.step(tick.dt).to_vec2()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use kurbo::{Rect, Size};

    use super::*;
    use crate::KineticConfig;
    use crate::frame::{FrameClock, FrameClockConfig};
    use crate::host::ElementHandle;
    use crate::time::{HostTime, Timebase};

    struct Fixed(Rect);

    impl ElementHandle for Fixed {
        fn bounding_rect(&self) -> Option<Rect> {
            Some(self.0)
        }
    }

    #[test]
    fn pull_fades_with_distance() {
        let c = MagneticConfig::DEFAULT;
        assert_eq!(c.pull(Vec2::ZERO), Vec2::ZERO);
        let near = c.pull(Vec2::new(90.0, 0.0));
        assert!((near.x - 90.0 * 0.35 * 0.5).abs() < 1e-12);
        assert_eq!(c.pull(Vec2::new(180.0, 0.0)), Vec2::ZERO);
        assert_eq!(c.pull(Vec2::new(0.0, -500.0)), Vec2::ZERO);
    }

    #[test]
    fn leans_toward_pointer_then_returns() {
        let mut ctx = KineticContext::new(KineticConfig::desktop(), Size::new(1000.0, 800.0));
        let el = Rc::new(Fixed(Rect::new(400.0, 400.0, 500.0, 440.0)));
        let _ = ctx.register_surface("cta", &el);
        let mut magnet = Magnetic::new(SurfaceKey::new("cta"), MagneticConfig::DEFAULT);
        let mut clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);

        // 90 px right of the centre (450, 420).
        let _ = ctx.on_pointer_move(Point::new(540.0, 420.0), HostTime(0));
        let mut offset = Vec2::ZERO;
        for i in 0..120 {
            offset = magnet.update(&ctx, &clock.tick(HostTime(i * 16_667)));
        }
        assert!((offset.x - 15.75).abs() < 0.05, "offset {offset:?}");
        assert!(offset.y.abs() < 1e-9);

        let _ = ctx.on_pointer_move(Point::new(900.0, 100.0), HostTime(2_000_000));
        for i in 120..300 {
            offset = magnet.update(&ctx, &clock.tick(HostTime(i * 16_667)));
        }
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn unknown_geometry_is_still() {
        let ctx = KineticContext::new(KineticConfig::desktop(), Size::new(1000.0, 800.0));
        let mut magnet = Magnetic::new(SurfaceKey::new("missing"), MagneticConfig::DEFAULT);
        let mut clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);
        let _ = clock.tick(HostTime(0));
        assert_eq!(magnet.update(&ctx, &clock.tick(HostTime(16_667))), Vec2::ZERO);
    }
}
