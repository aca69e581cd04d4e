// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilting card with parallax layers, a moving highlight and an optional
//! speed-reactive shine.

use kurbo::Point;

use crate::KineticContext;
use crate::compose::{Breathing, CompositionParams, LayerStack, LayerTransform, deviation};
use crate::frame::FrameTick;
use crate::geometry::SurfaceKey;
use crate::resolve::RelativeMotion;
use crate::spring::{Spring, Spring2d, SpringConfig};
use crate::velocity::intensity;

/// A sheen that brightens while the input moves fast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedShine {
    /// Smoothing of the signal speed.
    pub spring: SpringConfig,
    /// Smoothed speed at which the shine is brightest, pixels per second.
    pub full_speed: f64,
    /// Opacity at `full_speed` and above.
    pub max_opacity: f64,
}

impl SpeedShine {
    /// Reaches 0.3 opacity at 2000 px/s.
    pub const DEFAULT: Self = Self {
        spring: SpringConfig::speed(),
        full_speed: 2000.0,
        max_opacity: 0.3,
    };

    /// Opacity for a smoothed speed.
    #[must_use]
    pub fn opacity(&self, smoothed_speed: f64) -> f64 {
        intensity(smoothed_speed, self.full_speed) * self.max_opacity
    }
}

impl Default for SpeedShine {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tuning for a [`KineticSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Smoothing of the local position.
    pub spring: SpringConfig,
    /// Tilt at full deviation, degrees.
    pub tilt_strength: f64,
    /// Motion of the inner layers.
    pub layers: CompositionParams,
    /// Idle pulse, if any.
    pub breathing: Option<Breathing>,
    /// Speed-reactive shine, if any.
    pub shine: Option<SpeedShine>,
}

impl SurfaceConfig {
    /// 10° card tilt, parallax-only layers, no breathing.
    pub const DEFAULT: Self = Self {
        spring: SpringConfig::card(),
        tilt_strength: 10.0,
        layers: CompositionParams::PARALLAX,
        breathing: None,
        shine: None,
    };

    /// Returns a copy with idle breathing enabled.
    #[must_use]
    pub const fn with_breathing(mut self, breathing: Breathing) -> Self {
        self.breathing = Some(breathing);
        self
    }

    /// Returns a copy with a speed-reactive shine.
    #[must_use]
    pub const fn with_shine(mut self, shine: SpeedShine) -> Self {
        self.shine = Some(shine);
        self
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Output of one [`KineticSurface::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceFrame {
    /// Resolver output for this frame.
    pub motion: RelativeMotion,
    /// The card's own transform (tilt and breathing scale).
    pub transform: LayerTransform,
    /// Highlight opacity: 1 while the input is over the card.
    pub highlight_opacity: f64,
    /// Shine opacity from the smoothed signal speed; 0 without a shine.
    pub shine_opacity: f64,
}

/// A card that tilts toward the input and carries depth layers.
#[derive(Clone, Debug)]
pub struct KineticSurface {
    key: SurfaceKey,
    index: u32,
    config: SurfaceConfig,
    spring: Spring2d,
    speed: Spring,
    layers: LayerStack,
}

impl KineticSurface {
    /// Creates a surface reading the registry entry `key`.
    ///
    /// `index` offsets the breathing phase between sibling cards.
    #[must_use]
    pub fn new(key: SurfaceKey, index: u32, config: SurfaceConfig, layers: LayerStack) -> Self {
        Self {
            key,
            index,
            spring: Spring2d::new(config.spring, RelativeMotion::NEUTRAL.rel),
            speed: Spring::new(
                config.shine.map_or(SpringConfig::speed(), |s| s.spring),
                0.0,
            ),
            config,
            layers,
        }
    }

    /// Returns the registry key.
    #[must_use]
    pub fn key(&self) -> &SurfaceKey {
        &self.key
    }

    /// Returns the smoothed local position.
    #[must_use]
    pub fn smoothed(&self) -> Point {
        self.spring.position()
    }

    /// Returns whether the card has stopped moving.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.spring.is_at_rest()
    }

    /// Advances the card by one frame.
    pub fn update(&mut self, ctx: &KineticContext, tick: &FrameTick) -> SurfaceFrame {
        let motion = ctx.resolve_relative_motion(self.key.as_str());
        self.spring.set_target(motion.target());
        let smoothed = self.spring.step(tick.dt);

        let d = deviation(smoothed);
        let strength = self.config.tilt_strength;
        let mut transform = LayerTransform {
            rotate_x: -d.y * strength,
            rotate_y: d.x * strength,
            highlight: smoothed,
            ..LayerTransform::IDENTITY
        };
        if let Some(breathing) = self.config.breathing
            && !motion.is_over
        {
            transform = transform.scaled(breathing.scale_at(tick.elapsed, self.index));
        }

        let shine_opacity = match self.config.shine {
            Some(shine) => {
                self.speed.set_target(ctx.speed(tick.now));
                shine.opacity(self.speed.step(tick.dt))
            }
            None => 0.0,
        };

        SurfaceFrame {
            motion,
            transform,
            highlight_opacity: if motion.is_over { 1.0 } else { 0.0 },
            shine_opacity,
        }
    }

    /// Derives the inner layers from the current smoothed position, in
    /// render order.
    pub fn layers(&self) -> impl Iterator<Item = LayerTransform> + '_ {
        self.layers.compose(self.spring.position(), &self.config.layers)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;

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

    fn setup() -> (KineticContext, Rc<Fixed>, KineticSurface) {
        let mut ctx = KineticContext::new(KineticConfig::desktop(), Size::new(1000.0, 800.0));
        let el = Rc::new(Fixed(Rect::new(100.0, 100.0, 300.0, 300.0)));
        let _ = ctx.register_surface("card", &el);
        let surface = KineticSurface::new(
            SurfaceKey::new("card"),
            0,
            SurfaceConfig::DEFAULT,
            LayerStack::from_depths(&[20.0, 10.0, 5.0]),
        );
        (ctx, el, surface)
    }

    fn run(ctx: &KineticContext, surface: &mut KineticSurface, frames: u64) -> SurfaceFrame {
        let mut clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);
        let mut last = None;
        for i in 0..frames {
            let tick = clock.tick(HostTime(i * 16_667));
            last = Some(surface.update(ctx, &tick));
        }
        last.unwrap_or_else(|| surface.update(ctx, &clock.tick(HostTime(0))))
    }

    #[test]
    fn tilts_toward_pointer() {
        let (mut ctx, _el, mut surface) = setup();
        let _ = ctx.on_pointer_move(Point::new(300.0, 200.0), HostTime(0));
        let frame = run(&ctx, &mut surface, 180);
        assert!(frame.motion.is_over);
        assert!((frame.transform.rotate_y - 10.0).abs() < 0.05);
        assert!(frame.transform.rotate_x.abs() < 0.05);
        assert_eq!(frame.highlight_opacity, 1.0);
    }

    #[test]
    fn layers_are_in_render_order() {
        let (mut ctx, _el, mut surface) = setup();
        let _ = ctx.on_pointer_move(Point::new(100.0, 100.0), HostTime(0));
        let _ = run(&ctx, &mut surface, 180);
        let layers: Vec<_> = surface.layers().collect();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].translate_z, 5.0);
        assert_eq!(layers[2].translate_z, 20.0);
        // Top-left input: near layers drift right and down.
        assert!(layers[2].translate.x > layers[0].translate.x);
        assert_eq!(layers[2].rotate_x, 0.0);
    }

    #[test]
    fn shine_follows_smoothed_speed() {
        let (mut ctx, _el, _) = setup();
        let mut surface = KineticSurface::new(
            SurfaceKey::new("card"),
            0,
            SurfaceConfig::DEFAULT.with_shine(SpeedShine::DEFAULT),
            LayerStack::new(),
        );
        let mut clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);

        // A fast swipe keeps feeding 6000 px/s for half a second.
        let mut peak: f64 = 0.0;
        for i in 0..30_u32 {
            let t = HostTime(u64::from(i) * 16_667);
            let _ = ctx.on_pointer_move(Point::new(100.0 * f64::from(i), 200.0), t);
            let frame = surface.update(&ctx, &clock.tick(t));
            assert!(frame.shine_opacity <= 0.3);
            peak = peak.max(frame.shine_opacity);
        }
        assert!(peak > 0.29, "peak {peak}");

        // Still pointer: the shine fades out.
        let mut last = 1.0;
        for i in 30..150_u64 {
            last = surface.update(&ctx, &clock.tick(HostTime(i * 16_667))).shine_opacity;
        }
        assert!(last < 0.01, "last {last}");
    }

    #[test]
    fn shine_is_off_by_default() {
        let (mut ctx, _el, mut surface) = setup();
        let mut clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);
        let _ = ctx.on_pointer_move(Point::new(0.0, 0.0), HostTime(0));
        let _ = ctx.on_pointer_move(Point::new(500.0, 0.0), HostTime(16_667));
        let frame = surface.update(&ctx, &clock.tick(HostTime(16_667)));
        assert_eq!(frame.shine_opacity, 0.0);
        assert_eq!(SpeedShine::DEFAULT.opacity(1000.0), 0.15);
    }

    #[test]
    fn idle_card_breathes() {
        let (ctx, _el, _) = setup();
        let mut surface = KineticSurface::new(
            SurfaceKey::new("card"),
            3,
            SurfaceConfig::DEFAULT.with_breathing(Breathing::SUBTLE),
            LayerStack::new(),
        );
        let frame = run(&ctx, &mut surface, 10);
        assert!(!frame.motion.is_over);
        assert_ne!(frame.transform.scale, 1.0);
        assert!((frame.transform.scale - 1.0).abs() <= 0.003);
        assert_eq!(frame.highlight_opacity, 0.0);
    }
}
