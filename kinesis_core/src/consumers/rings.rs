// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orbital ring assembly: concentric rings receding in depth, each with its
//! own spring so outer rings lag behind inner ones.
//!
//! Around the rings sit three unsmoothed planes that follow the resolved
//! target directly: a central core in front, a perspective grid behind and
//! a field of [`SpatialNode`]s whose drift grows with their depth. A speed
//! telemetry level in `[0, 100]` is derived from the signal velocity.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::KineticContext;
use crate::compose::{Falloff, LayerTransform, deviation};
use crate::frame::FrameTick;
use crate::geometry::SurfaceKey;
use crate::input::PointerCapability;
use crate::resolve::RelativeMotion;
use crate::spring::{Spring2d, SpringConfig};
use crate::velocity::intensity;

/// Tuning for a [`RingAssembly`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingConfig {
    /// Number of rings.
    pub count: u32,
    /// Depth between consecutive rings, pixels.
    pub step_depth: f64,
    /// Diameter of ring 0, pixels.
    pub base_size: f64,
    /// Diameter added per ring, pixels.
    pub size_step: f64,
    /// Horizontal drift per ring index at full deviation, pixels.
    pub drift: f64,
    /// Vertical drift as a fraction of horizontal drift.
    pub drift_y_ratio: f64,
    /// Wobble amplitude of ring 0, pixels.
    pub wobble_base: f64,
    /// Wobble amplitude added per ring, pixels.
    pub wobble_step: f64,
    /// Whole-assembly tilt at full deviation, degrees.
    pub tilt: f64,
    /// Opacity by ring index.
    pub opacity: Falloff,
    /// Scale by ring index.
    pub scale: Falloff,
    /// Offset of the central core at full deviation, pixels.
    pub core_offset: Vec2,
    /// Depth of the central core, pixels. Positive is toward the viewer.
    pub core_depth: f64,
    /// Tilt of the background grid at full deviation, degrees.
    pub grid_tilt: f64,
    /// Depth of the background grid, pixels.
    pub grid_depth: f64,
    /// Opacity of the background grid.
    pub grid_opacity: f64,
    /// A node at depth `z` drifts `±z / node_divisor` pixels per axis.
    pub node_divisor: Vec2,
    /// Speed at which telemetry reaches 100, pixels per second.
    pub telemetry_full_speed: f64,
}

impl RingConfig {
    /// 26 rings, 16 px apart.
    pub const DESKTOP: Self = Self {
        count: 26,
        step_depth: 16.0,
        base_size: 120.0,
        size_step: 14.0,
        drift: 13.0,
        drift_y_ratio: 0.4,
        wobble_base: 1.95,
        wobble_step: 0.65,
        tilt: 32.5,
        opacity: Falloff::RING_OPACITY,
        scale: Falloff::NONE,
        core_offset: Vec2::new(26.0, 19.5),
        core_depth: 120.0,
        grid_tilt: 7.8,
        grid_depth: -150.0,
        grid_opacity: 0.25,
        node_divisor: Vec2::new(6.2, 9.2),
        telemetry_full_speed: 4000.0,
    };

    /// 14 smaller rings, 8 px apart.
    pub const TOUCH: Self = Self {
        count: 14,
        step_depth: 8.0,
        base_size: 80.0,
        size_step: 10.0,
        core_depth: 40.0,
        ..Self::DESKTOP
    };

    /// Picks [`DESKTOP`](Self::DESKTOP) or [`TOUCH`](Self::TOUCH).
    #[must_use]
    pub const fn for_capability(capability: PointerCapability) -> Self {
        match capability {
            PointerCapability::Fine => Self::DESKTOP,
            PointerCapability::Coarse => Self::TOUCH,
        }
    }

    /// Diameter of ring `index`, pixels.
    #[must_use]
    pub fn diameter(&self, index: u32) -> f64 {
        self.base_size + f64::from(index) * self.size_step
    }
}

/// A point of light placed somewhere behind the rings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialNode {
    /// Placement in the container, local `[0, 1]²`.
    pub anchor: Point,
    /// Depth, pixels. Negative is behind the rings.
    pub depth: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Planar scale.
    pub scale: f64,
}

/// Lowest and highest telemetry bar, pixels.
const TELEMETRY_BAR: (f64, f64) = (2.0, 40.0);

/// A stack of rings around one registered surface.
#[derive(Clone, Debug)]
pub struct RingAssembly {
    key: SurfaceKey,
    config: RingConfig,
    rings: Vec<Spring2d>,
    /// Smoothed `(rotate_x, rotate_y)` of the whole assembly, degrees.
    tilt: Spring2d,
    nodes: Vec<SpatialNode>,
    /// Unsmoothed resolver target of the last update.
    target: Point,
    telemetry: f64,
    elapsed: f64,
}

impl RingAssembly {
    /// Creates an assembly for the registry entry `key`, centred and still.
    #[must_use]
    pub fn new(key: SurfaceKey, config: RingConfig) -> Self {
        let centre = RelativeMotion::NEUTRAL.rel;
        Self {
            key,
            rings: (0..config.count)
                .map(|i| Spring2d::new(SpringConfig::ring(i), centre))
                .collect(),
            tilt: Spring2d::new(SpringConfig::assembly(), Point::ZERO),
            nodes: Vec::new(),
            target: centre,
            telemetry: 0.0,
            config,
            elapsed: 0.0,
        }
    }

    /// Returns a copy that also drives `nodes`.
    #[must_use]
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = SpatialNode>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Returns the registry key.
    #[must_use]
    pub fn key(&self) -> &SurfaceKey {
        &self.key
    }

    /// Returns the config.
    #[must_use]
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Advances every spring by one frame.
    pub fn update(&mut self, ctx: &KineticContext, tick: &FrameTick) {
        let target = ctx.resolve_relative_motion(self.key.as_str()).target();
        for ring in &mut self.rings {
            ring.set_target(target);
            ring.step(tick.dt);
        }
        let d = deviation(target);
        self.tilt
            .set_target(Point::new(-d.y * self.config.tilt, d.x * self.config.tilt));
        self.tilt.step(tick.dt);
        self.target = target;
        self.telemetry = 100.0 * intensity(ctx.speed(tick.now), self.config.telemetry_full_speed);
        self.elapsed = tick.elapsed;
    }

    /// Transform of the whole assembly (tilt only).
    #[must_use]
    pub fn assembly(&self) -> LayerTransform {
        let tilt = self.tilt.position();
        LayerTransform {
            rotate_x: tilt.x,
            rotate_y: tilt.y,
            ..LayerTransform::IDENTITY
        }
    }

    /// Per-ring transforms, front to back.
    pub fn rings(&self) -> impl Iterator<Item = LayerTransform> + '_ {
        let total = self.config.count;
        (0_u32..).zip(&self.rings).map(move |(i, spring)| {
            let c = &self.config;
            let fi = f64::from(i);
            let d = deviation(spring.position());
            let drift = fi * c.drift;
            let amplitude = c.wobble_base + fi * c.wobble_step;
            let wobble = Vec2::new(
                libm::sin(self.elapsed / (2.0 + 0.1 * fi)) * amplitude,
                libm::cos(self.elapsed / (2.2 + 0.1 * fi)) * amplitude,
            );
            LayerTransform {
                translate: Vec2::new(d.x * drift, d.y * drift * c.drift_y_ratio) + wobble,
                translate_z: -fi * c.step_depth,
                ..LayerTransform::IDENTITY
            }
            .with_falloff(i, total, c.opacity, c.scale)
        })
    }

    /// Transform of the central core, in front of the rings.
    #[must_use]
    pub fn core(&self) -> LayerTransform {
        let d = deviation(self.target);
        let offset = self.config.core_offset;
        LayerTransform {
            translate: Vec2::new(d.x * offset.x, d.y * offset.y),
            translate_z: self.config.core_depth,
            ..LayerTransform::IDENTITY
        }
    }

    /// Transform of the perspective grid behind the rings.
    #[must_use]
    pub fn grid(&self) -> LayerTransform {
        let d = deviation(self.target);
        let c = &self.config;
        LayerTransform {
            rotate_x: -d.y * c.grid_tilt,
            rotate_y: d.x * c.grid_tilt,
            translate_z: c.grid_depth,
            opacity: c.grid_opacity,
            ..LayerTransform::IDENTITY
        }
    }

    /// Nodes with their transforms. Deeper nodes drift further, toward the
    /// input.
    pub fn nodes(&self) -> impl Iterator<Item = (&SpatialNode, LayerTransform)> + '_ {
        let d = deviation(self.target);
        let div = self.config.node_divisor;
        self.nodes.iter().map(move |node| {
            let transform = LayerTransform {
                translate: Vec2::new(-d.x * node.depth / div.x, -d.y * node.depth / div.y),
                translate_z: node.depth,
                scale: node.scale,
                opacity: node.opacity.clamp(0.0, 1.0),
                ..LayerTransform::IDENTITY
            };
            (node, transform)
        })
    }

    /// Speed telemetry in `[0, 100]` as of the last update.
    #[must_use]
    pub fn telemetry(&self) -> f64 {
        self.telemetry
    }

    /// Height of a telemetry bar for the current level, pixels.
    #[must_use]
    pub fn telemetry_bar_height(&self) -> f64 {
        let (low, high) = TELEMETRY_BAR;
        low + (high - low) * self.telemetry / 100.0
    }

    /// Returns whether every spring has settled.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.tilt.is_at_rest() && self.rings.iter().all(Spring2d::is_at_rest)
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

    fn setup() -> (KineticContext, Rc<Fixed>, RingAssembly, FrameClock) {
        let mut ctx = KineticContext::new(KineticConfig::desktop(), Size::new(1000.0, 800.0));
        let el = Rc::new(Fixed(Rect::new(0.0, 0.0, 600.0, 600.0)));
        let _ = ctx.register_surface("core", &el);
        let rings = RingAssembly::new(SurfaceKey::new("core"), RingConfig::DESKTOP);
        let clock = FrameClock::new(FrameClockConfig::DEFAULT, Timebase::MICROS);
        (ctx, el, rings, clock)
    }

    #[test]
    fn presets_follow_capability() {
        assert_eq!(RingConfig::for_capability(PointerCapability::Fine).count, 26);
        let touch = RingConfig::for_capability(PointerCapability::Coarse);
        assert_eq!(touch.count, 14);
        assert_eq!(touch.step_depth, 8.0);
        assert_eq!(touch.diameter(2), 100.0);
    }

    #[test]
    fn rings_recede_and_fade() {
        let (_ctx, _el, rings, _) = setup();
        let all: Vec<_> = rings.rings().collect();
        assert_eq!(all.len(), 26);
        assert_eq!(all[0].translate_z, 0.0);
        assert_eq!(all[25].translate_z, -400.0);
        assert!((all[0].opacity - 0.7).abs() < 1e-12);
        assert!(all[25].opacity < all[1].opacity);
    }

    #[test]
    fn inner_rings_lead_outer_rings() {
        let (mut ctx, _el, mut rings, mut clock) = setup();
        let _ = ctx.on_pointer_move(Point::new(600.0, 300.0), HostTime(0));
        for i in 0..6 {
            rings.update(&ctx, &clock.tick(HostTime(i * 16_667)));
        }
        let inner = rings.rings[1].position().x;
        let outer = rings.rings[25].position().x;
        assert!(inner > outer, "inner {inner} outer {outer}");
        assert!(rings.assembly().rotate_y > 0.0);
        assert!(!rings.is_at_rest());
    }

    #[test]
    fn core_grid_and_nodes_follow_target() {
        let (mut ctx, _el, rings, mut clock) = setup();
        let node = SpatialNode {
            anchor: Point::new(0.2, 0.8),
            depth: -620.0,
            opacity: 0.5,
            scale: 0.75,
        };
        let mut rings = rings.with_nodes([node]);

        // Right edge, vertical centre.
        let _ = ctx.on_pointer_move(Point::new(600.0, 300.0), HostTime(0));
        rings.update(&ctx, &clock.tick(HostTime(0)));

        let core = rings.core();
        assert_eq!(core.translate, Vec2::new(26.0, 0.0));
        assert_eq!(core.translate_z, 120.0);

        let grid = rings.grid();
        assert_eq!(grid.rotate_y, 7.8);
        assert_eq!(grid.rotate_x, 0.0);
        assert_eq!(grid.translate_z, -150.0);
        assert_eq!(grid.opacity, 0.25);

        let nodes: Vec<_> = rings.nodes().collect();
        assert_eq!(nodes.len(), 1);
        let (n, t) = nodes[0];
        assert_eq!(*n, node);
        assert!((t.translate.x - 100.0).abs() < 1e-9);
        assert!(t.translate.y.abs() < 1e-9);
        assert_eq!((t.translate_z, t.scale, t.opacity), (-620.0, 0.75, 0.5));
    }

    #[test]
    fn touch_core_sits_closer() {
        assert_eq!(RingConfig::TOUCH.core_depth, 40.0);
        assert_eq!(RingConfig::TOUCH.core_offset, RingConfig::DESKTOP.core_offset);
    }

    #[test]
    fn telemetry_tracks_speed() {
        let (mut ctx, _el, mut rings, mut clock) = setup();
        assert_eq!(rings.telemetry_bar_height(), 2.0);

        // 200 px in 100 ms: 2000 px/s.
        let _ = ctx.on_pointer_move(Point::new(100.0, 300.0), HostTime(0));
        let _ = ctx.on_pointer_move(Point::new(300.0, 300.0), HostTime(100_000));
        rings.update(&ctx, &clock.tick(HostTime(100_000)));
        assert!((rings.telemetry() - 50.0).abs() < 1e-9);
        assert!((rings.telemetry_bar_height() - 21.0).abs() < 1e-9);

        // The pointer stops; velocity goes stale.
        rings.update(&ctx, &clock.tick(HostTime(200_000)));
        assert_eq!(rings.telemetry(), 0.0);
    }

    #[test]
    fn assembly_tilt_settles_at_full_range() {
        let (mut ctx, _el, mut rings, mut clock) = setup();
        let _ = ctx.on_pointer_move(Point::new(300.0, 0.0), HostTime(0));
        for i in 0..300 {
            rings.update(&ctx, &clock.tick(HostTime(i * 16_667)));
        }
        let a = rings.assembly();
        assert!((a.rotate_x - 32.5).abs() < 0.01);
        assert!(a.rotate_y.abs() < 0.01);
    }
}
