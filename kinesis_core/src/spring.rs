// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damped spring smoothing.
//!
//! Each step evaluates the analytic solution of the damped harmonic
//! oscillator `m·x'' + c·x' + k·x = 0` (with `x` measured from the target),
//! so the result is exact for any `dt` and a long frame cannot make the
//! spring diverge.

use kurbo::{Point, Vec2};

/// Damping ratios this close to 1 use the critically damped solution.
const CRITICAL_EPSILON: f64 = 1e-6;

/// Physical parameters of a spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Spring constant `k`.
    pub stiffness: f64,
    /// Damping coefficient `c`.
    pub damping: f64,
    /// Mass `m`.
    pub mass: f64,
    /// Distance from the target below which the spring may come to rest.
    pub rest_delta: f64,
    /// Speed below which the spring may come to rest.
    pub rest_speed: f64,
}

impl SpringConfig {
    /// Creates a config with the default rest thresholds (0.01 / 0.01).
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_delta: 0.01,
            rest_speed: 0.01,
        }
    }

    /// Returns a copy with different rest thresholds.
    #[must_use]
    pub const fn with_rest(mut self, rest_delta: f64, rest_speed: f64) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// Tilting card: heavy and slightly overdamped.
    ///
    /// Works in local `[0, 1]` coordinates, hence the tight rest delta.
    #[must_use]
    pub const fn card() -> Self {
        Self::new(180.0, 35.0, 1.2).with_rest(0.001, 0.001)
    }

    /// Magnetic button offset, in pixels.
    #[must_use]
    pub const fn button() -> Self {
        Self::new(200.0, 25.0, 0.6)
    }

    /// Cursor aura follow, in pixels.
    #[must_use]
    pub const fn cursor() -> Self {
        Self::new(400.0, 35.0, 0.3)
    }

    /// Whole-assembly rotation, in degrees.
    #[must_use]
    pub const fn assembly() -> Self {
        Self::new(100.0, 20.0, 1.0)
    }

    /// Smoothed signal speed, in pixels per second.
    #[must_use]
    pub const fn speed() -> Self {
        Self::new(200.0, 50.0, 1.0).with_rest(1.0, 1.0)
    }

    /// Orbital ring `index`: outer rings are softer and heavier.
    #[must_use]
    pub const fn ring(index: u32) -> Self {
        let i = index as f64;
        Self::new(160.0 - 2.5 * i, 30.0 + 0.5 * i, 0.8 + 0.05 * i).with_rest(0.001, 0.001)
    }

    /// Returns whether the parameters describe a physical spring.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.damping.is_finite()
            && self.mass.is_finite()
            && self.stiffness > 0.0
            && self.mass > 0.0
            && self.damping >= 0.0
    }

    /// Undamped angular frequency `√(k/m)`.
    #[must_use]
    pub fn natural_frequency(&self) -> f64 {
        libm::sqrt(self.stiffness / self.mass)
    }

    /// Damping ratio `ζ = c / (2·√(k·m))`.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * libm::sqrt(self.stiffness * self.mass))
    }

    /// Peak overshoot of a unit step from rest, as a fraction of the step.
    ///
    /// Zero for critically damped and overdamped springs.
    #[must_use]
    pub fn max_overshoot(&self) -> f64 {
        let zeta = self.damping_ratio();
        if zeta >= 1.0 {
            return 0.0;
        }
        libm::exp(-zeta * core::f64::consts::PI / libm::sqrt(1.0 - zeta * zeta))
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }
}

/// A one-dimensional spring.
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
    at_rest: bool,
}

impl Spring {
    /// Creates a spring resting at `initial`.
    #[must_use]
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self {
            config,
            position: initial,
            velocity: 0.0,
            target: initial,
            at_rest: true,
        }
    }

    /// Returns the config.
    #[must_use]
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Replaces the config, keeping position and velocity.
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
        self.at_rest = false;
    }

    /// Sets the value the spring pulls toward.
    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            return;
        }
        if target != self.target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Moves the spring to `value` instantly and stops it there.
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Returns the current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Returns the current velocity (units per second).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Returns whether the spring has settled on its target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Advances by `dt` seconds and returns the new position.
    ///
    /// Non-positive or non-finite `dt` leaves the state unchanged.
    pub fn step(&mut self, dt: f64) -> f64 {
        if self.at_rest || !dt.is_finite() || dt <= 0.0 {
            return self.position;
        }
        if !self.config.is_valid() {
            self.snap_to(self.target);
            return self.position;
        }

        let (x, v) = oscillate(&self.config, self.position - self.target, self.velocity, dt);
        self.position = self.target + x;
        self.velocity = v;

        if x.abs() <= self.config.rest_delta && v.abs() <= self.config.rest_speed {
            self.snap_to(self.target);
        }
        self.position
    }
}

/// Evaluates displacement and velocity after `t` seconds.
fn oscillate(config: &SpringConfig, x0: f64, v0: f64, t: f64) -> (f64, f64) {
    let omega = config.natural_frequency();
    let zeta = config.damping_ratio();

    if (zeta - 1.0).abs() < CRITICAL_EPSILON {
        let c = v0 + omega * x0;
        let decay = libm::exp(-omega * t);
        let x = decay * (x0 + c * t);
        let v = decay * (v0 - omega * c * t);
        (x, v)
    } else if zeta < 1.0 {
        let a = zeta * omega;
        let wd = omega * libm::sqrt(1.0 - zeta * zeta);
        let b = (v0 + a * x0) / wd;
        let decay = libm::exp(-a * t);
        let (sin, cos) = (libm::sin(wd * t), libm::cos(wd * t));
        let x = decay * (x0 * cos + b * sin);
        let v = decay * (v0 * cos - (x0 * wd + a * b) * sin);
        (x, v)
    } else {
        let root = omega * libm::sqrt(zeta * zeta - 1.0);
        let r1 = -zeta * omega + root;
        let r2 = -zeta * omega - root;
        let c1 = (v0 - r2 * x0) / (r1 - r2);
        let c2 = x0 - c1;
        let (e1, e2) = (libm::exp(r1 * t), libm::exp(r2 * t));
        (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
    }
}

/// Two independent springs sharing one config.
#[derive(Clone, Debug)]
pub struct Spring2d {
    x: Spring,
    y: Spring,
}

impl Spring2d {
    /// Creates a spring resting at `initial`.
    #[must_use]
    pub fn new(config: SpringConfig, initial: Point) -> Self {
        Self {
            x: Spring::new(config, initial.x),
            y: Spring::new(config, initial.y),
        }
    }

    /// Sets the point the spring pulls toward.
    pub fn set_target(&mut self, target: Point) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    /// Moves to `value` instantly and stops there.
    pub fn snap_to(&mut self, value: Point) {
        self.x.snap_to(value.x);
        self.y.snap_to(value.y);
    }

    /// Advances by `dt` seconds and returns the new position.
    pub fn step(&mut self, dt: f64) -> Point {
        Point::new(self.x.step(dt), self.y.step(dt))
    }

    /// Returns the current target.
    #[must_use]
    pub fn target(&self) -> Point {
        Point::new(self.x.target(), self.y.target())
    }

    /// Returns the current position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x.position(), self.y.position())
    }

    /// Returns the current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }

    /// Returns whether both axes are at rest.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }
}
