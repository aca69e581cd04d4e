// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transform for composed layers.
//!
//! Angles are in degrees and follow CSS `rotateX`/`rotateY`/`rotateZ`
//! conventions, so the column array can be written straight into a
//! `matrix3d(...)` value.

use core::ops::Mul;

/// A column-major 4×4 transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The identity transform.
    pub const IDENTITY: Self = Self::from_scale(1.0, 1.0, 1.0);

    /// Translation by `(x, y, z)`.
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Per-axis scale.
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation about the X axis (tilt toward/away from the viewer).
    #[must_use]
    pub fn from_rotation_x(degrees: f64) -> Self {
        let (s, c) = sin_cos(degrees);
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation about the Y axis.
    #[must_use]
    pub fn from_rotation_y(degrees: f64) -> Self {
        let (s, c) = sin_cos(degrees);
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation in the screen plane.
    #[must_use]
    pub fn from_rotation_z(degrees: f64) -> Self {
        let (s, c) = sin_cos(degrees);
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns the translation column as `(x, y, z)`.
    #[must_use]
    pub const fn translation(&self) -> [f64; 3] {
        let t = self.cols[3];
        [t[0], t[1], t[2]]
    }

    /// Applies the transform to a point (`w = 1`).
    #[must_use]
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = self.translation();
        for (axis, col) in self.cols.iter().take(3).enumerate() {
            for (o, c) in out.iter_mut().zip(col) {
                *o += c * p[axis];
            }
        }
        out
    }

    /// Returns the 16 entries in column-major order.
    #[must_use]
    pub fn to_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (chunk, col) in out.chunks_exact_mut(4).zip(&self.cols) {
            chunk.copy_from_slice(col);
        }
        out
    }

    /// Whether every entry is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    /// `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        let mut cols = [[0.0_f64; 4]; 4];
        for (out, b) in cols.iter_mut().zip(&rhs.cols) {
            for (row, o) in out.iter_mut().enumerate() {
                *o = (0..4).map(|k| self.cols[k][row] * b[k]).sum();
            }
        }
        Self { cols }
    }
}

fn sin_cos(degrees: f64) -> (f64, f64) {
    let r = degrees.to_radians();
    (libm::sin(r), libm::cos(r))
}
