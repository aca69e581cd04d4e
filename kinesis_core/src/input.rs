// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input fusion: one pointer-like signal from pointer or orientation input.
//!
//! [`InputFusion`] owns the fused position. Its modality is decided once from
//! a [`PointerCapability`] probe and never changes afterwards:
//!
//! - **Pointer**: pointer-move client coordinates are taken as-is.
//! - **Orientation**: device tilt (`gamma` left/right, `beta` front/back) is
//!   clamped to a window around a calibrated neutral posture and remapped
//!   linearly onto the viewport, acting as a virtual pointer.
//!
//! Orientation input may need an explicit user-gesture permission. Until it
//! is granted the signal rests at the viewport center. Samples with missing
//! or non-finite axes are discarded and the last good position is kept.

use kurbo::{Point, Size};

/// Result of the host's coarse/fine pointer media probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerCapability {
    /// A precise hovering pointer (mouse, trackpad, pen).
    Fine,
    /// A touch-first device without hover.
    Coarse,
}

/// Which physical input drives the fused signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputModality {
    /// Pointer-move events.
    Pointer,
    /// Device-orientation tilt mapped to a virtual pointer.
    Orientation,
}

impl From<PointerCapability> for InputModality {
    fn from(capability: PointerCapability) -> Self {
        match capability {
            PointerCapability::Fine => Self::Pointer,
            PointerCapability::Coarse => Self::Orientation,
        }
    }
}

/// Orientation-sensor permission state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PermissionState {
    /// The platform delivers orientation events without asking.
    NotRequired,
    /// A user gesture must request access before samples are accepted.
    Prompt,
    /// Access was granted.
    Granted,
    /// Access was refused.
    Denied,
    /// The platform has no orientation sensor API.
    Unsupported,
}

impl PermissionState {
    /// Returns whether orientation samples may be applied in this state.
    #[inline]
    #[must_use]
    pub const fn allows_samples(self) -> bool {
        matches!(self, Self::NotRequired | Self::Granted)
    }
}

/// Neutral posture and angular window for tilt mapping.
///
/// These constants encode feel rather than correctness; the defaults hold a
/// phone at roughly 45° and map ±15° of tilt onto the full viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltCalibration {
    /// Front-back angle (degrees) that maps to the vertical center.
    pub neutral_beta: f64,
    /// Left-right angle (degrees) that maps to the horizontal center.
    pub neutral_gamma: f64,
    /// Half-width of the usable angular window, in degrees.
    pub window: f64,
}

impl TiltCalibration {
    /// Default calibration: neutral at 45° front-back, ±15° window.
    pub const DEFAULT: Self = Self {
        neutral_beta: 45.0,
        neutral_gamma: 0.0,
        window: 15.0,
    };

    /// Maps tilt angles (degrees) to a viewport position.
    ///
    /// Each axis is clamped to `neutral ± window` and remapped linearly so
    /// `neutral - window` lands on 0 and `neutral + window` on the full
    /// extent.
    #[must_use]
    pub fn map(&self, beta: f64, gamma: f64, viewport: Size) -> Point {
        let w = self.window.abs().max(f64::EPSILON);
        let g = (gamma - self.neutral_gamma).clamp(-w, w);
        let b = (beta - self.neutral_beta).clamp(-w, w);
        Point::new(
            (g + w) / (2.0 * w) * viewport.width,
            (b + w) / (2.0 * w) * viewport.height,
        )
    }
}

impl Default for TiltCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One device-orientation reading. Devices report `None` for unsupported
/// axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationSample {
    /// Front-back tilt in degrees.
    pub beta: Option<f64>,
    /// Left-right tilt in degrees.
    pub gamma: Option<f64>,
}

/// Why a sample did not move the fused signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The sample belongs to the modality that is not active.
    WrongModality,
    /// An orientation axis was reported as null.
    MissingAxis,
    /// A coordinate or angle was NaN or infinite.
    NonFinite,
    /// Orientation permission has not been granted.
    PermissionPending,
}

/// What happened to an input sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleOutcome {
    /// The fused signal moved to this position.
    Applied(Point),
    /// The sample was discarded; the signal is unchanged.
    Ignored(IgnoreReason),
}

impl SampleOutcome {
    /// Returns the new position if the sample was applied.
    #[inline]
    #[must_use]
    pub const fn applied(self) -> Option<Point> {
        match self {
            Self::Applied(p) => Some(p),
            Self::Ignored(_) => None,
        }
    }
}

/// The input fusion source: owner of the single fused position.
#[derive(Clone, Debug)]
pub struct InputFusion {
    modality: InputModality,
    calibration: TiltCalibration,
    permission: PermissionState,
    viewport: Size,
    position: Point,
    /// Whether a sample has moved the signal since the last recentering.
    has_sample: bool,
}

impl InputFusion {
    /// Creates a fusion source for the probed capability.
    ///
    /// Pointer modality starts at the origin until the first move. Orientation
    /// modality starts at the viewport center, with permission defaulting to
    /// [`PermissionState::NotRequired`]; hosts that must ask call
    /// [`set_permission`](Self::set_permission) with
    /// [`PermissionState::Prompt`] before the first sample.
    #[must_use]
    pub fn new(capability: PointerCapability, calibration: TiltCalibration, viewport: Size) -> Self {
        let modality = InputModality::from(capability);
        let position = match modality {
            InputModality::Pointer => Point::ZERO,
            InputModality::Orientation => viewport_center(viewport),
        };
        Self {
            modality,
            calibration,
            permission: PermissionState::NotRequired,
            viewport,
            position,
            has_sample: false,
        }
    }

    /// Returns the current fused position in viewport pixels.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the active modality.
    #[inline]
    #[must_use]
    pub fn modality(&self) -> InputModality {
        self.modality
    }

    /// Returns the orientation permission state.
    #[inline]
    #[must_use]
    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Returns the tilt calibration.
    #[inline]
    #[must_use]
    pub fn calibration(&self) -> TiltCalibration {
        self.calibration
    }

    /// Returns the viewport size used for tilt mapping.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Feeds a pointer-move in viewport (client) coordinates.
    pub fn pointer_move(&mut self, client: Point) -> SampleOutcome {
        if self.modality != InputModality::Pointer {
            return SampleOutcome::Ignored(IgnoreReason::WrongModality);
        }
        if !client.is_finite() {
            return SampleOutcome::Ignored(IgnoreReason::NonFinite);
        }
        self.apply(client)
    }

    /// Feeds a device-orientation reading.
    pub fn orientation(&mut self, sample: OrientationSample) -> SampleOutcome {
        if self.modality != InputModality::Orientation {
            return SampleOutcome::Ignored(IgnoreReason::WrongModality);
        }
        if !self.permission.allows_samples() {
            return SampleOutcome::Ignored(IgnoreReason::PermissionPending);
        }
        let (Some(beta), Some(gamma)) = (sample.beta, sample.gamma) else {
            return SampleOutcome::Ignored(IgnoreReason::MissingAxis);
        };
        if !beta.is_finite() || !gamma.is_finite() {
            return SampleOutcome::Ignored(IgnoreReason::NonFinite);
        }
        let p = self.calibration.map(beta, gamma, self.viewport);
        self.apply(p)
    }

    /// Updates the orientation permission state.
    ///
    /// Leaving a sample-accepting state re-centers the signal so a revoked
    /// sensor does not freeze the virtual pointer off-center.
    pub fn set_permission(&mut self, state: PermissionState) {
        self.permission = state;
        if self.modality == InputModality::Orientation && !state.allows_samples() {
            self.recenter();
        }
    }

    /// Updates the viewport size.
    ///
    /// In orientation modality, a signal that has not been driven by a sample
    /// yet follows the new center.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        if self.modality == InputModality::Orientation && !self.has_sample {
            self.position = viewport_center(viewport);
        }
    }

    fn apply(&mut self, p: Point) -> SampleOutcome {
        self.position = p;
        self.has_sample = true;
        SampleOutcome::Applied(p)
    }

    fn recenter(&mut self) {
        self.position = viewport_center(self.viewport);
        self.has_sample = false;
    }
}

fn viewport_center(viewport: Size) -> Point {
    Point::new(viewport.width * 0.5, viewport.height * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(400.0, 800.0);

    fn tilt(beta: f64, gamma: f64) -> OrientationSample {
        OrientationSample {
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    #[test]
    fn pointer_moves_set_signal_directly() {
        let mut input = InputFusion::new(PointerCapability::Fine, TiltCalibration::DEFAULT, VIEWPORT);
        let out = input.pointer_move(Point::new(12.5, 40.0));
        assert_eq!(out, SampleOutcome::Applied(Point::new(12.5, 40.0)));
        assert_eq!(input.position(), Point::new(12.5, 40.0));
    }

    #[test]
    fn coarse_pointer_starts_centered() {
        let input = InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        assert_eq!(input.modality(), InputModality::Orientation);
        assert_eq!(input.position(), Point::new(200.0, 400.0));
    }

    #[test]
    fn neutral_posture_maps_to_center() {
        let mut input = InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        let out = input.orientation(tilt(45.0, 0.0));
        assert_eq!(out, SampleOutcome::Applied(Point::new(200.0, 400.0)));
    }

    #[test]
    fn tilt_window_edges_map_to_viewport_edges() {
        let cal = TiltCalibration::DEFAULT;
        assert_eq!(cal.map(30.0, -15.0, VIEWPORT), Point::new(0.0, 0.0));
        assert_eq!(cal.map(60.0, 15.0, VIEWPORT), Point::new(400.0, 800.0));
        // Beyond the window clamps.
        assert_eq!(cal.map(90.0, -80.0, VIEWPORT), Point::new(0.0, 800.0));
    }

    #[test]
    fn null_axis_is_ignored_and_last_state_kept() {
        let mut input = InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        let _ = input.orientation(tilt(60.0, 15.0));
        let out = input.orientation(OrientationSample {
            beta: None,
            gamma: Some(0.0),
        });
        assert_eq!(out, SampleOutcome::Ignored(IgnoreReason::MissingAxis));
        assert_eq!(
            input.position(),
            Point::new(400.0, 800.0),
            "a null axis must not be read as zero"
        );
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let mut input = InputFusion::new(PointerCapability::Fine, TiltCalibration::DEFAULT, VIEWPORT);
        let _ = input.pointer_move(Point::new(5.0, 5.0));
        let out = input.pointer_move(Point::new(f64::NAN, 1.0));
        assert_eq!(out, SampleOutcome::Ignored(IgnoreReason::NonFinite));
        assert_eq!(input.position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn modality_does_not_hot_swap() {
        let mut fine = InputFusion::new(PointerCapability::Fine, TiltCalibration::DEFAULT, VIEWPORT);
        assert_eq!(
            fine.orientation(tilt(45.0, 0.0)),
            SampleOutcome::Ignored(IgnoreReason::WrongModality)
        );
        let mut coarse =
            InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        assert_eq!(
            coarse.pointer_move(Point::new(1.0, 1.0)),
            SampleOutcome::Ignored(IgnoreReason::WrongModality)
        );
        assert_eq!(coarse.position(), Point::new(200.0, 400.0));
    }

    #[test]
    fn samples_wait_for_permission() {
        let mut input = InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        input.set_permission(PermissionState::Prompt);
        assert_eq!(
            input.orientation(tilt(60.0, 15.0)),
            SampleOutcome::Ignored(IgnoreReason::PermissionPending)
        );
        assert_eq!(input.position(), Point::new(200.0, 400.0));

        input.set_permission(PermissionState::Granted);
        assert!(input.orientation(tilt(60.0, 15.0)).applied().is_some());
    }

    #[test]
    fn denied_permission_recenters() {
        let mut input = InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        let _ = input.orientation(tilt(60.0, 15.0));
        input.set_permission(PermissionState::Denied);
        assert_eq!(input.position(), Point::new(200.0, 400.0));
    }

    #[test]
    fn resize_recenters_until_first_sample() {
        let mut input = InputFusion::new(PointerCapability::Coarse, TiltCalibration::DEFAULT, VIEWPORT);
        input.resize(Size::new(800.0, 400.0));
        assert_eq!(input.position(), Point::new(400.0, 200.0));

        let _ = input.orientation(tilt(30.0, -15.0));
        input.resize(Size::new(100.0, 100.0));
        assert_eq!(input.position(), Point::ZERO, "driven signal stays put");
    }
}
