// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settle metrics and grading for smoothed outputs.

use alloc::string::String;

use kurbo::{Point, Vec2};

/// Per-frame sample fed into [`SettleTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct SettleSample {
    /// Smoothed output after this frame's step.
    pub position: Point,
    /// Target the output is moving toward.
    pub target: Point,
    /// Frame step in milliseconds.
    pub frame_delta_ms: f64,
}

/// Letter grade for settle quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleGrade {
    /// Quick and steady.
    A,
    /// Noticeably slow or slightly springy.
    B,
    /// Sluggish or bouncy but usable.
    C,
    /// Wobbles or never settles.
    D,
}

impl SettleGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`SettleTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct SettleReport {
    /// Current grade.
    pub grade: SettleGrade,
    /// Whether the output is within tolerance of the current target.
    pub settled: bool,
    /// Time from the last retarget until the output first came within
    /// tolerance, or the time elapsed so far if it has not.
    pub settle_ms: f64,
    /// Largest excursion past the current target, as a fraction of the step.
    pub overshoot: f64,
    /// Distance from the current target.
    pub error: f64,
    /// Total frames observed.
    pub total_frames: u64,
    /// Number of target changes observed.
    pub retargets: u64,
}

/// Tracks how smoothed output approaches its target.
///
/// A change of target starts a new episode: the step is measured from the
/// first position observed with the new target, and overshoot is the
/// largest excursion past the target along that step.
#[derive(Debug)]
pub struct SettleTracker<const N: usize> {
    tolerance: f64,
    errors: [f64; N],
    cursor: usize,
    total_frames: u64,
    retargets: u64,
    episode: Option<Episode>,
}

#[derive(Clone, Copy, Debug)]
struct Episode {
    target: Point,
    step: Vec2,
    elapsed_ms: f64,
    settled_at_ms: Option<f64>,
    overshoot: f64,
}

impl<const N: usize> SettleTracker<N> {
    /// Creates a tracker that counts an output as settled within
    /// `tolerance` of its target.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            errors: [0.0; N],
            cursor: 0,
            total_frames: 0,
            retargets: 0,
            episode: None,
        }
    }

    /// Observes one frame and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, sample: SettleSample) -> SettleReport {
        self.total_frames = self.total_frames.saturating_add(1);
        let offset = sample.position - sample.target;
        let error = offset.hypot();
        self.errors[self.cursor % N] = error;
        self.cursor = (self.cursor + 1) % N;

        let episode = match &mut self.episode {
            Some(e) if e.target == sample.target => {
                e.elapsed_ms += sample.frame_delta_ms;
                e
            }
            slot => {
                self.retargets = self.retargets.saturating_add(1);
                slot.insert(Episode {
                    target: sample.target,
                    step: -offset,
                    elapsed_ms: 0.0,
                    settled_at_ms: None,
                    overshoot: 0.0,
                })
            }
        };

        let step_len2 = episode.step.hypot2();
        if step_len2 > 0.0 {
            let past = offset.dot(episode.step) / step_len2;
            episode.overshoot = episode.overshoot.max(past);
        }
        let settled = error <= self.tolerance;
        if settled && episode.settled_at_ms.is_none() {
            episode.settled_at_ms = Some(episode.elapsed_ms);
        }

        let settle_ms = episode.settled_at_ms.unwrap_or(episode.elapsed_ms);
        SettleReport {
            grade: grade_for(settle_ms, episode.overshoot, settled),
            settled,
            settle_ms,
            overshoot: episode.overshoot,
            error,
            total_frames: self.total_frames,
            retargets: self.retargets,
        }
    }

    /// Returns ring-buffer errors oldest→newest.
    #[must_use]
    pub fn errors(&self) -> [f64; N] {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.errors[(self.cursor + i) % N];
        }
        out
    }

    /// Returns an ASCII sparkline over [`errors`](Self::errors), scaled so
    /// `max_error` is the tallest level.
    #[must_use]
    pub fn sparkline_ascii(&self, max_error: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(N);
        for e in self.errors() {
            let t = if max_error > 0.0 {
                (e / max_error).clamp(0.0, 1.0)
            } else {
                0.0
            };
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
        }
        out
    }
}

fn grade_for(settle_ms: f64, overshoot: f64, settled: bool) -> SettleGrade {
    if settle_ms < 800.0 && overshoot < 0.05 && settled {
        SettleGrade::A
    } else if settle_ms < 1500.0 && overshoot < 0.15 {
        SettleGrade::B
    } else if settle_ms < 3000.0 && overshoot < 0.3 {
        SettleGrade::C
    } else {
        SettleGrade::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, target: f64) -> SettleSample {
        SettleSample {
            position: Point::new(x, 0.0),
            target: Point::new(target, 0.0),
            frame_delta_ms: 100.0,
        }
    }

    #[test]
    fn retarget_starts_a_new_episode() {
        let mut t = SettleTracker::<4>::new(0.01);
        let _ = t.observe(sample(0.0, 1.0));
        let r = t.observe(sample(1.0, 1.0));
        assert!(r.settled);
        assert_eq!(r.settle_ms, 100.0);
        assert_eq!(r.grade, SettleGrade::A);

        let r = t.observe(sample(1.0, 0.0));
        assert_eq!(r.retargets, 2);
        assert_eq!(r.settle_ms, 0.0);
        assert!(!r.settled);
    }

    #[test]
    fn overshoot_is_relative_to_step() {
        let mut t = SettleTracker::<4>::new(0.01);
        let _ = t.observe(sample(0.0, 2.0));
        let r = t.observe(sample(2.5, 2.0));
        assert!((r.overshoot - 0.25).abs() < 1e-12);
        assert_eq!(r.grade, SettleGrade::C);
    }

    #[test]
    fn sparkline_orders_oldest_first() {
        let mut t = SettleTracker::<3>::new(0.01);
        for x in [0.0, 0.5, 1.0, 1.0] {
            let _ = t.observe(sample(x, 1.0));
        }
        assert_eq!(t.errors(), [0.5, 0.0, 0.0]);
        assert_eq!(t.sparkline_ascii(1.0), "+  ");
    }
}
