//! Repetition phase tracking.
//!
//! A repetition is a full cycle through the two extremes of the tracked
//! joint: start (extended) → end (contracted) → start. The tracker only
//! evaluates transitions once form has been correct for
//! `min_dwell_frames` consecutive frames, so sloppy reps and single-frame
//! detection glitches do not count.
//!
//! ```text
//!            angle >= start                angle < end
//!   Unset ───────────────► Start ─────────────────────► End
//!                            ▲                           │
//!                            └───────────────────────────┘
//!                          angle >= start  (reps += 1)
//! ```
//!
//! The dead band between the two thresholds gives hysteresis: jitter of a
//! degree around either threshold cannot produce extra reps.

use serde::{Deserialize, Serialize};

use crate::profile::PhaseThresholds;

/// Position within the current repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// No extreme observed since selection or reset.
    #[default]
    Unset,
    /// At or past the start threshold.
    Start,
    /// Below the end threshold after a start.
    End,
}

impl RepPhase {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RepPhase::Unset => "-",
            RepPhase::Start => "start",
            RepPhase::End => "end",
        }
    }
}

/// What a single [`RepTracker::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Form was incorrect; dwell cleared, nothing evaluated.
    Gated,
    /// Dwell not yet reached, or the angle stayed within its phase.
    Holding,
    /// Moved into the start phase without completing a rep.
    EnteredStart,
    /// Moved from start into the end phase.
    EnteredEnd,
    /// Returned to start from end; carries the new count.
    RepCompleted(u32),
}

/// Phase machine plus rep counter for one session.
#[derive(Debug, Clone)]
pub struct RepTracker {
    thresholds: PhaseThresholds,
    min_dwell_frames: u32,
    phase: RepPhase,
    reps: u32,
    dwell: u32,
}

impl RepTracker {
    /// Creates a tracker in the `Unset` phase with zero reps.
    #[must_use]
    pub fn new(thresholds: PhaseThresholds, min_dwell_frames: u32) -> Self {
        RepTracker {
            thresholds,
            min_dwell_frames,
            phase: RepPhase::Unset,
            reps: 0,
            dwell: 0,
        }
    }

    /// Feeds one frame's tracked angle and form verdict.
    ///
    /// Incorrect form clears the dwell counter. Correct form increments it,
    /// and once it reaches `min_dwell_frames` the angle drives the phase
    /// machine. A NaN angle never transitions.
    pub fn update(&mut self, angle: f32, form_correct: bool) -> TrackerEvent {
        if !form_correct {
            if self.dwell >= self.min_dwell_frames {
                tracing::debug!(phase = self.phase.label(), "form broke, dwell cleared");
            }
            self.dwell = 0;
            return TrackerEvent::Gated;
        }

        self.dwell = self.dwell.saturating_add(1);
        if self.dwell < self.min_dwell_frames {
            return TrackerEvent::Holding;
        }
        if self.dwell == self.min_dwell_frames {
            tracing::debug!(frames = self.dwell, "dwell reached, tracking phases");
        }

        if self.thresholds.in_start_region(angle) {
            match self.phase {
                RepPhase::Start => TrackerEvent::Holding,
                RepPhase::End => {
                    self.phase = RepPhase::Start;
                    self.reps += 1;
                    tracing::info!(reps = self.reps, angle, "rep completed");
                    TrackerEvent::RepCompleted(self.reps)
                }
                RepPhase::Unset => {
                    self.phase = RepPhase::Start;
                    tracing::debug!(angle, "phase -> start");
                    TrackerEvent::EnteredStart
                }
            }
        } else if self.phase == RepPhase::Start && self.thresholds.in_end_region(angle) {
            self.phase = RepPhase::End;
            tracing::debug!(angle, "phase -> end");
            TrackerEvent::EnteredEnd
        } else {
            TrackerEvent::Holding
        }
    }

    /// Returns to `Unset` with zero reps and zero dwell.
    pub fn reset(&mut self) {
        self.phase = RepPhase::Unset;
        self.reps = 0;
        self.dwell = 0;
    }

    /// Completed repetitions.
    #[must_use]
    pub fn reps(&self) -> u32 {
        self.reps
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Consecutive correct-form frames so far.
    #[must_use]
    pub fn dwell(&self) -> u32 {
        self.dwell
    }

    /// `true` once the dwell requirement is met and angles are evaluated.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.dwell >= self.min_dwell_frames
    }
}
