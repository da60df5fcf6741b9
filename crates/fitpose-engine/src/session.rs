//! Session controller.
//!
//! A [`Session`] owns all mutable state for one user / one camera stream.
//! Sessions share nothing but the read-only profile registry, so any number
//! of them can run on independent threads without synchronization.

use std::fmt;

use fitpose_core::KeypointSet;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::exercise::Exercise;
use crate::form::{FormEvaluator, JointAngle};
use crate::phase::{RepPhase, RepTracker};

/// Feedback reported when every form rule passes.
pub const FORM_OK_FEEDBACK: &str = "Form looks good!";

/// Feedback reported while no exercise is selected.
pub const NO_EXERCISE_FEEDBACK: &str = "No exercise selected";

// ---------------------------------------------------------------------------
// FrameResult
// ---------------------------------------------------------------------------

/// Coarse status shown next to the rep counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    /// Form has been correct for at least the dwell period.
    GoodForm,
    /// Form is incorrect, or has not been correct for long enough yet.
    FixForm,
    /// No exercise selected.
    NoExercise,
}

impl FormStatus {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FormStatus::GoodForm => "Good Form",
            FormStatus::FixForm => "Fix Form",
            FormStatus::NoExercise => "No Exercise",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of processing one frame. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResult {
    /// Active exercise, `None` when idle.
    pub exercise: Option<Exercise>,
    /// Angle of the profile's tracked joint; NaN when undefined.
    pub tracked_angle: f32,
    /// Every angle the form rules measured.
    pub angles: Vec<JointAngle>,
    /// Verdict of the form rules for this frame.
    pub form_correct: bool,
    /// Dwell-aware status.
    pub form_status: FormStatus,
    /// Completed repetitions.
    pub rep_count: u32,
    /// Current phase.
    pub phase: RepPhase,
    /// Corrective feedback or instructions, capped at
    /// `max_feedback_items`.
    pub feedback: Vec<String>,
}

impl FrameResult {
    /// Result reported while no exercise is selected.
    #[must_use]
    pub fn idle() -> Self {
        FrameResult {
            exercise: None,
            tracked_angle: f32::NAN,
            angles: Vec::new(),
            form_correct: false,
            form_status: FormStatus::NoExercise,
            rep_count: 0,
            phase: RepPhase::Unset,
            feedback: vec![NO_EXERCISE_FEEDBACK.to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ActiveExercise {
    exercise: Exercise,
    tracker: RepTracker,
}

/// Mutable per-session state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    active: Option<ActiveExercise>,
    form_correct: bool,
    feedback: Vec<String>,
    last_result: Option<FrameResult>,
}

impl SessionState {
    /// Selected exercise, if any.
    #[must_use]
    pub fn exercise(&self) -> Option<Exercise> {
        self.active.as_ref().map(|a| a.exercise)
    }

    /// Completed repetitions of the selected exercise.
    #[must_use]
    pub fn rep_count(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.tracker.reps())
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RepPhase {
        self.active
            .as_ref()
            .map_or(RepPhase::Unset, |a| a.tracker.phase())
    }

    /// Consecutive correct-form frames.
    #[must_use]
    pub fn dwell(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.tracker.dwell())
    }

    /// Last form verdict.
    #[must_use]
    pub fn form_correct(&self) -> bool {
        self.form_correct
    }

    /// Last feedback list.
    #[must_use]
    pub fn feedback(&self) -> &[String] {
        &self.feedback
    }

    /// Result of the most recent frame with a detection.
    #[must_use]
    pub fn last_result(&self) -> Option<&FrameResult> {
        self.last_result.as_ref()
    }

    fn form_status(&self) -> FormStatus {
        match &self.active {
            None => FormStatus::NoExercise,
            Some(a) if self.form_correct && a.tracker.is_engaged() => FormStatus::GoodForm,
            Some(_) => FormStatus::FixForm,
        }
    }

    /// Result assembled from state alone, for a missing detection before any
    /// frame has been evaluated.
    fn snapshot(&self) -> FrameResult {
        if self.active.is_none() {
            return FrameResult::idle();
        }
        FrameResult {
            exercise: self.exercise(),
            tracked_angle: f32::NAN,
            angles: Vec::new(),
            form_correct: self.form_correct,
            form_status: self.form_status(),
            rep_count: self.rep_count(),
            phase: self.phase(),
            feedback: self.feedback.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One tracking session.
///
/// ```rust
/// use fitpose_engine::{Session, FormStatus};
///
/// let mut session = Session::default();
/// assert_eq!(session.process_frame(None).form_status, FormStatus::NoExercise);
///
/// session.select_exercise("Squat").unwrap();
/// assert!(session.select_exercise("lunges").is_err());
/// assert_eq!(session.state().rep_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    evaluator: FormEvaluator,
    state: SessionState,
}

impl Session {
    /// Creates a session with no exercise selected.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`](crate::EngineError::Config) if
    /// `config` fails validation.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Session {
            evaluator: FormEvaluator::new(&config),
            config,
            state: SessionState::default(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Selects an exercise by identifier (ASCII case-insensitive).
    ///
    /// On success the rep count, phase and dwell are reset and the
    /// profile's instructions become the current feedback. On failure the
    /// session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ProfileNotFound`](crate::EngineError::ProfileNotFound)
    /// for unknown identifiers.
    pub fn select_exercise(&mut self, id: &str) -> EngineResult<()> {
        let exercise = match id.parse::<Exercise>() {
            Ok(exercise) => exercise,
            Err(err) => {
                tracing::warn!(id, "unknown exercise, selection ignored");
                return Err(err);
            }
        };
        let profile = exercise.profile();

        self.state = SessionState {
            active: Some(ActiveExercise {
                exercise,
                tracker: RepTracker::new(profile.phase, self.config.min_dwell_frames),
            }),
            form_correct: false,
            feedback: self.capped(profile.instructions.iter().map(|s| (*s).to_string())),
            last_result: None,
        };
        tracing::info!(exercise = %exercise, "exercise selected");
        Ok(())
    }

    /// Zeroes the rep count, phase and dwell without changing the selected
    /// exercise.
    pub fn reset(&mut self) {
        if let Some(active) = self.state.active.as_mut() {
            active.tracker.reset();
            tracing::info!(exercise = %active.exercise, "session reset");
        }
        self.state.form_correct = false;
        self.state.last_result = None;
    }

    /// Processes one frame.
    ///
    /// `None` means no person was detected: the previous result is returned
    /// unchanged and no state moves.
    pub fn process_frame(&mut self, keypoints: Option<&KeypointSet>) -> FrameResult {
        let Some(active) = self.state.active.as_mut() else {
            return FrameResult::idle();
        };
        let Some(keypoints) = keypoints else {
            return self
                .state
                .last_result
                .clone()
                .unwrap_or_else(|| self.state.snapshot());
        };

        let profile = active.exercise.profile();
        let verdict = self.evaluator.evaluate(profile, keypoints);
        let tracked_angle = profile.tracked_angle(keypoints);
        active.tracker.update(tracked_angle, verdict.form_correct);

        let feedback = if verdict.feedback.is_empty() {
            vec![FORM_OK_FEEDBACK.to_string()]
        } else {
            verdict.feedback
        };
        self.state.feedback = self.capped(feedback);
        self.state.form_correct = verdict.form_correct;

        let result = FrameResult {
            exercise: self.state.exercise(),
            tracked_angle,
            angles: verdict.angles,
            form_correct: verdict.form_correct,
            form_status: self.state.form_status(),
            rep_count: self.state.rep_count(),
            phase: self.state.phase(),
            feedback: self.state.feedback.clone(),
        };
        tracing::trace!(
            angle = tracked_angle,
            correct = result.form_correct,
            reps = result.rep_count,
            phase = result.phase.label(),
            "frame processed"
        );
        self.state.last_result = Some(result.clone());
        result
    }

    fn capped(&self, feedback: impl IntoIterator<Item = String>) -> Vec<String> {
        feedback
            .into_iter()
            .take(self.config.max_feedback_items)
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        let config = EngineConfig::default();
        Session {
            evaluator: FormEvaluator::new(&config),
            config,
            state: SessionState::default(),
        }
    }
}
