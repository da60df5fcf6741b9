//! Exercise profile registry.
//!
//! Profiles are static data defined at compile time and never mutated, so
//! the registry can be read from any number of sessions and threads at once.
//! Adding an exercise means adding a variant to [`Exercise`] and one entry
//! to [`PROFILES`]; the evaluator and the rep tracker are generic over the
//! profile contents.

use fitpose_core::{geometry::angle_at, KeypointSet, KeypointType};
use KeypointType::{
    LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightElbow, RightShoulder,
    RightWrist,
};
use serde::Serialize;

use crate::error::EngineResult;
use crate::exercise::Exercise;
use crate::form::FormRule;

/// Three keypoints whose middle one is the vertex of a joint angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JointTriple {
    /// Measurement name, e.g. `left_knee`.
    pub name: &'static str,
    /// First ray end (e.g. hip).
    pub first: KeypointType,
    /// Angle vertex (e.g. knee).
    pub vertex: KeypointType,
    /// Second ray end (e.g. ankle).
    pub last: KeypointType,
}

impl JointTriple {
    /// Creates a new joint triple.
    #[must_use]
    pub const fn new(
        name: &'static str,
        first: KeypointType,
        vertex: KeypointType,
        last: KeypointType,
    ) -> Self {
        Self {
            name,
            first,
            vertex,
            last,
        }
    }

    /// Angle at the vertex in degrees, NaN if undefined.
    #[must_use]
    pub fn angle(&self, keypoints: &KeypointSet) -> f32 {
        angle_at(
            keypoints.point(self.first),
            keypoints.point(self.vertex),
            keypoints.point(self.last),
        )
    }
}

/// Inclusive range of acceptable joint angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleRange {
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (inclusive).
    pub max: f32,
}

impl AngleRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `angle` lies in the range. NaN never does.
    #[must_use]
    pub fn contains(&self, angle: f32) -> bool {
        (self.min..=self.max).contains(&angle)
    }
}

/// Tracked-angle thresholds marking the two extremes of a repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseThresholds {
    /// Angles at or above this value are the extended (start) position.
    pub start: f32,
    /// Angles strictly below this value are the contracted (end) position.
    pub end: f32,
}

impl PhaseThresholds {
    /// Returns `true` if `angle` is in the start region (`>= start`).
    #[must_use]
    pub fn in_start_region(&self, angle: f32) -> bool {
        angle >= self.start
    }

    /// Returns `true` if `angle` is in the end region (`< end`).
    #[must_use]
    pub fn in_end_region(&self, angle: f32) -> bool {
        angle < self.end
    }
}

/// Static description of one exercise.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseProfile {
    /// The exercise this profile describes.
    pub exercise: Exercise,
    /// Canonical identifier.
    pub id: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Joint whose angle drives the rep phase machine.
    pub tracked_joint: JointTriple,
    /// Acceptable range for the depth rule, if the exercise has one.
    pub correct_range: Option<AngleRange>,
    /// Start / end thresholds for rep detection.
    pub phase: PhaseThresholds,
    /// Form rules; all must pass for form to be correct.
    #[serde(skip)]
    pub rules: &'static [FormRule],
    /// Instructional cues shown when the exercise is selected.
    pub instructions: &'static [&'static str],
}

impl ExerciseProfile {
    /// Current tracked angle for this profile, NaN if undefined.
    #[must_use]
    pub fn tracked_angle(&self, keypoints: &KeypointSet) -> f32 {
        self.tracked_joint.angle(keypoints)
    }
}

const LEFT_KNEE: JointTriple = JointTriple::new("left_knee", LeftHip, LeftKnee, LeftAnkle);
const LEFT_ELBOW: JointTriple = JointTriple::new("left_elbow", LeftShoulder, LeftElbow, LeftWrist);
const RIGHT_ELBOW: JointTriple =
    JointTriple::new("right_elbow", RightShoulder, RightElbow, RightWrist);

/// The registry. Indexed by `Exercise as usize`.
pub static PROFILES: [ExerciseProfile; 3] = [
    ExerciseProfile {
        exercise: Exercise::Squat,
        id: "squat",
        display_name: "Squat",
        tracked_joint: LEFT_KNEE,
        correct_range: Some(AngleRange::new(90.0, 110.0)),
        phase: PhaseThresholds {
            start: 160.0,
            end: 120.0,
        },
        rules: &[
            FormRule::JointAngleInRange {
                joints: &[LEFT_KNEE],
                label: "knees",
                hint: "Adjust squat depth",
            },
            FormRule::BackUpright,
            FormRule::KneesBehindToes,
        ],
        instructions: &[
            "Keep your back straight",
            "Knees should not go beyond toes",
            "Lower until thighs are parallel to ground",
            "Keep weight in your heels",
        ],
    },
    ExerciseProfile {
        exercise: Exercise::PushUp,
        id: "pushup",
        display_name: "Push-up",
        tracked_joint: LEFT_ELBOW,
        correct_range: Some(AngleRange::new(80.0, 100.0)),
        phase: PhaseThresholds {
            start: 160.0,
            end: 110.0,
        },
        rules: &[
            FormRule::JointAngleInRange {
                joints: &[LEFT_ELBOW, RIGHT_ELBOW],
                label: "elbows",
                hint: "Adjust elbow bend",
            },
            FormRule::BodyLine,
        ],
        instructions: &[
            "Keep your body in a straight line",
            "Lower until elbows are at 90 degrees",
            "Keep core engaged",
            "Eyes forward, not down",
        ],
    },
    ExerciseProfile {
        exercise: Exercise::BicepCurl,
        id: "bicep_curl",
        display_name: "Bicep Curl",
        tracked_joint: RIGHT_ELBOW,
        correct_range: None,
        phase: PhaseThresholds {
            start: 150.0,
            end: 70.0,
        },
        rules: &[FormRule::ElbowsFixed, FormRule::WristsStraight],
        instructions: &[
            "Keep your elbows fixed at your sides",
            "Don't swing your body",
            "Full range of motion - extend arms fully and curl all the way up",
            "Keep wrists straight throughout the movement",
        ],
    },
];

/// All registered profiles.
#[must_use]
pub fn profiles() -> &'static [ExerciseProfile] {
    &PROFILES
}

/// Looks up a profile by identifier, ignoring ASCII case.
///
/// # Errors
///
/// Returns [`EngineError::ProfileNotFound`](crate::EngineError::ProfileNotFound)
/// for unknown identifiers.
pub fn lookup(id: &str) -> EngineResult<&'static ExerciseProfile> {
    id.parse::<Exercise>().map(Exercise::profile)
}
