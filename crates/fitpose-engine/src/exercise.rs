//! The closed set of supported exercises.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::profile::{ExerciseProfile, PROFILES};

/// A supported exercise. Each variant owns exactly one entry in the profile
/// registry, which supplies all of its numeric parameters and form rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exercise {
    /// Bodyweight squat, tracked at the left knee.
    #[serde(rename = "squat")]
    Squat,
    /// Push-up, tracked at the left elbow.
    #[serde(rename = "pushup")]
    PushUp,
    /// Standing bicep curl, tracked at the right elbow.
    #[serde(rename = "bicep_curl")]
    BicepCurl,
}

impl Exercise {
    /// All supported exercises, in registry order.
    pub const ALL: [Exercise; 3] = [Exercise::Squat, Exercise::PushUp, Exercise::BicepCurl];

    /// Canonical identifier as accepted by [`FromStr`].
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Exercise::Squat => "squat",
            Exercise::PushUp => "pushup",
            Exercise::BicepCurl => "bicep_curl",
        }
    }

    /// The immutable profile for this exercise.
    #[must_use]
    pub fn profile(self) -> &'static ExerciseProfile {
        &PROFILES[self as usize]
    }
}

impl FromStr for Exercise {
    type Err = EngineError;

    /// Parses an exercise identifier, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exercise::ALL
            .into_iter()
            .find(|exercise| exercise.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::profile_not_found(s))
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
