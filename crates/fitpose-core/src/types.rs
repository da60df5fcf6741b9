//! Core data types for the FitPose system.
//!
//! This module defines the structures that carry one detected person's
//! skeleton from the upstream pose model into the exercise engine.
//!
//! # Type Categories
//!
//! - **Geometry Types**: [`Point2`]
//! - **Pose Types**: [`KeypointSet`], [`Keypoint`], [`KeypointType`]
//! - **Common Types**: [`Confidence`]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::{DEFAULT_CONFIDENCE_THRESHOLD, MAX_KEYPOINTS};

// =============================================================================
// Common Types
// =============================================================================

/// Confidence score in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Confidence(f32);

impl Confidence {
    /// Creates a new confidence value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range [0.0, 1.0].
    pub fn new(value: f32) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CoreError::validation(format!(
                "Confidence must be in [0.0, 1.0], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the raw confidence value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Returns `true` if the confidence exceeds the default threshold.
    #[must_use]
    pub fn is_high(&self) -> bool {
        self.0 >= DEFAULT_CONFIDENCE_THRESHOLD
    }

    /// Maximum confidence (1.0).
    pub const MAX: Self = Self(1.0);

    /// Minimum confidence (0.0).
    pub const MIN: Self = Self(0.0);
}

impl Default for Confidence {
    fn default() -> Self {
        Self::MAX
    }
}

// =============================================================================
// Geometry Types
// =============================================================================

/// A 2-D position in pixel or normalized image coordinates.
///
/// Image convention: `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2 {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate (down is positive)
    pub y: f32,
}

impl Point2 {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

// =============================================================================
// Pose Types
// =============================================================================

/// Types of body keypoints following COCO format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum KeypointType {
    /// Nose
    Nose = 0,
    /// Left eye
    LeftEye = 1,
    /// Right eye
    RightEye = 2,
    /// Left ear
    LeftEar = 3,
    /// Right ear
    RightEar = 4,
    /// Left shoulder
    LeftShoulder = 5,
    /// Right shoulder
    RightShoulder = 6,
    /// Left elbow
    LeftElbow = 7,
    /// Right elbow
    RightElbow = 8,
    /// Left wrist
    LeftWrist = 9,
    /// Right wrist
    RightWrist = 10,
    /// Left hip
    LeftHip = 11,
    /// Right hip
    RightHip = 12,
    /// Left knee
    LeftKnee = 13,
    /// Right knee
    RightKnee = 14,
    /// Left ankle
    LeftAnkle = 15,
    /// Right ankle
    RightAnkle = 16,
}

impl KeypointType {
    /// Returns all keypoint types in skeleton order.
    #[must_use]
    pub fn all() -> &'static [Self; MAX_KEYPOINTS] {
        &[
            Self::Nose,
            Self::LeftEye,
            Self::RightEye,
            Self::LeftEar,
            Self::RightEar,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }

    /// Returns the skeleton index of this keypoint.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the keypoint name as a string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl TryFrom<u8> for KeypointType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::all()
            .get(usize::from(value))
            .copied()
            .ok_or(CoreError::InvalidKeypointIndex { index: value })
    }
}

impl std::fmt::Display for KeypointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single body keypoint with position and confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    /// Type of keypoint
    pub keypoint_type: KeypointType,
    /// X coordinate (normalized 0.0-1.0 or absolute pixels)
    pub x: f32,
    /// Y coordinate (normalized 0.0-1.0 or absolute pixels)
    pub y: f32,
    /// Z coordinate (depth, if the model produces one)
    pub z: Option<f32>,
    /// Detection confidence
    pub confidence: Confidence,
}

impl Keypoint {
    /// Creates a new 2D keypoint.
    #[must_use]
    pub fn new(keypoint_type: KeypointType, x: f32, y: f32, confidence: Confidence) -> Self {
        Self {
            keypoint_type,
            x,
            y,
            z: None,
            confidence,
        }
    }

    /// Creates a new 3D keypoint. Depth is carried but ignored by the
    /// planar angle rules.
    #[must_use]
    pub fn new_3d(
        keypoint_type: KeypointType,
        x: f32,
        y: f32,
        z: f32,
        confidence: Confidence,
    ) -> Self {
        Self {
            keypoint_type,
            x,
            y,
            z: Some(z),
            confidence,
        }
    }

    /// Returns the 2D position.
    #[must_use]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns `true` if this keypoint should be considered visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.confidence.is_high()
    }
}

/// All keypoints of one detected person in one frame, indexed by the
/// COCO-17 convention.
///
/// A `KeypointSet` always holds exactly [`MAX_KEYPOINTS`] points; the
/// constructors reject shorter inputs so that an incomplete skeleton can
/// never reach the form rules.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeypointSet {
    keypoints: [Keypoint; MAX_KEYPOINTS],
}

impl KeypointSet {
    /// Builds a set from `(x, y)` pairs in skeleton order, all at full
    /// confidence. Points past the 17th are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InsufficientKeypoints`] if fewer than 17 pairs
    /// are supplied.
    pub fn from_xy(points: &[(f32, f32)]) -> CoreResult<Self> {
        Self::check_len(points.len())?;
        Ok(Self {
            keypoints: std::array::from_fn(|i| {
                let (x, y) = points[i];
                Keypoint::new(KeypointType::all()[i], x, y, Confidence::MAX)
            }),
        })
    }

    /// Builds a set from `(x, y, confidence)` triples in skeleton order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InsufficientKeypoints`] for short inputs and
    /// [`CoreError::Validation`] for a confidence outside [0, 1].
    pub fn from_xy_confidence(points: &[(f32, f32, f32)]) -> CoreResult<Self> {
        Self::check_len(points.len())?;
        let mut keypoints = [Keypoint::new(KeypointType::Nose, 0.0, 0.0, Confidence::MAX);
            MAX_KEYPOINTS];
        for (slot, (&kind, &(x, y, c))) in keypoints
            .iter_mut()
            .zip(KeypointType::all().iter().zip(points))
        {
            *slot = Keypoint::new(kind, x, y, Confidence::new(c)?);
        }
        Ok(Self { keypoints })
    }

    /// Builds a set from keypoints in any order, placing each by its type.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first skeleton slot that
    /// was not supplied.
    pub fn from_keypoints(keypoints: impl IntoIterator<Item = Keypoint>) -> CoreResult<Self> {
        let mut slots: [Option<Keypoint>; MAX_KEYPOINTS] = [None; MAX_KEYPOINTS];
        for kp in keypoints {
            slots[kp.keypoint_type.index()] = Some(kp);
        }
        let mut placed = [Keypoint::new(KeypointType::Nose, 0.0, 0.0, Confidence::MAX);
            MAX_KEYPOINTS];
        for (i, slot) in slots.iter().enumerate() {
            match slot {
                Some(kp) => placed[i] = *kp,
                None => {
                    return Err(CoreError::validation(format!(
                        "missing keypoint: {}",
                        KeypointType::all()[i]
                    )))
                }
            }
        }
        Ok(Self { keypoints: placed })
    }

    fn check_len(actual: usize) -> CoreResult<()> {
        if actual < MAX_KEYPOINTS {
            return Err(CoreError::InsufficientKeypoints {
                expected: MAX_KEYPOINTS,
                actual,
            });
        }
        Ok(())
    }

    /// Gets a keypoint by type.
    #[must_use]
    pub fn get(&self, keypoint_type: KeypointType) -> &Keypoint {
        &self.keypoints[keypoint_type.index()]
    }

    /// Gets the 2D position of a keypoint.
    #[must_use]
    pub fn point(&self, keypoint_type: KeypointType) -> Point2 {
        self.get(keypoint_type).position()
    }

    /// Midpoint between two keypoints, e.g. the shoulder center.
    #[must_use]
    pub fn midpoint(&self, a: KeypointType, b: KeypointType) -> Point2 {
        self.point(a).midpoint(&self.point(b))
    }

    /// Distance between the two shoulders, used as a body-scale reference.
    #[must_use]
    pub fn shoulder_width(&self) -> f32 {
        self.point(KeypointType::LeftShoulder)
            .distance_to(&self.point(KeypointType::RightShoulder))
    }

    /// Moves one keypoint, keeping its confidence.
    pub fn set_point(&mut self, keypoint_type: KeypointType, point: Point2) {
        let kp = &mut self.keypoints[keypoint_type.index()];
        kp.x = point.x;
        kp.y = point.y;
    }

    /// Returns a copy with one keypoint moved.
    #[must_use]
    pub fn with_point(mut self, keypoint_type: KeypointType, point: Point2) -> Self {
        self.set_point(keypoint_type, point);
        self
    }

    /// Iterates over all keypoints in skeleton order.
    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter()
    }

    /// Returns the number of visible keypoints.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.keypoints.iter().filter(|kp| kp.is_visible()).count()
    }
}
