//! Error types for the FitPose core crate.
//!
//! This module provides error handling using [`thiserror`] for automatic
//! `Display` and `Error` trait implementations.
//!
//! Degenerate geometry is not part of this hierarchy: a
//! zero-length ray yields a NaN angle rather than an error, see
//! [`crate::geometry::angle_at`].
//!
//! # Example
//!
//! ```rust
//! use fitpose_core::error::CoreError;
//! use fitpose_core::KeypointSet;
//!
//! let too_short = vec![(0.0_f32, 0.0_f32); 5];
//! let err = KeypointSet::from_xy(&too_short).unwrap_err();
//! assert!(matches!(err, CoreError::InsufficientKeypoints { expected: 17, actual: 5 }));
//! ```

use thiserror::Error;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Top-level error type for the FitPose core crate.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoreError {
    /// Validation error for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },

    /// A keypoint set carried fewer points than the skeleton requires
    #[error("Keypoint set too short: expected at least {expected} points, got {actual}")]
    InsufficientKeypoints {
        /// Number of keypoints required by the skeleton convention
        expected: usize,
        /// Number of keypoints actually supplied
        actual: usize,
    },

    /// Keypoint index outside the skeleton convention
    #[error("Invalid keypoint index: {index}")]
    InvalidKeypointIndex {
        /// The rejected index
        index: u8,
    },
}

impl CoreError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
