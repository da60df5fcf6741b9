//! # FitPose Core
//!
//! Core types, errors, and joint geometry for the FitPose exercise engine.
//!
//! This crate provides the foundational building blocks shared by the
//! engine and the command-line tools:
//!
//! - **Core Data Types**: [`KeypointSet`], [`Keypoint`], [`KeypointType`],
//!   [`Point2`] and [`Confidence`] for representing one detected person's
//!   skeleton in one frame (COCO-17 ordering).
//!
//! - **Error Types**: [`CoreError`] for malformed keypoint input.
//!
//! - **Geometry**: [`geometry::angle_at`] and friends, which never fail and
//!   report degenerate configurations as NaN.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization via serde
//!
//! ## Example
//!
//! ```rust
//! use fitpose_core::{geometry::angle_at, KeypointSet, KeypointType};
//!
//! let mut points: Vec<(f32, f32)> = vec![(0.0, 0.0); 17];
//! points[11] = (100.0, 100.0); // left hip
//! points[13] = (100.0, 200.0); // left knee
//! points[15] = (100.0, 300.0); // left ankle
//!
//! let set = KeypointSet::from_xy(&points).unwrap();
//! let knee = angle_at(
//!     set.point(KeypointType::LeftHip),
//!     set.point(KeypointType::LeftKnee),
//!     set.point(KeypointType::LeftAnkle),
//! );
//! assert!((knee - 180.0).abs() < 1e-3);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{CoreError, CoreResult};
pub use types::{Confidence, Keypoint, KeypointSet, KeypointType, Point2};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of keypoints per person (COCO format)
pub const MAX_KEYPOINTS: usize = 17;

/// Default confidence threshold for keypoint visibility
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Prelude module for convenient imports.
///
/// ```rust
/// use fitpose_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::geometry::angle_at;
    pub use crate::types::{Confidence, Keypoint, KeypointSet, KeypointType, Point2};
}
