//! # FitPose Engine
//!
//! Repetition counting and form evaluation over per-frame COCO-17 keypoints.
//!
//! The engine is a pure, synchronous core. Pose inference, capture and
//! transport live elsewhere and hand it one [`KeypointSet`](fitpose_core::KeypointSet)
//! per frame (or `None` when nobody was detected).
//!
//! ## Modules
//!
//! - [`profile`]: the read-only exercise profile registry
//! - [`form`]: rule-based form evaluation
//! - [`phase`]: the start/end rep phase machine, gated on sustained good form
//! - [`session`]: per-stream orchestration producing [`FrameResult`]s
//! - [`config`]: tunable thresholds, loadable from JSON
//!
//! ## Example
//!
//! ```rust
//! use fitpose_core::KeypointSet;
//! use fitpose_engine::{EngineConfig, Session};
//!
//! let mut session = Session::new(EngineConfig::default()).unwrap();
//! session.select_exercise("bicep_curl").unwrap();
//!
//! let points: Vec<(f32, f32)> = vec![(0.0, 0.0); 17];
//! let frame = KeypointSet::from_xy(&points).unwrap();
//! let result = session.process_frame(Some(&frame));
//!
//! // All-zero keypoints have no measurable angles.
//! assert!(!result.form_correct);
//! assert_eq!(result.rep_count, 0);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod exercise;
pub mod form;
pub mod phase;
pub mod profile;
pub mod session;

#[cfg(test)]
mod fixtures;

pub use config::{DepthCheck, EngineConfig, FormThresholds};
pub use error::{ConfigError, EngineError, EngineResult};
pub use exercise::Exercise;
pub use form::{evaluate, FormEvaluator, FormRule, FormVerdict, JointAngle};
pub use phase::{RepPhase, RepTracker, TrackerEvent};
pub use profile::{lookup, profiles, AngleRange, ExerciseProfile, JointTriple, PhaseThresholds};
pub use session::{FormStatus, FrameResult, Session, SessionState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
