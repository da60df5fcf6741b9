//! Error types for the FitPose exercise engine.
//!
//! ## Hierarchy
//!
//! ```text
//! EngineError (top-level)
//! ├── ProfileNotFound  (unknown exercise identifier, recoverable)
//! ├── ConfigError      (config validation / file loading)
//! └── CoreError        (malformed keypoint input)
//! ```
//!
//! Degenerate geometry and missing detections are not errors: the first
//! surfaces as a NaN angle and failed form, the second replays the previous
//! frame result.

use std::path::PathBuf;

use fitpose_core::CoreError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// EngineResult
// ---------------------------------------------------------------------------

/// Convenient `Result` alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Top-level error type for the exercise engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested exercise has no registered profile. Session state is
    /// left untouched when this is returned.
    #[error("Exercise profile not found: '{id}'")]
    ProfileNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// A configuration validation or loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed keypoint input.
    #[error("Keypoint error: {0}")]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Construct a [`EngineError::ProfileNotFound`].
    pub fn profile_not_found(id: impl Into<String>) -> Self {
        EngineError::ProfileNotFound { id: id.into() }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors produced when loading or validating an [`EngineConfig`].
///
/// [`EngineConfig`]: crate::config::EngineConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read or written.
    #[error("Cannot access config file `{path}`: {source}")]
    FileRead {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file contains malformed JSON.
    #[error("Cannot parse config file `{path}`: {source}")]
    ParseError {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
