//! Engine configuration.
//!
//! [`EngineConfig`] holds every tunable the form rules and the rep tracker
//! read. The angle and pixel thresholds are empirical, resolution-dependent
//! values rather than physical constants; the defaults suit typical webcam
//! framing and can be overridden from a JSON file.
//!
//! # Example
//!
//! ```rust
//! use fitpose_engine::config::EngineConfig;
//!
//! let cfg = EngineConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.min_dwell_frames, 30);
//! assert_eq!(cfg.thresholds.knee_over_toe_px, 20.0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// DepthCheck
// ---------------------------------------------------------------------------

/// When the profile's angle-range rule is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthCheck {
    /// Every frame must have the tracked joint inside the profile range.
    #[default]
    Always,
    /// The range is only enforced once the tracked angle is below the
    /// profile's end threshold, i.e. at the bottom of the movement.
    AtBottom,
}

// ---------------------------------------------------------------------------
// FormThresholds
// ---------------------------------------------------------------------------

/// Auxiliary posture thresholds used by the form rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormThresholds {
    /// Minimum torso angle against the vertical reference below the hip.
    /// Default: **45°**.
    pub back_upright_min_deg: f32,

    /// How far a knee may pass its ankle horizontally. Default: **20 px**.
    pub knee_over_toe_px: f32,

    /// Allowed deviation of the shoulder-hip-ankle line from 180° on either
    /// side. Default: **15°** (165°..195° band).
    pub body_line_tolerance_deg: f32,

    /// Allowed horizontal offset of an elbow from its shoulder.
    /// Default: **30 px**.
    pub elbow_drift_px: f32,

    /// Allowed deviation of the wrist angle from 180°. Default: **30°**.
    pub wrist_tolerance_deg: f32,

    /// Distance of the synthetic reference points placed below the hip and
    /// beside the wrist. Default: **10 px**.
    pub reference_offset_px: f32,

    /// Shoulder width the pixel tolerances were tuned at. When set, pixel
    /// tolerances scale with the measured shoulder width of each frame.
    /// Default: **None** (absolute pixels).
    pub reference_shoulder_width_px: Option<f32>,
}

impl Default for FormThresholds {
    fn default() -> Self {
        FormThresholds {
            back_upright_min_deg: 45.0,
            knee_over_toe_px: 20.0,
            body_line_tolerance_deg: 15.0,
            elbow_drift_px: 30.0,
            wrist_tolerance_deg: 30.0,
            reference_offset_px: 10.0,
            reference_shoulder_width_px: None,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Complete configuration for an exercise tracking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Consecutive correct-form frames required before the rep tracker
    /// evaluates phase transitions. Default: **30** (about one second at
    /// 30 fps).
    pub min_dwell_frames: u32,

    /// Maximum number of feedback strings reported per frame. Default: **3**.
    pub max_feedback_items: usize,

    /// Scope of the profile angle-range rule. Default: [`DepthCheck::Always`].
    pub depth_check: DepthCheck,

    /// Posture thresholds for the auxiliary form rules.
    pub thresholds: FormThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_dwell_frames: 30,
            max_feedback_items: 3,
            depth_check: DepthCheck::Always,
            thresholds: FormThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load an [`EngineConfig`] from a JSON file at `path`. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the file cannot be opened,
    /// [`ConfigError::ParseError`] if the JSON is malformed and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: EngineConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize this configuration to pretty-printed JSON and write it to
    /// `path`, creating parent directories if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the directory cannot be created or
    /// the file cannot be written.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Validate all fields and return an error describing the first problem
    /// found.
    ///
    /// # Validated invariants
    ///
    /// - `min_dwell_frames` and `max_feedback_items` must be at least 1.
    /// - Angle thresholds must lie in `[0, 180]`.
    /// - Pixel tolerances must be finite and non-negative.
    /// - `reference_offset_px` must be strictly positive (a zero offset makes
    ///   every reference angle undefined).
    /// - `reference_shoulder_width_px`, when set, must be strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_dwell_frames == 0 {
            return Err(ConfigError::invalid_value("min_dwell_frames", "must be > 0"));
        }
        if self.max_feedback_items == 0 {
            return Err(ConfigError::invalid_value("max_feedback_items", "must be > 0"));
        }

        let t = &self.thresholds;
        for (field, value) in [
            ("back_upright_min_deg", t.back_upright_min_deg),
            ("body_line_tolerance_deg", t.body_line_tolerance_deg),
            ("wrist_tolerance_deg", t.wrist_tolerance_deg),
        ] {
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::invalid_value(field, "must be in [0, 180] degrees"));
            }
        }
        for (field, value) in [
            ("knee_over_toe_px", t.knee_over_toe_px),
            ("elbow_drift_px", t.elbow_drift_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid_value(field, "must be finite and >= 0.0"));
            }
        }
        if !t.reference_offset_px.is_finite() || t.reference_offset_px <= 0.0 {
            return Err(ConfigError::invalid_value(
                "reference_offset_px",
                "must be finite and > 0.0",
            ));
        }
        if let Some(width) = t.reference_shoulder_width_px {
            if !width.is_finite() || width <= 0.0 {
                return Err(ConfigError::invalid_value(
                    "reference_shoulder_width_px",
                    "must be finite and > 0.0 when set",
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
