//! Form evaluation.
//!
//! A profile lists its [`FormRule`]s; the [`FormEvaluator`] runs every rule
//! against one frame's keypoints and folds the outcomes into a
//! [`FormVerdict`]. Rules are independent: each failing rule appends its own
//! corrective feedback, and form is correct only when none fail.
//!
//! Any measurement that comes out NaN (a zero-length limb segment, a
//! non-finite coordinate) fails its rule with an "indeterminate" message
//! rather than passing silently.

use fitpose_core::{
    geometry::{angle_at, deviation_from_straight, underside_angle_at},
    KeypointSet, KeypointType, Point2,
};
use serde::Serialize;

use crate::config::{DepthCheck, EngineConfig, FormThresholds};
use crate::error::EngineResult;
use crate::profile::{lookup, ExerciseProfile, JointTriple};

use KeypointType::{
    LeftAnkle, LeftElbow, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightElbow,
    RightHip, RightKnee, RightShoulder, RightWrist,
};

/// A named angle measured while evaluating a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointAngle {
    /// Measurement name, e.g. `left_knee`, `back`, `body_line`.
    pub joint: &'static str,
    /// Angle in degrees, NaN if undefined.
    pub degrees: f32,
}

/// Outcome of evaluating one frame against a profile's rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormVerdict {
    /// `true` when every rule passed.
    pub form_correct: bool,
    /// One entry per failure, in rule order. Empty when form is correct.
    pub feedback: Vec<String>,
    /// Every angle the rules measured, in rule order.
    pub angles: Vec<JointAngle>,
}

impl FormVerdict {
    fn passing() -> Self {
        FormVerdict {
            form_correct: true,
            feedback: Vec::new(),
            angles: Vec::new(),
        }
    }

    fn record(&mut self, joint: &'static str, degrees: f32) {
        self.angles.push(JointAngle { joint, degrees });
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.form_correct = false;
        self.feedback.push(message.into());
    }

    fn indeterminate(&mut self, what: &str) {
        self.fail(format!("Could not measure {}", what.replace('_', " ")));
    }
}

/// A single posture rule. Numeric limits come from the profile (angle
/// ranges) or from [`FormThresholds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormRule {
    /// The mean angle of `joints` must lie in the profile's correct range.
    JointAngleInRange {
        /// Joints averaged together.
        joints: &'static [JointTriple],
        /// Plural body-part label used in feedback, e.g. `knees`.
        label: &'static str,
        /// Corrective cue prefix, e.g. `Adjust squat depth`.
        hint: &'static str,
    },
    /// Torso angle against a vertical reference below the hip must not
    /// drop under `back_upright_min_deg`.
    BackUpright,
    /// Neither knee may pass its ankle horizontally by more than
    /// `knee_over_toe_px`.
    KneesBehindToes,
    /// Shoulder-hip-ankle must stay within `body_line_tolerance_deg` of a
    /// straight line, in either direction.
    BodyLine,
    /// Each elbow must stay within `elbow_drift_px` horizontally of its
    /// shoulder.
    ElbowsFixed,
    /// Each forearm, measured against a horizontal reference at the wrist,
    /// must stay within `wrist_tolerance_deg` of straight.
    WristsStraight,
}

struct RuleContext<'a> {
    profile: &'a ExerciseProfile,
    keypoints: &'a KeypointSet,
    thresholds: &'a FormThresholds,
    depth_check: DepthCheck,
    /// Multiplier for pixel tolerances; `None` when the body scale could not
    /// be measured.
    pixel_scale: Option<f32>,
}

impl RuleContext<'_> {
    fn point(&self, kind: KeypointType) -> Point2 {
        self.keypoints.point(kind)
    }
}

impl FormRule {
    fn apply(&self, ctx: &RuleContext<'_>, verdict: &mut FormVerdict) {
        let t = ctx.thresholds;
        match *self {
            FormRule::JointAngleInRange {
                joints,
                label,
                hint,
            } => {
                let Some(range) = ctx.profile.correct_range else {
                    return;
                };
                let mut sum = 0.0;
                for joint in joints {
                    let angle = joint.angle(ctx.keypoints);
                    verdict.record(joint.name, angle);
                    if angle.is_nan() {
                        verdict.indeterminate(&format!("{} angle", joint.name));
                        return;
                    }
                    sum += angle;
                }
                if ctx.depth_check == DepthCheck::AtBottom
                    && !ctx
                        .profile
                        .phase
                        .in_end_region(ctx.profile.tracked_angle(ctx.keypoints))
                {
                    return;
                }
                let mean = sum / joints.len().max(1) as f32;
                if !range.contains(mean) {
                    verdict.fail(format!(
                        "{hint} - {label} should be at {:.0}-{:.0} degrees (current {mean:.1}°)",
                        range.min, range.max
                    ));
                }
            }

            FormRule::BackUpright => {
                let shoulders = ctx.keypoints.midpoint(LeftShoulder, RightShoulder);
                let hips = ctx.keypoints.midpoint(LeftHip, RightHip);
                let below_hip = ctx.point(LeftHip).offset(0.0, t.reference_offset_px);
                let back = angle_at(shoulders, hips, below_hip);
                verdict.record("back", back);
                if back.is_nan() {
                    verdict.indeterminate("back angle");
                } else if back < t.back_upright_min_deg {
                    verdict.fail("Keep your back more upright");
                }
            }

            FormRule::KneesBehindToes => {
                let Some(scale) = ctx.pixel_scale else {
                    verdict.indeterminate("shoulder width");
                    return;
                };
                let tolerance = t.knee_over_toe_px * scale;
                let mut past_toes = false;
                for (knee, ankle) in [(LeftKnee, LeftAnkle), (RightKnee, RightAnkle)] {
                    let (knee, ankle) = (ctx.point(knee), ctx.point(ankle));
                    if !(knee.is_finite() && ankle.is_finite()) {
                        verdict.indeterminate("knee position");
                        return;
                    }
                    past_toes |= knee.x > ankle.x + tolerance;
                }
                if past_toes {
                    verdict.fail("Keep knees behind toes");
                }
            }

            FormRule::BodyLine => {
                let line = underside_angle_at(
                    ctx.keypoints.midpoint(LeftShoulder, RightShoulder),
                    ctx.keypoints.midpoint(LeftHip, RightHip),
                    ctx.keypoints.midpoint(LeftAnkle, RightAnkle),
                );
                verdict.record("body_line", line);
                if line.is_nan() {
                    verdict.indeterminate("body line angle");
                } else if line < 180.0 - t.body_line_tolerance_deg {
                    verdict.fail("Hips too low - keep body straight");
                } else if line > 180.0 + t.body_line_tolerance_deg {
                    verdict.fail("Hips too high - lower your body");
                }
            }

            FormRule::ElbowsFixed => {
                let Some(scale) = ctx.pixel_scale else {
                    verdict.indeterminate("shoulder width");
                    return;
                };
                let tolerance = t.elbow_drift_px * scale;
                for (side, elbow, shoulder) in [
                    ("left", LeftElbow, LeftShoulder),
                    ("right", RightElbow, RightShoulder),
                ] {
                    let drift = (ctx.point(elbow).x - ctx.point(shoulder).x).abs();
                    if drift.is_nan() {
                        verdict.indeterminate(&format!("{side} elbow position"));
                    } else if drift > tolerance {
                        verdict.fail(format!("Keep {side} elbow fixed at your side"));
                    }
                }
            }

            FormRule::WristsStraight => {
                let mut bent = false;
                for (name, elbow, wrist) in [
                    ("left_wrist", LeftElbow, LeftWrist),
                    ("right_wrist", RightElbow, RightWrist),
                ] {
                    let wrist = ctx.point(wrist);
                    let beside = wrist.offset(t.reference_offset_px, 0.0);
                    let angle = angle_at(ctx.point(elbow), wrist, beside);
                    verdict.record(name, angle);
                    if angle.is_nan() {
                        verdict.indeterminate(&format!("{name} angle"));
                    } else {
                        bent |= deviation_from_straight(angle) > t.wrist_tolerance_deg;
                    }
                }
                if bent {
                    verdict.fail("Keep wrists straight");
                }
            }
        }
    }
}

/// Runs a profile's form rules with a fixed set of thresholds.
#[derive(Debug, Clone)]
pub struct FormEvaluator {
    thresholds: FormThresholds,
    depth_check: DepthCheck,
}

impl FormEvaluator {
    /// Creates an evaluator from the engine configuration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        FormEvaluator {
            thresholds: config.thresholds.clone(),
            depth_check: config.depth_check,
        }
    }

    /// Evaluates one frame against every rule of `profile`.
    #[must_use]
    pub fn evaluate(&self, profile: &ExerciseProfile, keypoints: &KeypointSet) -> FormVerdict {
        let ctx = RuleContext {
            profile,
            keypoints,
            thresholds: &self.thresholds,
            depth_check: self.depth_check,
            pixel_scale: self.pixel_scale(keypoints),
        };
        let mut verdict = FormVerdict::passing();
        for rule in profile.rules {
            rule.apply(&ctx, &mut verdict);
        }
        verdict
    }

    fn pixel_scale(&self, keypoints: &KeypointSet) -> Option<f32> {
        match self.thresholds.reference_shoulder_width_px {
            None => Some(1.0),
            Some(reference) => {
                let width = keypoints.shoulder_width();
                (width.is_finite() && width > 0.0).then(|| width / reference)
            }
        }
    }
}

impl Default for FormEvaluator {
    fn default() -> Self {
        FormEvaluator::new(&EngineConfig::default())
    }
}

/// Evaluates `keypoints` for the exercise named `exercise_id` using the
/// default thresholds.
///
/// # Errors
///
/// Returns [`EngineError::ProfileNotFound`](crate::EngineError::ProfileNotFound)
/// if `exercise_id` is not registered.
pub fn evaluate(exercise_id: &str, keypoints: &KeypointSet) -> EngineResult<FormVerdict> {
    let profile = lookup(exercise_id)?;
    Ok(FormEvaluator::default().evaluate(profile, keypoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::Exercise;

    #[test]
    fn squat_at_depth_passes() {
        let verdict = evaluate("squat", &fixtures::squat(100.0)).unwrap();
        assert!(verdict.form_correct, "{:?}", verdict.feedback);
        assert!(verdict.feedback.is_empty());
        assert!(verdict.angles.iter().any(|a| a.joint == "left_knee"));
        assert!(verdict.angles.iter().any(|a| a.joint == "back"));
    }

    #[test]
    fn squat_standing_fails_depth_by_default() {
        let verdict = evaluate("squat", &fixtures::squat(170.0)).unwrap();
        assert!(!verdict.form_correct);
        assert_eq!(verdict.feedback.len(), 1);
        assert!(verdict.feedback[0].starts_with("Adjust squat depth"));
    }

    #[test]
    fn squat_depth_only_at_bottom() {
        let config = EngineConfig {
            depth_check: DepthCheck::AtBottom,
            ..EngineConfig::default()
        };
        let evaluator = FormEvaluator::new(&config);
        let squat = Exercise::Squat.profile();

        assert!(evaluator.evaluate(squat, &fixtures::squat(170.0)).form_correct);
        assert!(evaluator.evaluate(squat, &fixtures::squat(100.0)).form_correct);
        // Below the end threshold but shallower than the range.
        assert!(!evaluator.evaluate(squat, &fixtures::squat(115.0)).form_correct);
    }

    #[test]
    fn squat_knees_past_toes() {
        let kp = fixtures::squat(100.0);
        let ankle = kp.point(RightAnkle);
        let kp = kp.with_point(RightKnee, Point2::new(ankle.x + 25.0, ankle.y - 80.0));
        let verdict = evaluate("squat", &kp).unwrap();
        assert!(!verdict.form_correct);
        assert!(verdict.feedback.contains(&"Keep knees behind toes".to_string()));
    }

    #[test]
    fn squat_back_folded_forward() {
        // Shoulders below the hips: torso pointing down towards the reference.
        let kp = fixtures::squat(100.0)
            .with_point(LeftShoulder, Point2::new(160.0, 520.0))
            .with_point(RightShoulder, Point2::new(240.0, 520.0));
        let verdict = evaluate("squat", &kp).unwrap();
        assert!(verdict.feedback.contains(&"Keep your back more upright".to_string()));
    }

    #[test]
    fn multiple_failures_accumulate() {
        let kp = fixtures::squat(170.0)
            .with_point(LeftShoulder, Point2::new(160.0, 520.0))
            .with_point(RightShoulder, Point2::new(240.0, 520.0));
        let verdict = evaluate("squat", &kp).unwrap();
        assert_eq!(verdict.feedback.len(), 2);
    }

    #[test]
    fn pushup_straight_body_at_bottom_passes() {
        let verdict = evaluate("pushup", &fixtures::pushup(90.0, 0.0)).unwrap();
        assert!(verdict.form_correct, "{:?}", verdict.feedback);
    }

    #[test]
    fn pushup_hips_sagging() {
        let verdict = evaluate("pushup", &fixtures::pushup(90.0, 30.0)).unwrap();
        assert!(!verdict.form_correct);
        assert_eq!(verdict.feedback, vec!["Hips too low - keep body straight".to_string()]);
    }

    #[test]
    fn pushup_hips_piked() {
        let verdict = evaluate("pushup", &fixtures::pushup(90.0, -30.0)).unwrap();
        assert_eq!(verdict.feedback, vec!["Hips too high - lower your body".to_string()]);
    }

    #[test]
    fn pushup_elbow_out_of_range_reports_current_angle() {
        let verdict = evaluate("pushup", &fixtures::pushup(130.0, 0.0)).unwrap();
        assert!(!verdict.form_correct);
        assert!(verdict.feedback[0].contains("elbows should be at 80-100 degrees"));
        assert!(verdict.feedback[0].contains("130.0"));
    }

    #[test]
    fn curl_good_form() {
        let verdict = evaluate("bicep_curl", &fixtures::curl()).unwrap();
        assert!(verdict.form_correct, "{:?}", verdict.feedback);
        assert!(verdict.feedback.is_empty());
    }

    #[test]
    fn curl_elbow_drift_names_side() {
        let kp = fixtures::curl();
        let shoulder = kp.point(LeftShoulder);
        let elbow = kp.point(LeftElbow);
        let kp = kp.with_point(LeftElbow, Point2::new(shoulder.x - 45.0, elbow.y));
        let verdict = evaluate("bicep_curl", &kp).unwrap();
        assert!(!verdict.form_correct);
        assert!(verdict.feedback.contains(&"Keep left elbow fixed at your side".to_string()));
        assert!(!verdict.feedback.iter().any(|f| f.contains("right elbow")));
    }

    #[test]
    fn curl_bent_wrist() {
        let kp = fixtures::curl();
        let wrist = kp.point(RightWrist);
        let kp = kp.with_point(RightElbow, Point2::new(wrist.x, wrist.y + 60.0));
        let verdict = evaluate("bicep_curl", &kp).unwrap();
        assert!(verdict.feedback.contains(&"Keep wrists straight".to_string()));
    }

    #[test]
    fn degenerate_limb_is_indeterminate() {
        let kp = fixtures::squat(100.0);
        let knee = kp.point(LeftKnee);
        let kp = kp.with_point(LeftHip, knee);
        let verdict = evaluate("squat", &kp).unwrap();
        assert!(!verdict.form_correct);
        assert!(verdict.feedback.contains(&"Could not measure left knee angle".to_string()));
    }

    #[test]
    fn nan_coordinate_fails_pixel_rule() {
        let kp = fixtures::curl().with_point(RightElbow, Point2::new(f32::NAN, 200.0));
        let verdict = evaluate("bicep_curl", &kp).unwrap();
        assert!(!verdict.form_correct);
        assert!(verdict.feedback.contains(&"Could not measure right elbow position".to_string()));
    }

    #[test]
    fn pixel_tolerance_scales_with_body() {
        let mut config = EngineConfig::default();
        // Fixture shoulders are 100 px apart: tuned at 50 px, tolerance doubles.
        config.thresholds.reference_shoulder_width_px = Some(50.0);
        let evaluator = FormEvaluator::new(&config);

        let kp = fixtures::curl();
        let shoulder = kp.point(LeftShoulder);
        let elbow = kp.point(LeftElbow);
        let kp = kp.with_point(LeftElbow, Point2::new(shoulder.x - 45.0, elbow.y));

        assert!(evaluator.evaluate(Exercise::BicepCurl.profile(), &kp).form_correct);
        assert!(!FormEvaluator::default().evaluate(Exercise::BicepCurl.profile(), &kp).form_correct);
    }

    #[test]
    fn unknown_exercise_is_rejected() {
        assert!(evaluate("lunges", &fixtures::curl()).is_err());
    }
}
