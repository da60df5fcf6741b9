//! Integration tests for [`fitpose_engine::Session`].
//!
//! Poses are synthetic and deterministic: joints are placed on exact angles
//! so every frame's tracked angle is known in advance.

use approx::assert_abs_diff_eq;
use fitpose_core::{KeypointSet, KeypointType, Point2};
use fitpose_engine::{
    DepthCheck, EngineConfig, EngineError, Exercise, FormStatus, RepPhase, Session,
};

use KeypointType::*;

// ---------------------------------------------------------------------------
// Pose helpers
// ---------------------------------------------------------------------------

fn blank() -> KeypointSet {
    KeypointSet::from_xy(&[(0.0, 0.0); 17]).unwrap()
}

/// Point `length` from `vertex` at `degrees` from the upward vertical.
fn bend(vertex: Point2, degrees: f32, length: f32) -> Point2 {
    let rad = degrees.to_radians();
    Point2::new(vertex.x + length * rad.sin(), vertex.y - length * rad.cos())
}

/// Side-view squat with the knees at `knee_angle`.
fn squat(knee_angle: f32) -> KeypointSet {
    let mut kp = blank()
        .with_point(LeftShoulder, Point2::new(195.0, 200.0))
        .with_point(RightShoulder, Point2::new(205.0, 200.0));
    for (hip, knee, ankle, x) in [
        (LeftHip, LeftKnee, LeftAnkle, 198.0),
        (RightHip, RightKnee, RightAnkle, 202.0),
    ] {
        let hip_at = Point2::new(x, 400.0);
        let knee_at = bend(hip_at, knee_angle, 100.0);
        kp.set_point(hip, hip_at);
        kp.set_point(knee, knee_at);
        kp.set_point(ankle, knee_at.offset(0.0, 100.0));
    }
    kp
}

/// Front-view curl with both elbows at `elbow_angle`, elbows under the
/// shoulders.
fn curl(elbow_angle: f32) -> KeypointSet {
    let mut kp = blank();
    for (shoulder, elbow, wrist, x) in [
        (LeftShoulder, LeftElbow, LeftWrist, 150.0),
        (RightShoulder, RightElbow, RightWrist, 250.0),
    ] {
        let elbow_at = Point2::new(x, 300.0);
        kp.set_point(shoulder, Point2::new(x, 200.0));
        kp.set_point(elbow, elbow_at);
        kp.set_point(wrist, bend(elbow_at, elbow_angle, 80.0));
    }
    kp
}

fn squat_session(dwell: u32) -> Session {
    Session::new(EngineConfig {
        min_dwell_frames: dwell,
        depth_check: DepthCheck::AtBottom,
        ..EngineConfig::default()
    })
    .expect("valid config")
}

fn curl_session(dwell: u32) -> Session {
    let mut config = EngineConfig {
        min_dwell_frames: dwell,
        ..EngineConfig::default()
    };
    // Forearms swing through vertical during a curl.
    config.thresholds.wrist_tolerance_deg = 180.0;
    let mut session = Session::new(config).expect("valid config");
    session.select_exercise("bicep_curl").unwrap();
    session
}

fn feed(session: &mut Session, pose: &KeypointSet, frames: usize) {
    for _ in 0..frames {
        session.process_frame(Some(pose));
    }
}

fn curl_reps(session: &mut Session, reps: usize) {
    let (extended, curled) = (curl(170.0), curl(40.0));
    for _ in 0..reps {
        feed(session, &extended, 1);
        feed(session, &curled, 1);
    }
    feed(session, &extended, 1);
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Plateaus of 30 frames: extended, extended, bottom, bottom, extended.
#[test]
fn squat_plateaus_count_one_rep() {
    let mut session = squat_session(30);
    session.select_exercise("squat").unwrap();

    for angle in [170.0, 170.0, 100.0, 100.0, 170.0] {
        feed(&mut session, &squat(angle), 30);
    }
    assert_eq!(session.state().rep_count(), 1);

    feed(&mut session, &squat(100.0), 30);
    feed(&mut session, &squat(170.0), 30);
    assert_eq!(session.state().rep_count(), 2);
}

/// With the depth range applied on every frame, standing is bad form and
/// the dwell-gated tracker never engages.
#[test]
fn squat_with_strict_depth_check_never_counts() {
    let mut session = Session::default();
    session.select_exercise("squat").unwrap();
    for angle in [170.0, 100.0, 170.0, 100.0, 170.0] {
        feed(&mut session, &squat(angle), 30);
    }
    assert_eq!(session.state().rep_count(), 0);
}

#[test]
fn curl_counts_with_dwell() {
    let mut session = curl_session(5);
    for _ in 0..3 {
        feed(&mut session, &curl(170.0), 5);
        feed(&mut session, &curl(40.0), 5);
    }
    feed(&mut session, &curl(170.0), 5);
    assert_eq!(session.state().rep_count(), 3);
}

#[test]
fn missing_detection_keeps_last_result() {
    let mut session = curl_session(1);
    curl_reps(&mut session, 3);
    let last = session.process_frame(Some(&curl(170.0)));
    assert_eq!(last.rep_count, 3);

    let missing = session.process_frame(None);
    assert_eq!(missing.rep_count, 3);
    assert_eq!(missing.phase, last.phase);
    assert_eq!(missing.feedback, last.feedback);
    assert_abs_diff_eq!(missing.tracked_angle, last.tracked_angle);

    // Still counting afterwards.
    curl_reps(&mut session, 1);
    assert_eq!(session.state().rep_count(), 4);
}

#[test]
fn reps_are_monotonic_while_selected() {
    let mut session = curl_session(2);
    let mut last = 0;
    let poses = [curl(170.0), curl(120.0), curl(40.0), curl(90.0), curl(160.0)];
    for (i, pose) in poses.iter().cycle().take(300).enumerate() {
        let frame = if i % 11 == 0 { None } else { Some(pose) };
        let result = session.process_frame(frame);
        assert!(result.rep_count >= last, "count went from {last} to {}", result.rep_count);
        last = result.rep_count;
    }
    assert!(last > 0);
}

#[test]
fn jitter_around_start_threshold_adds_nothing() {
    let mut session = squat_session(1);
    session.select_exercise("squat").unwrap();
    for angle in [170.0, 100.0, 170.0] {
        feed(&mut session, &squat(angle), 1);
    }
    assert_eq!(session.state().rep_count(), 1);

    for i in 0..100 {
        let angle = if i % 2 == 0 { 161.0 } else { 159.0 };
        feed(&mut session, &squat(angle), 1);
    }
    assert_eq!(session.state().rep_count(), 1);
    assert_eq!(session.state().phase(), RepPhase::Start);
}

// ---------------------------------------------------------------------------
// Selection and reset
// ---------------------------------------------------------------------------

#[test]
fn selection_is_case_insensitive() {
    for id in ["Squat", "squat", "SQUAT"] {
        let mut session = Session::default();
        session.select_exercise(id).unwrap();
        assert_eq!(session.state().exercise(), Some(Exercise::Squat));
    }
}

#[test]
fn unknown_exercise_leaves_state_untouched() {
    let mut session = curl_session(1);
    curl_reps(&mut session, 2);
    let feedback = session.state().feedback().to_vec();

    let err = session.select_exercise("lunges").unwrap_err();
    assert!(matches!(err, EngineError::ProfileNotFound { ref id } if id == "lunges"));
    assert_eq!(session.state().exercise(), Some(Exercise::BicepCurl));
    assert_eq!(session.state().rep_count(), 2);
    assert_eq!(session.state().feedback(), feedback.as_slice());
}

#[test]
fn select_and_reset_zero_the_count() {
    let mut session = curl_session(1);
    curl_reps(&mut session, 2);
    session.reset();
    assert_eq!(session.state().rep_count(), 0);
    assert_eq!(session.state().phase(), RepPhase::Unset);
    assert_eq!(session.state().exercise(), Some(Exercise::BicepCurl));

    curl_reps(&mut session, 1);
    assert_eq!(session.state().rep_count(), 1);
    session.select_exercise("BICEP_CURL").unwrap();
    assert_eq!(session.state().rep_count(), 0);
    assert_eq!(session.state().dwell(), 0);
}

// ---------------------------------------------------------------------------
// Frame results
// ---------------------------------------------------------------------------

#[test]
fn degenerate_frame_is_incorrect_form() {
    let mut session = Session::default();
    session.select_exercise("pushup").unwrap();
    let result = session.process_frame(Some(&blank()));
    assert!(!result.form_correct);
    assert!(result.tracked_angle.is_nan());
    assert_eq!(result.form_status, FormStatus::FixForm);
    assert!(result.feedback.iter().any(|f| f.starts_with("Could not measure")));
}

#[test]
fn frame_result_serializes() {
    let mut session = curl_session(1);
    let result = session.process_frame(Some(&curl(170.0)));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["exercise"], "bicep_curl");
    assert_eq!(json["phase"], "start");
    assert_eq!(json["form_status"], "good_form");
    assert_eq!(json["rep_count"], 0);

    let idle = serde_json::to_value(Session::default().process_frame(None)).unwrap();
    assert!(idle["tracked_angle"].is_null());
    assert_eq!(idle["feedback"][0], "No exercise selected");
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn sessions_on_separate_threads_are_independent() {
    let counts: Vec<u32> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|reps| {
                scope.spawn(move || {
                    let mut session = curl_session(1);
                    curl_reps(&mut session, reps);
                    session.state().rep_count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![1, 2, 3, 4]);
}
