//! Synthetic poses for unit tests.

use fitpose_core::{KeypointSet, KeypointType, Point2};

use KeypointType::*;

fn blank() -> KeypointSet {
    KeypointSet::from_xy(&[(0.0, 0.0); 17]).unwrap()
}

/// Point `length` away from `vertex` such that the angle between it and
/// `vertex + (0, -length)` is `degrees`, bending towards +x.
fn bend(vertex: Point2, degrees: f32, length: f32) -> Point2 {
    let rad = degrees.to_radians();
    Point2::new(vertex.x + length * rad.sin(), vertex.y - length * rad.cos())
}

/// Side-view squat with both knees at `knee_angle`, upright torso and the
/// ankles directly below the knees.
pub fn squat(knee_angle: f32) -> KeypointSet {
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

/// Side-view push-up, elbows at `elbow_angle`; `hip_drop` moves the hips
/// down (positive) or up (negative) from the shoulder-ankle line.
pub fn pushup(elbow_angle: f32, hip_drop: f32) -> KeypointSet {
    let mut kp = blank();
    for (shoulder, elbow, wrist, x) in [
        (LeftShoulder, LeftElbow, LeftWrist, 200.0),
        (RightShoulder, RightElbow, RightWrist, 202.0),
    ] {
        let shoulder_at = Point2::new(x, 300.0);
        let elbow_at = shoulder_at.offset(0.0, 80.0);
        kp.set_point(shoulder, shoulder_at);
        kp.set_point(elbow, elbow_at);
        kp.set_point(wrist, bend(elbow_at, elbow_angle, 80.0));
    }
    kp.with_point(LeftHip, Point2::new(350.0, 300.0 + hip_drop))
        .with_point(RightHip, Point2::new(350.0, 300.0 + hip_drop))
        .with_point(LeftAnkle, Point2::new(500.0, 300.0))
        .with_point(RightAnkle, Point2::new(500.0, 300.0))
}

/// Front-view curl at mid-range: elbows under the shoulders, forearms level.
pub fn curl() -> KeypointSet {
    blank()
        .with_point(LeftShoulder, Point2::new(150.0, 200.0))
        .with_point(RightShoulder, Point2::new(250.0, 200.0))
        .with_point(LeftElbow, Point2::new(150.0, 300.0))
        .with_point(RightElbow, Point2::new(250.0, 300.0))
        .with_point(LeftWrist, Point2::new(250.0, 300.0))
        .with_point(RightWrist, Point2::new(350.0, 300.0))
}
