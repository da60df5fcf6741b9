//! Benchmarks for per-frame session processing
//!
//! Run with: cargo bench --package fitpose-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use fitpose_core::KeypointSet;
use fitpose_engine::{lookup, DepthCheck, EngineConfig, FormEvaluator, Session};

/// Deterministic keypoint stream: a body swaying and flexing over `frames`
/// frames.
fn create_stream(frames: usize) -> Vec<KeypointSet> {
    (0..frames)
        .map(|f| {
            let t = f as f32 * 0.1;
            let points: Vec<(f32, f32)> = (0..17)
                .map(|i| {
                    let i = i as f32;
                    (200.0 + 40.0 * (t + i * 0.3).sin(), 100.0 + 25.0 * i + 10.0 * (t * 0.7 + i).cos())
                })
                .collect();
            KeypointSet::from_xy(&points).unwrap()
        })
        .collect()
}

fn bench_form_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Form Evaluation");
    let evaluator = FormEvaluator::default();
    let stream = create_stream(1);
    let frame = &stream[0];

    for id in ["squat", "pushup", "bicep_curl"] {
        let profile = lookup(id).unwrap();
        group.bench_with_input(BenchmarkId::new("evaluate", id), profile, |b, profile| {
            b.iter(|| evaluator.evaluate(black_box(profile), black_box(frame)))
        });
    }

    group.finish();
}

fn bench_process_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("Session");
    group.measurement_time(Duration::from_secs(5));

    for &frames in &[30usize, 300, 3000] {
        let stream = create_stream(frames);
        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("process_frame", frames), &stream, |b, stream| {
            let config = EngineConfig {
                depth_check: DepthCheck::AtBottom,
                ..EngineConfig::default()
            };
            let mut session = Session::new(config).unwrap();
            session.select_exercise("squat").unwrap();
            b.iter(|| {
                for frame in stream {
                    black_box(session.process_frame(Some(frame)));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_form_evaluation, bench_process_frame);
criterion_main!(benches);
