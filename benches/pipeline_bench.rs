use criterion::{Criterion, black_box, criterion_group, criterion_main};

use trackcount::counter::{CountingRegion, InDirection, ObjectCounter, SystemClock};
use trackcount::tracker::{ObjectTracker, TrackerParams};

const MAX_DETECTIONS: usize = 16;
const CONFIDENCE_COUNT: usize = 12; // 4 box rows + 8 classes

// A frame with every column occupied, objects drifting rightwards
fn make_frame(offset: f32) -> Vec<f32> {
    let mut frame = vec![0.0f32; CONFIDENCE_COUNT * MAX_DETECTIONS];
    for col in 0..MAX_DETECTIONS {
        let x = (0.05 + 0.06 * col as f32 + offset).min(0.95);
        let y = 0.2 + 0.04 * col as f32;
        frame[col] = x;
        frame[MAX_DETECTIONS + col] = y;
        frame[2 * MAX_DETECTIONS + col] = 0.08;
        frame[3 * MAX_DETECTIONS + col] = 0.08;
        frame[(4 + col % 8) * MAX_DETECTIONS + col] = 0.9;
    }
    frame
}

fn bench_tracker_step(c: &mut Criterion) {
    let frames: Vec<Vec<f32>> = (0..30).map(|i| make_frame(i as f32 * 0.005)).collect();
    c.bench_function("tracker_step_f32_16_detections", |b| {
        b.iter(|| {
            let mut tracker = ObjectTracker::new(TrackerParams::default());
            let mut output = vec![0.0f32; (CONFIDENCE_COUNT + 2) * MAX_DETECTIONS];
            for frame in frames.iter() {
                tracker.process_frame(
                    black_box(frame),
                    &mut output,
                    MAX_DETECTIONS,
                    CONFIDENCE_COUNT,
                );
            }
            black_box(output[0])
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let frames: Vec<Vec<f32>> = (0..30).map(|i| make_frame(i as f32 * 0.005)).collect();
    let counting = CountingRegion::new(0.4, 0.1, 0.6, 0.9, InDirection::TopLeft);
    c.bench_function("tracker_and_counter_30_frames", |b| {
        b.iter(|| {
            let mut tracker = ObjectTracker::new(TrackerParams::default());
            let mut counter = ObjectCounter::new();
            let mut output = vec![0.0f32; (CONFIDENCE_COUNT + 2) * MAX_DETECTIONS];
            for frame in frames.iter() {
                tracker.process_frame(
                    black_box(frame),
                    &mut output,
                    MAX_DETECTIONS,
                    CONFIDENCE_COUNT,
                );
                counter.process_frame(
                    &output,
                    MAX_DETECTIONS,
                    CONFIDENCE_COUNT + 2,
                    &counting,
                    -1,
                    &SystemClock,
                );
            }
            black_box(counter.counts().total_count)
        })
    });
}

criterion_group!(benches, bench_tracker_step, bench_full_pipeline);
criterion_main!(benches);
