use log::warn;

use crate::constants::{MAX_TRACKS, MAX_TRACK_ID, TRACKING_CONFIDENCE_DECAY};
use crate::geometry::BoundingBox;
use crate::tensor::{
    DetectionGrid, DetectionGridMut, ROW_CENTER_X, ROW_CENTER_Y, ROW_FIRST_CLASS, ROW_HEIGHT,
    ROW_WIDTH, Sample,
};
use crate::tracker::Track;

/// Association and lifecycle parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrackerParams {
    /// Minimum IoU for a detection to match an existing track.
    pub tracking_threshold: f32,
    /// Upper bound on simultaneously active tracks. Capped at the
    /// table capacity.
    pub max_tracks: usize,
    /// Frames an unmatched track survives before its slot is reclaimed.
    pub max_age: u32,
    /// Matched detections required before a track is emitted.
    pub min_hits: u32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        TrackerParams {
            tracking_threshold: 0.3,
            max_tracks: MAX_TRACKS,
            max_age: 10,
            min_hits: 1,
        }
    }
}

/// One extracted per-frame detection, before association.
#[derive(Debug, Clone, Copy)]
struct DetectionRecord {
    bbox: BoundingBox,
    confidence: f32,
    class_id: i32,
    matched: bool,
}

/// Greedy IoU tracker over a bounded slot table.
///
/// Each frame runs five phases in order: extract detections from the
/// input tensor, associate them to active tracks of the same class,
/// spawn tracks for the leftovers, age and expire unmatched tracks, and
/// emit the confirmed ones into the output tensor. Association is a
/// plain O(detections x tracks) greedy scan; a globally optimal
/// assignment is out of the resource envelope on purpose.
pub struct ObjectTracker {
    params: TrackerParams,
    tracks: [Track; MAX_TRACKS],
    next_track_id: i32,
}

impl ObjectTracker {
    pub fn new(params: TrackerParams) -> Self {
        let mut params = params;
        params.max_tracks = params.max_tracks.min(MAX_TRACKS);
        ObjectTracker {
            params,
            tracks: [Track::empty(); MAX_TRACKS],
            next_track_id: 1,
        }
    }
    /// Returns the tracker to its freshly initialized state.
    /// Calling this twice equals calling it once.
    pub fn reset(&mut self) {
        for track in self.tracks.iter_mut() {
            track.clear();
        }
        self.next_track_id = 1;
    }
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }
    /// The slot table, for inspection. Slots past `max_tracks` stay empty.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks[..self.params.max_tracks]
    }

    /// Runs one frame of tracking.
    ///
    /// `input` is a `confidence_count x max_detections` detection tensor;
    /// `output` must hold `(confidence_count + 2) x max_detections`
    /// samples and receives the confirmed tracks left to right, with the
    /// track id at row `confidence_count` and the tracking confidence at
    /// row `confidence_count + 1`. Unused output cells carry the
    /// empty-cell sentinel of the sample type.
    pub fn process_frame<S: Sample>(
        &mut self,
        input: &[S],
        output: &mut [S],
        max_detections: usize,
        confidence_count: usize,
    ) {
        let grid = DetectionGrid::new(input, max_detections);
        let mut detections = extract_detections(&grid, max_detections, confidence_count);
        let mut track_matched = [false; MAX_TRACKS];
        self.associate(&mut detections, &mut track_matched);
        self.spawn_unmatched(&detections, &mut track_matched);
        self.age_and_expire(&track_matched);
        self.emit(output, max_detections, confidence_count);
    }

    // Greedy class-constrained assignment: detections in index order,
    // each taking the best still-unmatched track above the threshold.
    fn associate(
        &mut self,
        detections: &mut [DetectionRecord],
        track_matched: &mut [bool; MAX_TRACKS],
    ) {
        for detection in detections.iter_mut() {
            let mut best_iou = self.params.tracking_threshold;
            let mut best_slot: Option<usize> = None;
            for slot in 0..self.params.max_tracks {
                let track = &self.tracks[slot];
                if !track.active || track_matched[slot] || track.class_id != detection.class_id {
                    continue;
                }
                let iou = detection.bbox.iou(&track.bbox);
                if iou > best_iou {
                    best_iou = iou;
                    best_slot = Some(slot);
                }
            }
            if let Some(slot) = best_slot {
                let track = &mut self.tracks[slot];
                track.bbox = detection.bbox;
                track.confidence = detection.confidence;
                track.age = 0;
                track.hits += 1;
                track.tracking_confidence = best_iou;
                track_matched[slot] = true;
                detection.matched = true;
            }
        }
    }

    fn spawn_unmatched(
        &mut self,
        detections: &[DetectionRecord],
        track_matched: &mut [bool; MAX_TRACKS],
    ) {
        for detection in detections.iter().filter(|d| !d.matched) {
            let free_slot = self.tracks[..self.params.max_tracks]
                .iter()
                .position(|t| !t.active);
            let Some(slot) = free_slot else {
                // Table full: the detection is dropped, existing tracks win
                warn!("track table full, dropping class {} detection", detection.class_id);
                continue;
            };
            let track_id = self.allocate_id();
            let track = &mut self.tracks[slot];
            track.bbox = detection.bbox;
            track.confidence = detection.confidence;
            track.class_id = detection.class_id;
            track.track_id = track_id;
            track.age = 0;
            track.hits = 1;
            track.active = true;
            track.tracking_confidence = 1.0;
            track_matched[slot] = true;
        }
    }

    // Returns the current id, then advances; 127 wraps back to 1. A
    // wrapped id may collide with a still-active track under extreme
    // churn; downstream must not treat ids as unique over long horizons.
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_track_id;
        self.next_track_id += 1;
        if self.next_track_id > MAX_TRACK_ID {
            self.next_track_id = 1;
        }
        id
    }

    fn age_and_expire(&mut self, track_matched: &[bool; MAX_TRACKS]) {
        for slot in 0..self.params.max_tracks {
            let track = &mut self.tracks[slot];
            if !track.active || track_matched[slot] {
                continue;
            }
            track.age += 1;
            track.tracking_confidence *= TRACKING_CONFIDENCE_DECAY;
            if track.age > self.params.max_age {
                track.clear();
            }
        }
    }

    fn emit<S: Sample>(&self, output: &mut [S], max_detections: usize, confidence_count: usize) {
        let mut grid = DetectionGridMut::new(output, max_detections);
        grid.fill_empty();
        let mut column = 0;
        for track in self.tracks[..self.params.max_tracks].iter() {
            if !track.is_confirmed(self.params.min_hits) {
                continue;
            }
            if column >= max_detections {
                break;
            }
            grid.set_f32(ROW_CENTER_X, column, track.bbox.x);
            grid.set_f32(ROW_CENTER_Y, column, track.bbox.y);
            grid.set_f32(ROW_WIDTH, column, track.bbox.width);
            grid.set_f32(ROW_HEIGHT, column, track.bbox.height);
            let class_row = ROW_FIRST_CLASS + track.class_id as usize;
            if class_row < confidence_count {
                grid.set_f32(class_row, column, track.confidence);
            }
            grid.set(confidence_count, column, S::encode_id(track.track_id));
            grid.set_f32(confidence_count + 1, column, track.tracking_confidence);
            column += 1;
        }
    }
}

// Argmax over the class-confidence rows of every column. A column whose
// class rows are all zero keeps class_id == -1 and carries no detection;
// no upstream confidence threshold is re-applied here.
fn extract_detections<S: Sample>(
    grid: &DetectionGrid<S>,
    max_detections: usize,
    confidence_count: usize,
) -> Vec<DetectionRecord> {
    let mut detections = Vec::with_capacity(max_detections);
    for col in 0..max_detections {
        let mut max_confidence = 0.0f32;
        let mut class_id = -1i32;
        for row in ROW_FIRST_CLASS..confidence_count {
            let confidence = grid.value_f32(row, col);
            if confidence > max_confidence {
                max_confidence = confidence;
                class_id = (row - ROW_FIRST_CLASS) as i32;
            }
        }
        if max_confidence <= 0.0 && class_id < 0 {
            continue;
        }
        detections.push(DetectionRecord {
            bbox: BoundingBox::new(
                grid.value_f32(ROW_CENTER_X, col),
                grid.value_f32(ROW_CENTER_Y, col),
                grid.value_f32(ROW_WIDTH, col),
                grid.value_f32(ROW_HEIGHT, col),
            ),
            confidence: max_confidence,
            class_id,
            matched: false,
        });
    }
    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MAX_DETECTIONS: usize = 4;
    const CONFIDENCE_COUNT: usize = 6; // 4 box rows + 2 classes

    fn params(threshold: f32, max_age: u32, min_hits: u32) -> TrackerParams {
        TrackerParams {
            tracking_threshold: threshold,
            max_tracks: MAX_TRACKS,
            max_age,
            min_hits,
        }
    }

    // Builds one input frame; entries are (x, y, w, h, class_id, confidence)
    fn make_frame(entries: &[(f32, f32, f32, f32, usize, f32)]) -> Vec<f32> {
        let mut frame = vec![0.0f32; CONFIDENCE_COUNT * MAX_DETECTIONS];
        for (col, entry) in entries.iter().enumerate() {
            frame[ROW_CENTER_X * MAX_DETECTIONS + col] = entry.0;
            frame[ROW_CENTER_Y * MAX_DETECTIONS + col] = entry.1;
            frame[ROW_WIDTH * MAX_DETECTIONS + col] = entry.2;
            frame[ROW_HEIGHT * MAX_DETECTIONS + col] = entry.3;
            frame[(ROW_FIRST_CLASS + entry.4) * MAX_DETECTIONS + col] = entry.5;
        }
        frame
    }

    fn output_buffer() -> Vec<f32> {
        vec![0.0f32; (CONFIDENCE_COUNT + 2) * MAX_DETECTIONS]
    }

    fn emitted_columns(output: &[f32]) -> Vec<usize> {
        (0..MAX_DETECTIONS)
            .filter(|col| output[ROW_WIDTH * MAX_DETECTIONS + col] > 0.0)
            .collect()
    }

    #[test]
    fn test_single_class_match() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();

        let frame_one = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]);
        tracker.process_frame(&frame_one, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(emitted_columns(&output), vec![0]);
        assert_eq!(output[CONFIDENCE_COUNT * MAX_DETECTIONS], 1.0);
        assert_eq!(output[(CONFIDENCE_COUNT + 1) * MAX_DETECTIONS], 1.0);

        let frame_two = make_frame(&[(0.52, 0.5, 0.1, 0.1, 0, 0.9)]);
        tracker.process_frame(&frame_two, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(emitted_columns(&output), vec![0]);
        // Same identity across both frames
        assert_eq!(output[CONFIDENCE_COUNT * MAX_DETECTIONS], 1.0);
        // Tracking confidence equals the frame-two IoU
        let expected_iou = BoundingBox::new(0.5, 0.5, 0.1, 0.1)
            .iou(&BoundingBox::new(0.52, 0.5, 0.1, 0.1));
        assert_relative_eq!(
            output[(CONFIDENCE_COUNT + 1) * MAX_DETECTIONS],
            expected_iou,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_single_class_match_quantized() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let frame_one = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]);
        let frame_two = make_frame(&[(0.52, 0.5, 0.1, 0.1, 0, 0.9)]);
        let quantize_frame =
            |frame: &[f32]| frame.iter().map(|&v| i8::from_f32(v)).collect::<Vec<i8>>();
        let mut output = vec![0i8; (CONFIDENCE_COUNT + 2) * MAX_DETECTIONS];

        tracker.process_frame(
            &quantize_frame(&frame_one),
            &mut output,
            MAX_DETECTIONS,
            CONFIDENCE_COUNT,
        );
        assert_eq!(output[CONFIDENCE_COUNT * MAX_DETECTIONS].decode_id(), 1);

        tracker.process_frame(
            &quantize_frame(&frame_two),
            &mut output,
            MAX_DETECTIONS,
            CONFIDENCE_COUNT,
        );
        assert_eq!(output[CONFIDENCE_COUNT * MAX_DETECTIONS].decode_id(), 1);
        // Unused columns carry the -128 sentinel
        assert_eq!(output[CONFIDENCE_COUNT * MAX_DETECTIONS + 1], -128);
    }

    #[test]
    fn test_class_exclusion() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();

        let class_zero = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]);
        tracker.process_frame(&class_zero, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        // Same location, different class: must not match the existing track
        let class_one = make_frame(&[(0.5, 0.5, 0.1, 0.1, 1, 0.9)]);
        tracker.process_frame(&class_one, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        let active_ids: Vec<i32> = tracker
            .tracks()
            .iter()
            .filter(|t| t.active)
            .map(|t| t.track_id)
            .collect();
        assert_eq!(active_ids, vec![1, 2]);
    }

    #[test]
    fn test_min_hits_gates_emission() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 2));
        let mut output = output_buffer();

        let frame = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert!(emitted_columns(&output).is_empty());

        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(emitted_columns(&output), vec![0]);
    }

    #[test]
    fn test_unmatched_track_ages_and_expires() {
        let mut tracker = ObjectTracker::new(params(0.3, 2, 1));
        let mut output = output_buffer();

        let frame = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        let empty = make_frame(&[]);
        tracker.process_frame(&empty, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        let track = tracker.tracks()[0];
        assert!(track.active);
        assert_eq!(track.age, 1);
        assert_relative_eq!(track.tracking_confidence, 0.9, max_relative = 1e-6);

        tracker.process_frame(&empty, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(tracker.tracks()[0].age, 2);

        // age exceeds max_age: the slot goes back to empty
        tracker.process_frame(&empty, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert!(!tracker.tracks()[0].active);
        assert!(emitted_columns(&output).is_empty());
    }

    #[test]
    fn test_active_ids_distinct_and_in_range() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();
        let frame = make_frame(&[
            (0.2, 0.2, 0.1, 0.1, 0, 0.9),
            (0.5, 0.5, 0.1, 0.1, 0, 0.8),
            (0.8, 0.8, 0.1, 0.1, 1, 0.7),
        ]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        let mut ids: Vec<i32> = tracker
            .tracks()
            .iter()
            .filter(|t| t.active)
            .map(|t| t.track_id)
            .collect();
        assert_eq!(ids.len(), 3);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|&id| id >= 1 && id <= MAX_TRACK_ID));
    }

    #[test]
    fn test_id_allocator_wraps_to_one() {
        let mut tracker = ObjectTracker::new(params(0.3, 0, 1));
        let mut output = output_buffer();

        // max_age = 0 expires every unmatched track on the next frame, so
        // alternating two far-apart boxes spawns a fresh id per frame
        for i in 0..(MAX_TRACK_ID as usize) {
            let x = if i % 2 == 0 { 0.2 } else { 0.8 };
            let frame = make_frame(&[(x, 0.5, 0.05, 0.05, 0, 0.9)]);
            tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        }
        let last_id = tracker
            .tracks()
            .iter()
            .filter(|t| t.active)
            .map(|t| t.track_id)
            .max()
            .unwrap();
        assert_eq!(last_id, MAX_TRACK_ID);

        // Far from the last spawn location, so a fresh track is born
        let frame = make_frame(&[(0.8, 0.5, 0.05, 0.05, 0, 0.9)]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        let ids: Vec<i32> = tracker
            .tracks()
            .iter()
            .filter(|t| t.active)
            .map(|t| t.track_id)
            .collect();
        assert!(ids.contains(&1));
    }

    #[test]
    fn test_table_full_drops_detections() {
        let mut tracker = ObjectTracker::new(TrackerParams {
            max_tracks: 2,
            ..params(0.3, 5, 1)
        });
        let mut output = output_buffer();
        let frame = make_frame(&[
            (0.2, 0.2, 0.1, 0.1, 0, 0.9),
            (0.5, 0.5, 0.1, 0.1, 0, 0.8),
            (0.8, 0.8, 0.1, 0.1, 0, 0.7),
        ]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        let active = tracker.tracks().iter().filter(|t| t.active).count();
        assert_eq!(active, 2);
        // Survivors are the earlier detections
        assert_eq!(tracker.tracks()[0].bbox.x, 0.2);
        assert_eq!(tracker.tracks()[1].bbox.x, 0.5);
    }

    #[test]
    fn test_emission_capped_at_output_width() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();

        // Spawn four, then four more elsewhere: eight confirmed tracks
        let first = make_frame(&[
            (0.1, 0.1, 0.05, 0.05, 0, 0.9),
            (0.3, 0.1, 0.05, 0.05, 0, 0.9),
            (0.5, 0.1, 0.05, 0.05, 0, 0.9),
            (0.7, 0.1, 0.05, 0.05, 0, 0.9),
        ]);
        tracker.process_frame(&first, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        let second = make_frame(&[
            (0.1, 0.9, 0.05, 0.05, 0, 0.9),
            (0.3, 0.9, 0.05, 0.05, 0, 0.9),
            (0.5, 0.9, 0.05, 0.05, 0, 0.9),
            (0.7, 0.9, 0.05, 0.05, 0, 0.9),
        ]);
        tracker.process_frame(&second, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        assert_eq!(tracker.tracks().iter().filter(|t| t.active).count(), 8);
        assert_eq!(emitted_columns(&output).len(), MAX_DETECTIONS);
    }

    #[test]
    fn test_empty_input_produces_no_tracks() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();
        let frame = make_frame(&[]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(tracker.tracks().iter().filter(|t| t.active).count(), 0);
        assert!(output.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_no_upstream_threshold_reapplied() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();
        // A barely-positive confidence still spawns a track
        let frame = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.01)]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(tracker.tracks().iter().filter(|t| t.active).count(), 1);
    }

    #[test]
    fn test_determinism() {
        let frames = vec![
            make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]),
            make_frame(&[(0.52, 0.5, 0.1, 0.1, 0, 0.8), (0.2, 0.2, 0.1, 0.1, 1, 0.7)]),
            make_frame(&[]),
            make_frame(&[(0.54, 0.5, 0.1, 0.1, 0, 0.9)]),
        ];
        let run = || {
            let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
            let mut outputs = vec![];
            for frame in frames.iter() {
                let mut output = output_buffer();
                tracker.process_frame(frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
                outputs.push(output);
            }
            outputs
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut tracker = ObjectTracker::new(params(0.3, 5, 1));
        let mut output = output_buffer();
        let frame = make_frame(&[(0.5, 0.5, 0.1, 0.1, 0, 0.9)]);
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);

        tracker.reset();
        tracker.reset();
        assert_eq!(tracker.tracks().iter().filter(|t| t.active).count(), 0);

        // A fresh detection gets id 1 again
        tracker.process_frame(&frame, &mut output, MAX_DETECTIONS, CONFIDENCE_COUNT);
        assert_eq!(output[CONFIDENCE_COUNT * MAX_DETECTIONS], 1.0);
    }
}
