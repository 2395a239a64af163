use log::warn;

use crate::constants::{MAX_COUNTED_OBJECTS, STALE_AFTER_FRAMES, SWEEP_INTERVAL_FRAMES};
use crate::counter::counted_object::CountedObject;
use crate::counter::crossing::{CountingRegion, CrossingEvent, detect_crossing};
use crate::counter::reset::TimeSource;
use crate::tensor::{DetectionGrid, ROW_CENTER_X, ROW_CENTER_Y, ROW_HEIGHT, ROW_WIDTH, Sample};

/// Cumulative totals reported after every counter invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSnapshot {
    pub in_count: u32,
    pub out_count: u32,
    pub total_count: u32,
}

/// Directional crossing counter over the tracker's output tensor.
///
/// Keeps one bounded record per track id with its recent positions and
/// crossing state, tallies completed IN/OUT traversals of a rectangle,
/// and clears itself once a day when a reset hour is configured. All
/// state lives in this caller-owned struct; independent counters never
/// interfere.
pub struct ObjectCounter {
    pub(crate) objects: [CountedObject; MAX_COUNTED_OBJECTS],
    pub(crate) frame_counter: u32,
    pub(crate) in_count: u32,
    pub(crate) out_count: u32,
    pub(crate) last_reset_hour: i32,
    pub(crate) last_reset_check: i64,
}

impl ObjectCounter {
    pub fn new() -> Self {
        ObjectCounter {
            objects: [CountedObject::empty(); MAX_COUNTED_OBJECTS],
            frame_counter: 0,
            in_count: 0,
            out_count: 0,
            last_reset_hour: -1,
            last_reset_check: 0,
        }
    }
    /// Returns the counter to its freshly initialized state.
    /// Calling this twice equals calling it once.
    pub fn reset(&mut self) {
        *self = ObjectCounter::new();
    }
    pub fn counts(&self) -> CountSnapshot {
        CountSnapshot {
            in_count: self.in_count,
            out_count: self.out_count,
            total_count: self.in_count + self.out_count,
        }
    }
    /// The per-id record table, for inspection.
    pub fn objects(&self) -> &[CountedObject] {
        &self.objects
    }

    /// Runs one frame of counting over a tracker output tensor.
    ///
    /// `confidence_count` is the row count of *this* tensor, i.e. the
    /// tracker's row count plus the two appended rows; the track id is
    /// read from row `confidence_count - 2`. Columns with non-positive
    /// width or height, or without a positive track id, are skipped.
    pub fn process_frame<S: Sample>(
        &mut self,
        input: &[S],
        max_detections: usize,
        confidence_count: usize,
        counting: &CountingRegion,
        reset_hour: i32,
        clock: &dyn TimeSource,
    ) -> CountSnapshot {
        self.maybe_daily_reset(reset_hour, clock);
        self.frame_counter += 1;

        let grid = DetectionGrid::new(input, max_detections);
        for col in 0..max_detections {
            let width = grid.value_f32(ROW_WIDTH, col);
            let height = grid.value_f32(ROW_HEIGHT, col);
            if width <= 0.0 || height <= 0.0 {
                continue;
            }
            let track_id = grid.value(confidence_count - 2, col).decode_id();
            if track_id <= 0 {
                continue;
            }
            let Some(slot) = self.find_or_create(track_id) else {
                warn!("counted-object table full, ignoring track {}", track_id);
                continue;
            };
            let object = &mut self.objects[slot];
            object.push_position(
                grid.value_f32(ROW_CENTER_X, col),
                grid.value_f32(ROW_CENTER_Y, col),
            );
            object.last_seen_frame = self.frame_counter;
            match detect_crossing(object, counting) {
                CrossingEvent::In => self.in_count += 1,
                CrossingEvent::Out => self.out_count += 1,
                CrossingEvent::None => {}
            }
        }

        if self.frame_counter % SWEEP_INTERVAL_FRAMES == 0 {
            self.sweep_stale();
        }
        self.counts()
    }

    // Linear scan; the table is small and ids are not unique over long
    // horizons anyway. A stale record with a freshly wrapped id silently
    // resumes its old history.
    fn find_or_create(&mut self, track_id: i32) -> Option<usize> {
        let mut free_slot = None;
        for (slot, object) in self.objects.iter().enumerate() {
            if object.active && object.track_id == track_id {
                return Some(slot);
            }
            if !object.active && free_slot.is_none() {
                free_slot = Some(slot);
            }
        }
        if let Some(slot) = free_slot {
            let object = &mut self.objects[slot];
            object.clear();
            object.track_id = track_id;
            object.active = true;
        }
        free_slot
    }

    fn sweep_stale(&mut self) {
        for object in self.objects.iter_mut() {
            if object.active && self.frame_counter - object.last_seen_frame > STALE_AFTER_FRAMES {
                object.clear();
            }
        }
    }

    /// Zeroes the totals and drops every counted object, so objects
    /// straddling the reset boundary cannot double-count. The frame
    /// counter keeps running.
    pub(crate) fn clear_counts_and_objects(&mut self) {
        self.in_count = 0;
        self.out_count = 0;
        for object in self.objects.iter_mut() {
            object.clear();
        }
    }
}
