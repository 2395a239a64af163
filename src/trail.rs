use crate::constants::{MAX_TRACK_ID, TRAIL_CAPACITY, TRAIL_STALE_AFTER_FRAMES};
use crate::draw::colors::{color_for_track, faded};
use crate::draw::draw::{draw_box, draw_line};
use crate::draw::image::ImageViewMut;
use crate::font::display_number;
use crate::tensor::{DetectionGrid, ROW_CENTER_X, ROW_CENTER_Y, ROW_HEIGHT, ROW_WIDTH, Sample};

// Tracking confidence below this renders in the washed-out color
const FADE_BELOW: f32 = 0.8;

/// One per-id polyline of recent centers.
#[derive(Debug, Clone, Copy)]
struct Trail {
    points: [(f32, f32); TRAIL_CAPACITY],
    len: usize,
    last_seen_frame: u32,
    active: bool,
}

impl Trail {
    fn empty() -> Self {
        Trail {
            points: [(0.0, 0.0); TRAIL_CAPACITY],
            len: 0,
            last_seen_frame: 0,
            active: false,
        }
    }
    fn clear(&mut self) {
        *self = Trail::empty();
    }
    fn push(&mut self, x: f32, y: f32) {
        if self.len == TRAIL_CAPACITY {
            self.points.copy_within(1.., 0);
            self.points[TRAIL_CAPACITY - 1] = (x, y);
        } else {
            self.points[self.len] = (x, y);
            self.len += 1;
        }
    }
}

/// Tracker-trail overlay: keeps recent centers per track id and renders
/// them as polylines, together with the current box and an id numeral.
///
/// The trail table lives in this caller-owned struct, one per pipeline,
/// so concurrent pipelines never share display state. Input is the
/// tracker output tensor, which is only ever read.
pub struct TrailDisplay {
    trails: [Trail; (MAX_TRACK_ID + 1) as usize],
    frame_counter: u32,
}

impl TrailDisplay {
    pub fn new() -> Self {
        TrailDisplay {
            trails: [Trail::empty(); (MAX_TRACK_ID + 1) as usize],
            frame_counter: 0,
        }
    }
    /// Returns the display to its freshly initialized state.
    pub fn reset(&mut self) {
        for trail in self.trails.iter_mut() {
            trail.clear();
        }
        self.frame_counter = 0;
    }

    /// Ingests one tracker output tensor and paints the overlay.
    /// `confidence_count` is the row count of the tensor, including the
    /// two appended tracker rows.
    pub fn render<S: Sample>(
        &mut self,
        tracked: &[S],
        max_detections: usize,
        confidence_count: usize,
        img: &mut ImageViewMut,
    ) {
        self.frame_counter += 1;
        let grid = DetectionGrid::new(tracked, max_detections);

        for col in 0..max_detections {
            let width = grid.value_f32(ROW_WIDTH, col);
            let height = grid.value_f32(ROW_HEIGHT, col);
            if width <= 0.0 || height <= 0.0 {
                continue;
            }
            let track_id = grid.value(confidence_count - 2, col).decode_id();
            if track_id <= 0 || track_id > MAX_TRACK_ID {
                continue;
            }
            let x = grid.value_f32(ROW_CENTER_X, col);
            let y = grid.value_f32(ROW_CENTER_Y, col);
            let tracking_confidence = grid.value_f32(confidence_count - 1, col);

            let trail = &mut self.trails[track_id as usize];
            if !trail.active {
                trail.clear();
                trail.active = true;
            }
            trail.push(x, y);
            trail.last_seen_frame = self.frame_counter;

            let base = color_for_track(track_id);
            let color = if tracking_confidence < FADE_BELOW {
                faded(base)
            } else {
                base
            };
            for i in 1..trail.len {
                let from = trail.points[i - 1];
                let to = trail.points[i];
                draw_line(img, from.0, from.1, to.0, to.1, &color, 2);
            }
            draw_box(img, x, y, width, height, &color, 2);
            let anchor_x = ((x - width / 2.0) * img.width as f32) as i32 + 2;
            let anchor_y = ((y - height / 2.0) * img.height as f32) as i32 + 2;
            display_number(img, track_id as u32, anchor_x, anchor_y, &color);
        }

        // Ids reappear after wrap-around; stale trails must not leak
        // into the new object's polyline
        for trail in self.trails.iter_mut() {
            if trail.active && self.frame_counter - trail.last_seen_frame > TRAIL_STALE_AFTER_FRAMES
            {
                trail.clear();
            }
        }
    }
}
