use crate::geometry::BoundingBox;

/// One slot of the tracker's bounded table.
///
/// A slot is either fully zeroed with `active == false`, or carries a
/// live track with `track_id >= 1`, `class_id >= 0` and `hits >= 1`.
#[derive(Debug, Clone, Copy)]
pub struct Track {
    /// Latest matched box in center form.
    pub bbox: BoundingBox,
    /// Detection confidence of the latest match.
    pub confidence: f32,
    pub class_id: i32,
    pub track_id: i32,
    /// Frames since the last matched detection.
    pub age: u32,
    /// Matched detections over the whole lifetime.
    pub hits: u32,
    pub active: bool,
    /// IoU of the last successful match, decayed while unmatched.
    pub tracking_confidence: f32,
}

impl Track {
    pub fn empty() -> Self {
        Track {
            bbox: BoundingBox::default(),
            confidence: 0.0,
            class_id: 0,
            track_id: 0,
            age: 0,
            hits: 0,
            active: false,
            tracking_confidence: 0.0,
        }
    }
    /// Returns the slot to its zeroed, inactive state.
    pub fn clear(&mut self) {
        *self = Track::empty();
    }
    /// Confirmed tracks are the only ones emitted downstream.
    /// Tentative tracks (fewer hits) still take part in association.
    pub fn is_confirmed(&self, min_hits: u32) -> bool {
        self.active && self.hits >= min_hits
    }
}
