use std::str::FromStr;

use crate::counter::counted_object::{CountedObject, RegionState};
use crate::geometry::{Edge, Region};

/// Which two adjacent region edges act as IN entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InDirection {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl InDirection {
    /// Direction table: whether a completed traversal whose entry side
    /// is `entry` counts as IN. Everything else counts as OUT.
    pub fn counts_as_in(&self, entry: Edge) -> bool {
        match self {
            InDirection::TopLeft => entry == Edge::Top || entry == Edge::Left,
            InDirection::TopRight => entry == Edge::Top || entry == Edge::Right,
            InDirection::BottomLeft => entry == Edge::Bottom || entry == Edge::Left,
            InDirection::BottomRight => entry == Edge::Bottom || entry == Edge::Right,
        }
    }
}

impl FromStr for InDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_left" => Ok(InDirection::TopLeft),
            "top_right" => Ok(InDirection::TopRight),
            "bottom_left" => Ok(InDirection::BottomLeft),
            "bottom_right" => Ok(InDirection::BottomRight),
            _ => Err(format!(
                "Invalid in direction: '{}'. Supported: 'top_left', 'top_right', 'bottom_left', 'bottom_right'",
                s
            )),
        }
    }
}

/// A counting rectangle with precomputed bounds plus its IN orientation.
#[derive(Debug, Clone, Copy)]
pub struct CountingRegion {
    pub region: Region,
    pub in_direction: InDirection,
}

impl CountingRegion {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, in_direction: InDirection) -> Self {
        CountingRegion {
            region: Region::new(x1, y1, x2, y2),
            in_direction,
        }
    }
}

/// Outcome of one crossing-detector update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingEvent {
    None,
    In,
    Out,
}

/// Advances the per-object crossing state machine using its last two
/// positions and reports a completed traversal, if any.
///
/// A traversal completes only when the object leaves through the edge
/// opposite to the one it entered from; leaving through the entry edge
/// or an adjacent one just resets the state without counting.
pub fn detect_crossing(object: &mut CountedObject, counting: &CountingRegion) -> CrossingEvent {
    let Some((prev, curr)) = object.last_two() else {
        return CrossingEvent::None;
    };
    let prev_inside = counting.region.contains(prev.0, prev.1);
    let curr_inside = counting.region.contains(curr.0, curr.1);

    if !prev_inside && curr_inside {
        // Entering: remember which side the object came from
        let entry = counting.region.nearest_edge(prev.0, prev.1);
        object.region_state = RegionState::entered_from(entry);
        return CrossingEvent::None;
    }
    if prev_inside && !curr_inside {
        let entry = object.region_state.entry_edge();
        object.region_state = RegionState::Outside;
        let Some(entry) = entry else {
            return CrossingEvent::None;
        };
        let exit = counting.region.nearest_edge(curr.0, curr.1);
        if exit != entry.opposite() {
            return CrossingEvent::None;
        }
        if counting.in_direction.counts_as_in(entry) {
            return CrossingEvent::In;
        }
        return CrossingEvent::Out;
    }
    CrossingEvent::None
}
