use crate::constants::HISTORY_CAPACITY;
use crate::geometry::Edge;

/// Region membership state of one counted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    Outside,
    Inside,
    EnteredFromLeft,
    EnteredFromRight,
    EnteredFromTop,
    EnteredFromBottom,
}

impl RegionState {
    pub fn entered_from(edge: Edge) -> RegionState {
        match edge {
            Edge::Left => RegionState::EnteredFromLeft,
            Edge::Right => RegionState::EnteredFromRight,
            Edge::Top => RegionState::EnteredFromTop,
            Edge::Bottom => RegionState::EnteredFromBottom,
        }
    }
    /// The entry side, when the object is inside after a tracked entry.
    pub fn entry_edge(&self) -> Option<Edge> {
        match self {
            RegionState::EnteredFromLeft => Some(Edge::Left),
            RegionState::EnteredFromRight => Some(Edge::Right),
            RegionState::EnteredFromTop => Some(Edge::Top),
            RegionState::EnteredFromBottom => Some(Edge::Bottom),
            RegionState::Outside | RegionState::Inside => None,
        }
    }
}

/// Per-track-id record inside the counter: a bounded FIFO of recent
/// center positions plus the crossing state machine's current state.
#[derive(Debug, Clone, Copy)]
pub struct CountedObject {
    history: [(f32, f32); HISTORY_CAPACITY],
    history_len: usize,
    pub track_id: i32,
    pub last_seen_frame: u32,
    pub active: bool,
    pub region_state: RegionState,
}

impl CountedObject {
    pub fn empty() -> Self {
        CountedObject {
            history: [(0.0, 0.0); HISTORY_CAPACITY],
            history_len: 0,
            track_id: 0,
            last_seen_frame: 0,
            active: false,
            region_state: RegionState::Outside,
        }
    }
    /// Returns the slot to its zeroed, inactive state.
    pub fn clear(&mut self) {
        *self = CountedObject::empty();
    }
    /// Appends a position at the tail, evicting the oldest when full.
    pub fn push_position(&mut self, x: f32, y: f32) {
        if self.history_len == HISTORY_CAPACITY {
            self.history.copy_within(1.., 0);
            self.history[HISTORY_CAPACITY - 1] = (x, y);
        } else {
            self.history[self.history_len] = (x, y);
            self.history_len += 1;
        }
    }
    pub fn history(&self) -> &[(f32, f32)] {
        &self.history[..self.history_len]
    }
    /// The previous and current positions, once two are known.
    pub fn last_two(&self) -> Option<((f32, f32), (f32, f32))> {
        if self.history_len < 2 {
            return None;
        }
        Some((
            self.history[self.history_len - 2],
            self.history[self.history_len - 1],
        ))
    }
}
