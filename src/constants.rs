/// Shared numeric constants for the tracking and counting kernels.

/// Epsilon for general floating-point comparisons.
/// Use for: normalized coordinates, confidences, IoU values.
/// Handles typical f32 precision (~7 significant digits).
pub const EPSILON: f32 = 1e-6;

/// Capacity of the tracker's track table. Callers may request fewer
/// active tracks per frame but never more.
pub const MAX_TRACKS: usize = 50;

/// Largest track id the allocator hands out before wrapping back to 1.
/// Chosen so an id survives the signed 8-bit output channel.
pub const MAX_TRACK_ID: i32 = 127;

/// Multiplicative decay applied to tracking confidence on every frame
/// a track goes unmatched.
pub const TRACKING_CONFIDENCE_DECAY: f32 = 0.9;

/// Capacity of the counter's per-id tracker table.
pub const MAX_COUNTED_OBJECTS: usize = 200;

/// Number of recent positions kept per counted object.
pub const HISTORY_CAPACITY: usize = 10;

/// A counted object unseen for more than this many frames is reclaimable.
pub const STALE_AFTER_FRAMES: u32 = 30;

/// The counter sweeps stale objects once per this many frames.
pub const SWEEP_INTERVAL_FRAMES: u32 = 10;

/// Minimum wall-clock seconds between two daily-reset checks.
pub const RESET_CHECK_INTERVAL_SECONDS: i64 = 60;

/// Number of recent centers kept per trail in the trail display.
pub const TRAIL_CAPACITY: usize = 16;

/// A trail unseen for more than this many rendered frames is dropped.
pub const TRAIL_STALE_AFTER_FRAMES: u32 = 30;
