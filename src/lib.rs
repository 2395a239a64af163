//! Self-contained signal-processing fragments for a detection pipeline:
//! an online multi-object tracker, a region-crossing counter with daily
//! reset, and the rendering helpers that visualize both. All fragments
//! operate on dense row-major tensors and keep their state in caller-owned
//! structs, so multiple pipelines can coexist in one process.

pub mod constants;
pub mod tensor;
pub mod geometry;
pub mod tracker;
pub mod counter;
pub mod filter;
pub mod draw;
pub mod font;
pub mod trail;
pub mod settings;
