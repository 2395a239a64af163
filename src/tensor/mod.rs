pub mod grid;
pub mod sample;
pub use self::{grid::*, sample::*};
