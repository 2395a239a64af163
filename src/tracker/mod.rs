pub mod track;
pub mod tracker;
pub use self::{track::*, tracker::*};
