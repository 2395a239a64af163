pub mod counted_object;
pub mod counter;
pub mod crossing;
pub mod reset;
pub use self::{counted_object::*, counter::*, crossing::*, reset::*};
