pub mod colors;
pub mod draw;
pub mod image;
pub use self::{colors::*, draw::*, image::*};
