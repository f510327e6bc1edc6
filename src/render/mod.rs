//! Render output: display list of page frames

mod display;

pub use display::{Color, DisplayItem, DisplayList, DisplayPage, PageStyle};
