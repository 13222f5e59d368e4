//! Per-column row visibility filter

mod column;
mod control;

pub use column::*;
pub use control::*;
