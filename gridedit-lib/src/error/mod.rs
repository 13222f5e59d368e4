//! Error types

mod api;
mod grid;

pub use api::*;
pub use grid::*;

