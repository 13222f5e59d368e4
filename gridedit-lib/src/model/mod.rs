//! Grid model

mod snapshot;
mod table;

pub use snapshot::*;
pub use table::*;
