//! Cell edit/commit state machine

mod change;
mod state;

pub use change::*;
pub use state::*;
