//! Persistence of committed changes
//!
//! A commit is handed to a [`ChangeDispatcher`], which runs the write on the
//! Tokio runtime through a [`ChangeSink`] and reports the outcome to an
//! [`ErrorReporter`]. The caller gets a [`PendingWrite`] it may await or drop.

mod dispatch;
mod reporter;
mod sink;

pub use dispatch::*;
pub use reporter::*;
pub use sink::*;
