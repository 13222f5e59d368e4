//! Editable data grid core
//!
//! Cells become editable on activation; on deactivation a changed cell is
//! addressed by its column header and row key and posted to a persistence
//! endpoint. Per-column filter controls show and hide rows by substring.

pub mod editor;
pub mod error;
pub mod filter;
pub mod model;
pub mod persist;

mod client;
mod config;
mod grid;
mod response;

pub use client::*;
pub use config::*;
pub use editor::CellChange;
pub use grid::*;
pub use response::ApplyResponse;
