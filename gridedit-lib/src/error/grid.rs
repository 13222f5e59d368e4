//! Grid model and event errors

use crate::filter::FilterId;
use crate::model::{CellRef, RowId};

/// Errors raised while handling grid events.
///
/// These are programming or wiring errors of the presentation layer
/// (addressing a cell that does not exist, typing into a display-only cell).
/// Persistence failures are reported separately as [`ApiError`](super::ApiError).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// No row with this id exists in the table.
    #[error("Unknown row: {0}")]
    UnknownRow(RowId),

    /// The column ordinal is past the last header.
    #[error("Column {column} out of range (table has {columns} columns)")]
    ColumnOutOfRange {
        /// Requested column ordinal.
        column: usize,
        /// Number of columns in the table.
        columns: usize,
    },

    /// A row does not have one cell per header.
    #[error("Row has {actual} cells, expected {expected}")]
    RowWidth {
        /// Number of header labels.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// Text input or commit targeted a cell that is not being edited.
    #[error("Cell {0} is not being edited")]
    NotEditing(CellRef),

    /// No filter control with this id exists.
    #[error("Unknown filter control: {0}")]
    UnknownFilter(FilterId),

    /// A change was committed outside of a Tokio runtime.
    #[error("No async runtime available to send the change")]
    NoRuntime,
}
