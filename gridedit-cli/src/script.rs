//! Gesture scripts replayed against a grid.

use gridedit_lib::GridEvent;
use gridedit_lib::filter::FilterId;
use gridedit_lib::model::{CellRef, Table};
use serde::Deserialize;
use thiserror::Error;

/// One recorded gesture. Rows are addressed by their position in the
/// snapshot and filter controls by their position in its `filters` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScriptEvent {
    Activate { row: usize, column: usize },
    Input { row: usize, column: usize, text: String },
    Deactivate { row: usize, column: usize },
    Filter { control: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("no row at position {0}")]
    Row(usize),
    #[error("no filter control at position {0}")]
    Control(usize),
}

impl ScriptEvent {
    /// Translate positions into grid addresses.
    pub fn resolve(&self, table: &Table, controls: &[FilterId]) -> Result<GridEvent, ScriptError> {
        let cell = |row: usize, column: usize| {
            table
                .row_id_at(row)
                .map(|id| CellRef::new(id, column))
                .ok_or(ScriptError::Row(row))
        };

        Ok(match self {
            Self::Activate { row, column } => GridEvent::Activate(cell(*row, *column)?),
            Self::Input { row, column, text } => GridEvent::Input {
                cell: cell(*row, *column)?,
                text: text.clone(),
            },
            Self::Deactivate { row, column } => GridEvent::Deactivate(cell(*row, *column)?),
            Self::Filter { control, text } => GridEvent::Filter {
                control: *controls.get(*control).ok_or(ScriptError::Control(*control))?,
                text: text.clone(),
            },
        })
    }
}
