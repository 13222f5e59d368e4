//! Per-cell editing state.

use std::collections::HashMap;

use log::debug;

use super::CellChange;
use crate::error::GridError;
use crate::model::{CellRef, Table};

/// Editing state of a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellState {
    /// Display-only.
    Viewing,
    /// Editable, with the text the cell held when editing began.
    Editing {
        /// Snapshot taken on the first activation.
        original: String,
    },
}

/// Result of activating a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The cell entered editing and its text was captured.
    Started,
    /// The cell was already editing; the original snapshot is unchanged.
    AlreadyEditing,
}

/// Result of deactivating a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// The text differs from the snapshot and must be persisted.
    Changed(CellChange),
    /// The text is identical to the snapshot.
    Unchanged,
    /// The cell was not editing, so there was nothing to commit.
    NotEditing,
}

/// Tracks which cells of one table are being edited.
///
/// Cells are independent: any number may be editing at the same time, and
/// each keeps its own original-value snapshot until it is deactivated.
#[derive(Debug, Default)]
pub struct CellEditor {
    /// Original text per editing cell.
    sessions: HashMap<CellRef, String>,
}

impl CellEditor {
    /// Create an editor with no cell editing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `cell`.
    pub fn state(&self, cell: CellRef) -> CellState {
        match self.sessions.get(&cell) {
            Some(original) => CellState::Editing {
                original: original.clone(),
            },
            None => CellState::Viewing,
        }
    }

    /// Returns `true` if `cell` is editing.
    pub fn is_editing(&self, cell: CellRef) -> bool {
        self.sessions.contains_key(&cell)
    }

    /// Number of cells currently editing.
    pub fn editing_count(&self) -> usize {
        self.sessions.len()
    }

    /// Begin editing `cell`, capturing its current text.
    ///
    /// Activating a cell that is already editing leaves its snapshot alone,
    /// so text typed since the first activation is never taken as original.
    pub fn activate(&mut self, table: &Table, cell: CellRef) -> Result<Activation, GridError> {
        if self.sessions.contains_key(&cell) {
            return Ok(Activation::AlreadyEditing);
        }

        let original = table.cell_text(cell)?.to_string();
        debug!("Editing {} in '{}' (original {:?})", cell, table.name(), original);
        self.sessions.insert(cell, original);
        Ok(Activation::Started)
    }

    /// Stop editing `cell` and decide whether its text changed.
    ///
    /// Text and labels are read from `table` after the edit, so editing the
    /// first cell of a row addresses the change with the new key. The
    /// snapshot is dropped on every path.
    pub fn deactivate(&mut self, table: &Table, cell: CellRef) -> Result<Commit, GridError> {
        let Some(original) = self.sessions.remove(&cell) else {
            return Ok(Commit::NotEditing);
        };

        let new_value = table.cell_text(cell)?;
        let address = table.address(cell)?;

        if new_value == original {
            debug!("No change in {} of '{}'", cell, table.name());
            return Ok(Commit::Unchanged);
        }

        let change = CellChange::new(address, new_value);
        debug!("Committed {}", change);
        Ok(Commit::Changed(change))
    }
}
