//! Column filter state and evaluation.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use super::{FilterControl, FilterId};
use crate::error::GridError;
use crate::model::{Row, Table, Visibility};

/// How filter controls combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Each input evaluates only the edited control.
    ///
    /// With several non-empty controls, row visibility reflects whichever
    /// control changed last; the others are not re-applied.
    #[default]
    Independent,
    /// Each input re-evaluates every control; a row is shown only if all
    /// non-empty controls match it.
    Combined,
}

/// Visible and hidden row counts after a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    /// Rows shown.
    pub visible: usize,
    /// Rows hidden.
    pub hidden: usize,
}

/// The set of filter controls attached to one table.
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    id: usize,
    controls: Vec<FilterControl>,
    mode: FilterMode,
    last_edited: Option<FilterId>,
}

impl Default for ColumnFilter {
    fn default() -> Self {
        Self::new(FilterMode::default())
    }
}

impl ColumnFilter {
    /// Create a filter with no controls.
    pub fn new(mode: FilterMode) -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self {
            id: COUNTER.fetch_add(1, Ordering::SeqCst),
            controls: Vec::new(),
            mode,
            last_edited: None,
        }
    }

    /// Changes the combination mode. Row visibility is not recomputed until
    /// the next input or [`reapply`](Self::reapply).
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Adds a control bound to `column` and returns its id.
    pub fn add_control(&mut self, column: usize) -> FilterId {
        let id = FilterId::new(self.id, self.controls.len());
        self.controls.push(FilterControl::new(id, column));
        id
    }

    /// Returns a control by id.
    pub fn control(&self, id: FilterId) -> Option<&FilterControl> {
        self.slot(id).map(|index| &self.controls[index])
    }

    /// Returns all controls in creation order.
    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    /// Returns the control that received input most recently.
    pub fn last_edited(&self) -> Option<FilterId> {
        self.last_edited
    }

    fn slot(&self, id: FilterId) -> Option<usize> {
        (id.owner() == self.id && id.index() < self.controls.len()).then_some(id.index())
    }

    /// Handle new text typed into a control and recompute every row.
    ///
    /// All rows are evaluated, including rows hidden by an earlier pass.
    pub fn on_input(
        &mut self,
        table: &mut Table,
        id: FilterId,
        text: &str,
    ) -> Result<FilterOutcome, GridError> {
        let index = self.slot(id).ok_or(GridError::UnknownFilter(id))?;
        let control = &mut self.controls[index];
        control.set_text(text);
        trace!("{} on column {} set to {:?}", id, control.column(), text);
        self.last_edited = Some(id);

        let outcome = match self.mode {
            FilterMode::Independent => {
                let control = &self.controls[index];
                apply(table, |row| control.matches(row.cell(control.column())))
            }
            FilterMode::Combined => self.apply_all(table),
        };
        Ok(outcome)
    }

    /// Recompute visibility from the controls' current text.
    ///
    /// In [`FilterMode::Independent`] only the most recently edited control
    /// is evaluated; with no input yet every row is shown.
    pub fn reapply(&self, table: &mut Table) -> FilterOutcome {
        match self.mode {
            FilterMode::Combined => self.apply_all(table),
            FilterMode::Independent => match self.last_edited.and_then(|id| self.control(id)) {
                Some(control) => apply(table, |row| control.matches(row.cell(control.column()))),
                None => apply(table, |_| true),
            },
        }
    }

    /// Empty every control and show every row.
    pub fn clear(&mut self, table: &mut Table) -> FilterOutcome {
        for control in &mut self.controls {
            control.set_text("");
        }
        self.last_edited = None;
        apply(table, |_| true)
    }

    fn apply_all(&self, table: &mut Table) -> FilterOutcome {
        let active: Vec<&FilterControl> = self.controls.iter().filter(|c| !c.is_empty()).collect();
        apply(table, |row| {
            active.iter().all(|c| c.matches(row.cell(c.column())))
        })
    }
}

/// Set every row's visibility from `keep` and count the result.
fn apply(table: &mut Table, keep: impl Fn(&Row) -> bool) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for row in table.rows_mut() {
        if keep(row) {
            row.set_visibility(Visibility::Visible);
            outcome.visible += 1;
        } else {
            row.set_visibility(Visibility::Hidden);
            outcome.hidden += 1;
        }
    }
    trace!(
        "Filter pass on '{}': {} visible, {} hidden",
        table.name(),
        outcome.visible,
        outcome.hidden
    );
    outcome
}
