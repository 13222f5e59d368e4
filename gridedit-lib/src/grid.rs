//! Editable grid: one table instance with its editor, filters and writer.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

use crate::config::GridConfig;
use crate::editor::{Activation, CellEditor, Commit};
use crate::error::GridError;
use crate::filter::{ColumnFilter, FilterId, FilterOutcome};
use crate::model::{CellRef, Table};
use crate::persist::{ChangeDispatcher, ChangeSink, ErrorReporter, PendingWrite};

/// Unique identifier for a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for GridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "grid#{}", self.0)
    }
}

/// A user gesture forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// The cell was clicked.
    Activate(CellRef),
    /// The text of an editing cell changed.
    Input {
        /// The cell being typed into.
        cell: CellRef,
        /// Its full text after the keystroke.
        text: String,
    },
    /// The cell lost focus.
    Deactivate(CellRef),
    /// The text of a filter control changed.
    Filter {
        /// The control typed into.
        control: FilterId,
        /// Its full text after the keystroke.
        text: String,
    },
}

/// What handling a [`GridEvent`] did.
#[derive(Debug)]
pub enum GridOutcome {
    /// The cell entered editing.
    Editing,
    /// The cell was already editing; nothing changed.
    AlreadyEditing,
    /// The editing cell's text was updated.
    Edited,
    /// The cell left editing with its original text; no write was made.
    Unchanged,
    /// The cell left editing with new text and a write was started.
    Committed(PendingWrite),
    /// A deactivation for a cell that was not editing.
    NotEditing,
    /// Row visibility was recomputed.
    Filtered(FilterOutcome),
}

/// An editable, filterable table bound to a persistence sink.
///
/// Each grid owns its table and tracks its own editing cells and filter
/// controls, so several grids can live side by side. Events are handled
/// synchronously; writes run on the Tokio runtime.
///
/// # Example
///
/// ```ignore
/// let table = Table::new("employees", ["Name", "Salary"]).with_row(["Alice", "1000"])?;
/// let client = ApplyClient::builder().url("http://localhost:5000").build()?;
/// let mut grid = EditableGrid::new(table, client);
///
/// let salary = CellRef::new(grid.table().row_id_at(0).unwrap(), 1);
/// grid.handle(GridEvent::Activate(salary))?;
/// grid.handle(GridEvent::Input { cell: salary, text: "1200".into() })?;
/// if let GridOutcome::Committed(write) = grid.handle(GridEvent::Deactivate(salary))? {
///     write.wait().await?;
/// }
/// ```
#[derive(Debug)]
pub struct EditableGrid {
    id: GridId,
    table: Table,
    editor: CellEditor,
    filter: ColumnFilter,
    dispatcher: ChangeDispatcher,
}

impl EditableGrid {
    /// Create a grid over `table` that writes changes to `sink`.
    pub fn new(table: Table, sink: impl ChangeSink + 'static) -> Self {
        Self::with_dispatcher(table, ChangeDispatcher::new(sink))
    }

    /// Create a grid sharing an existing dispatcher.
    pub fn with_dispatcher(table: Table, dispatcher: ChangeDispatcher) -> Self {
        Self {
            id: GridId::new(),
            table,
            editor: CellEditor::new(),
            filter: ColumnFilter::default(),
            dispatcher,
        }
    }

    /// Apply the grid-level settings of `config`.
    pub fn with_config(mut self, config: &GridConfig) -> Self {
        self.filter.set_mode(config.filter_mode);
        self
    }

    /// Replace the write outcome reporter.
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + 'static) -> Self {
        self.dispatcher = self.dispatcher.with_reporter(reporter);
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Returns the table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the editor state.
    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    /// Returns the filter state.
    pub fn filter(&self) -> &ColumnFilter {
        &self.filter
    }

    /// Attach a filter control to `column`.
    pub fn add_filter(&mut self, column: usize) -> Result<FilterId, GridError> {
        if column >= self.table.column_count() {
            return Err(GridError::ColumnOutOfRange {
                column,
                columns: self.table.column_count(),
            });
        }
        Ok(self.filter.add_control(column))
    }

    /// Handle one user gesture.
    pub fn handle(&mut self, event: GridEvent) -> Result<GridOutcome, GridError> {
        match event {
            GridEvent::Activate(cell) => self.activate(cell),
            GridEvent::Input { cell, text } => self.input(cell, text),
            GridEvent::Deactivate(cell) => self.deactivate(cell),
            GridEvent::Filter { control, text } => self.filter_input(control, &text),
        }
    }

    /// Begin editing `cell`.
    pub fn activate(&mut self, cell: CellRef) -> Result<GridOutcome, GridError> {
        match self.editor.activate(&self.table, cell)? {
            Activation::Started => Ok(GridOutcome::Editing),
            Activation::AlreadyEditing => Ok(GridOutcome::AlreadyEditing),
        }
    }

    /// Replace the text of an editing cell.
    pub fn input(&mut self, cell: CellRef, text: impl Into<String>) -> Result<GridOutcome, GridError> {
        if !self.editor.is_editing(cell) {
            return Err(GridError::NotEditing(cell));
        }
        self.table.set_cell_text(cell, text)?;
        Ok(GridOutcome::Edited)
    }

    /// Stop editing `cell`, starting a write if its text changed.
    ///
    /// The new text stays in the table whatever happens to the write.
    pub fn deactivate(&mut self, cell: CellRef) -> Result<GridOutcome, GridError> {
        match self.editor.deactivate(&self.table, cell)? {
            Commit::Changed(change) => {
                debug!("{}: writing {}", self.id, change);
                Ok(GridOutcome::Committed(self.dispatcher.dispatch(change)?))
            }
            Commit::Unchanged => Ok(GridOutcome::Unchanged),
            Commit::NotEditing => Ok(GridOutcome::NotEditing),
        }
    }

    /// Handle new text in a filter control.
    pub fn filter_input(&mut self, control: FilterId, text: &str) -> Result<GridOutcome, GridError> {
        let outcome = self.filter.on_input(&mut self.table, control, text)?;
        Ok(GridOutcome::Filtered(outcome))
    }

    /// Empty every filter control and show every row.
    pub fn clear_filters(&mut self) -> FilterOutcome {
        self.filter.clear(&mut self.table)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::editor::CellChange;
    use crate::error::ApiError;
    use crate::filter::FilterMode;
    use crate::response::ApplyResponse;

    #[derive(Default)]
    struct RecordingSink {
        changes: Mutex<Vec<CellChange>>,
    }

    #[async_trait]
    impl ChangeSink for Arc<RecordingSink> {
        async fn apply(&self, change: &CellChange) -> Result<ApplyResponse, ApiError> {
            self.changes.lock().unwrap().push(change.clone());
            Ok(ApplyResponse::from_body(200, ""))
        }
    }

    fn employees() -> Table {
        Table::new("employees", ["Name", "Salary"])
            .with_row(["Alice", "1000"])
            .unwrap()
    }

    fn grid() -> (EditableGrid, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (EditableGrid::new(employees(), sink.clone()), sink)
    }

    fn cell(grid: &EditableGrid, row: usize, column: usize) -> CellRef {
        CellRef::new(grid.table().row_id_at(row).unwrap(), column)
    }

    async fn settle(outcome: GridOutcome) {
        if let GridOutcome::Committed(write) = outcome {
            write.wait().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_salary_edit_sends_one_change() {
        let (mut grid, sink) = grid();
        let salary = cell(&grid, 0, 1);

        assert!(matches!(
            grid.handle(GridEvent::Activate(salary)),
            Ok(GridOutcome::Editing)
        ));
        grid.handle(GridEvent::Input {
            cell: salary,
            text: "1200".into(),
        })
        .unwrap();
        let outcome = grid.handle(GridEvent::Deactivate(salary)).unwrap();
        settle(outcome).await;

        assert_eq!(
            *sink.changes.lock().unwrap(),
            vec![CellChange {
                table_name: "employees".into(),
                column_label: "Salary".into(),
                row_label: "Alice".into(),
                new_value: "1200".into(),
            }]
        );
        assert_eq!(grid.table().cell_text(salary), Ok("1200"));
    }

    #[tokio::test]
    async fn test_unchanged_edit_sends_nothing() {
        let (mut grid, sink) = grid();
        let salary = cell(&grid, 0, 1);

        grid.activate(salary).unwrap();
        grid.input(salary, "1").unwrap();
        grid.input(salary, "1000").unwrap();
        assert!(matches!(grid.deactivate(salary), Ok(GridOutcome::Unchanged)));
        assert!(sink.changes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_key_edit_addresses_new_key() {
        let (mut grid, sink) = grid();
        let name = cell(&grid, 0, 0);

        grid.activate(name).unwrap();
        grid.input(name, "Alicia").unwrap();
        settle(grid.deactivate(name).unwrap()).await;

        let changes = sink.changes.lock().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].row_label, "Alicia");
    }

    #[test]
    fn test_input_requires_editing() {
        let (mut grid, _) = grid();
        let salary = cell(&grid, 0, 1);
        assert_eq!(
            grid.input(salary, "5").unwrap_err(),
            GridError::NotEditing(salary)
        );
        assert_eq!(grid.table().cell_text(salary), Ok("1000"));
    }

    #[test]
    fn test_commit_outside_runtime_keeps_text() {
        let (mut grid, _) = grid();
        let salary = cell(&grid, 0, 1);

        grid.activate(salary).unwrap();
        grid.input(salary, "1200").unwrap();
        assert_eq!(grid.deactivate(salary).unwrap_err(), GridError::NoRuntime);
        assert_eq!(grid.table().cell_text(salary), Ok("1200"));
        assert!(!grid.editor().is_editing(salary));
    }

    #[test]
    fn test_filter_scenario() {
        let (mut grid, _) = grid();
        let name = grid.add_filter(0).unwrap();

        grid.filter_input(name, "ali").unwrap();
        assert!(grid.table().rows()[0].is_visible());

        grid.filter_input(name, "bob").unwrap();
        assert!(!grid.table().rows()[0].is_visible());

        assert_eq!(grid.clear_filters().visible, 1);
    }

    #[test]
    fn test_add_filter_checks_column() {
        let (mut grid, _) = grid();
        assert_eq!(
            grid.add_filter(2),
            Err(GridError::ColumnOutOfRange {
                column: 2,
                columns: 2
            })
        );
    }

    #[tokio::test]
    async fn test_grids_are_independent() {
        let sink = Arc::new(RecordingSink::default());
        let mut first = EditableGrid::new(employees(), sink.clone());
        let projects = Table::new("projects", ["Code", "Owner"])
            .with_row(["P1", "Alice"])
            .unwrap();
        let mut second = EditableGrid::new(projects, sink.clone());
        assert_ne!(first.id(), second.id());

        let salary = cell(&first, 0, 1);
        let owner = cell(&second, 0, 1);
        first.activate(salary).unwrap();
        second.activate(owner).unwrap();
        first.input(salary, "1100").unwrap();
        second.input(owner, "Bob").unwrap();
        settle(second.deactivate(owner).unwrap()).await;
        settle(first.deactivate(salary).unwrap()).await;

        let changes = sink.changes.lock().unwrap();
        let tables: Vec<&str> = changes.iter().map(|c| c.table_name.as_str()).collect();
        assert_eq!(tables, ["projects", "employees"]);
        assert_eq!(changes[0].row_label, "P1");
        assert_eq!(changes[0].column_label, "Owner");
    }

    #[test]
    fn test_foreign_addresses_are_rejected() {
        let (mut first, _) = grid();
        let (mut second, _) = grid();
        let first_filter = first.add_filter(0).unwrap();
        second.add_filter(0).unwrap();

        // Position 0 exists in both grids but belongs to the first.
        let foreign = cell(&first, 0, 1);
        assert_eq!(
            second.activate(foreign).unwrap_err(),
            GridError::UnknownRow(foreign.row)
        );
        assert_eq!(second.editor().editing_count(), 0);
        assert_eq!(
            second.filter_input(first_filter, "zzz").unwrap_err(),
            GridError::UnknownFilter(first_filter)
        );
        assert_eq!(second.table().visible_rows().count(), 1);
    }

    #[test]
    fn test_config_sets_filter_mode() {
        let people = Table::new("people", ["Name", "City"])
            .with_row(["Alice", "Paris"])
            .unwrap()
            .with_row(["Bob", "Paris"])
            .unwrap();
        let mut combined = EditableGrid::new(people, Arc::new(RecordingSink::default()))
            .with_config(&GridConfig::default().with_filter_mode(FilterMode::Combined));
        let name = combined.add_filter(0).unwrap();
        let city = combined.add_filter(1).unwrap();

        combined.filter_input(name, "bob").unwrap();
        combined.filter_input(city, "paris").unwrap();
        let visible: Vec<&str> = combined.table().visible_rows().map(|r| r.key()).collect();
        assert_eq!(visible, ["Bob"]);
        assert!(combined.id().to_string().starts_with("grid#"));
    }

    #[derive(Default)]
    struct CountingReporter {
        applied: Mutex<Vec<String>>,
        failed: Mutex<usize>,
    }

    impl ErrorReporter for Arc<CountingReporter> {
        fn applied(&self, change: &CellChange, _response: &ApplyResponse) {
            self.applied.lock().unwrap().push(change.new_value.clone());
        }

        fn failed(&self, _change: &CellChange, _error: &ApiError) {
            *self.failed.lock().unwrap() += 1;
        }
    }

    #[tokio::test]
    async fn test_custom_reporter_sees_outcomes() {
        let reporter = Arc::new(CountingReporter::default());
        let sink = Arc::new(RecordingSink::default());
        let mut grid = EditableGrid::new(employees(), sink).with_reporter(reporter.clone());
        let salary = cell(&grid, 0, 1);

        grid.activate(salary).unwrap();
        grid.input(salary, "1300").unwrap();
        settle(grid.deactivate(salary).unwrap()).await;

        assert_eq!(*reporter.applied.lock().unwrap(), ["1300"]);
        assert_eq!(*reporter.failed.lock().unwrap(), 0);
    }
}
