//! Table, rows and cell addressing

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::GridError;

/// Unique identifier for a table instance.
///
/// A clone of a table keeps the id, so row ids stay valid on the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Stable identity of a row within one [`Table`].
///
/// Assigned on insertion and never reused. Unlike the row *key* (the text of
/// the first cell), a `RowId` does not change when the key cell is edited.
/// It carries the id of its table, so no other table resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId {
    table: TableId,
    index: usize,
}

impl RowId {
    /// Returns the id of the table the row belongs to.
    pub fn table(self) -> TableId {
        self.table
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/row#{}", self.table, self.index)
    }
}

/// Address of a body cell: a row id and a column ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// The row containing the cell.
    pub row: RowId,
    /// Column ordinal, matching the header ordinal.
    pub column: usize,
}

impl CellRef {
    /// Creates a new cell reference.
    pub fn new(row: RowId, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, col {})", self.row, self.column)
    }
}

/// Whether a row is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// The labels used to address a cell on the wire, read at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    /// Logical table name.
    pub table_name: String,
    /// Header text at the cell's column ordinal.
    pub column_label: String,
    /// Text of the first cell in the cell's row.
    pub row_label: String,
}

/// A body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    cells: Vec<String>,
    visibility: Visibility,
}

impl Row {
    /// Returns the row's stable id.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns the row key: the text of the first cell, or `""` for an empty row.
    pub fn key(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or("")
    }

    /// Returns the text of the cell at `column`, if present.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Returns all cell texts in column order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Returns `true` if the row is shown.
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }
}

/// A rendered table: a logical name, header labels and body rows.
///
/// The table is the single source of truth for cell text. Labels used for
/// persistence are always derived from its current contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    id: TableId,
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    next_row_id: usize,
}

impl Table {
    /// Creates an empty table with a logical name and header labels.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: TableId::new(),
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            next_row_id: 0,
        }
    }

    /// Appends a row. The row must have exactly one cell per header.
    pub fn push_row<I, S>(&mut self, cells: I) -> Result<RowId, GridError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if cells.len() != self.columns.len() {
            return Err(GridError::RowWidth {
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }

        let id = RowId {
            table: self.id,
            index: self.next_row_id,
        };
        self.next_row_id += 1;
        self.rows.push(Row {
            id,
            cells,
            visibility: Visibility::Visible,
        });
        Ok(id)
    }

    /// Builder-style variant of [`push_row`](Self::push_row).
    pub fn with_row<I, S>(mut self, cells: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells)?;
        Ok(self)
    }

    /// Returns the unique id of this table instance.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the logical table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the header labels.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the header label at `column`.
    pub fn column_label(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Returns all rows, visible or not, in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the visible rows in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.is_visible())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Returns the row with the given id.
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Returns the id of the row at display position `index`.
    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|r| r.id)
    }

    /// Returns the current text of a cell.
    pub fn cell_text(&self, cell: CellRef) -> Result<&str, GridError> {
        let row = self.row(cell.row).ok_or(GridError::UnknownRow(cell.row))?;
        row.cell(cell.column).ok_or(GridError::ColumnOutOfRange {
            column: cell.column,
            columns: self.columns.len(),
        })
    }

    /// Replaces the text of a cell.
    pub fn set_cell_text(&mut self, cell: CellRef, text: impl Into<String>) -> Result<(), GridError> {
        let columns = self.columns.len();
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == cell.row)
            .ok_or(GridError::UnknownRow(cell.row))?;
        let slot = row
            .cells
            .get_mut(cell.column)
            .ok_or(GridError::ColumnOutOfRange {
                column: cell.column,
                columns,
            })?;
        *slot = text.into();
        Ok(())
    }

    /// Reads the wire address of a cell from the table's current contents.
    ///
    /// The row label is whatever the first cell holds right now, so after
    /// editing a key cell the new key is returned.
    pub fn address(&self, cell: CellRef) -> Result<CellAddress, GridError> {
        let row = self.row(cell.row).ok_or(GridError::UnknownRow(cell.row))?;
        let column_label = self
            .column_label(cell.column)
            .ok_or(GridError::ColumnOutOfRange {
                column: cell.column,
                columns: self.columns.len(),
            })?;

        Ok(CellAddress {
            table_name: self.name.clone(),
            column_label: column_label.to_string(),
            row_label: row.key().to_string(),
        })
    }
}
