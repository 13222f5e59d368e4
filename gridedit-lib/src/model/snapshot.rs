//! JSON form of a rendered table

use serde::Deserialize;
use serde::Serialize;

use super::Table;
use crate::error::GridError;

/// A rendered table as the page hands it over: logical name, header labels,
/// body rows and the column ordinal of each filter control.
///
/// # Example
///
/// ```
/// use gridedit_lib::model::TableSnapshot;
///
/// let snapshot: TableSnapshot = serde_json::from_str(r#"{
///     "name": "employees",
///     "columns": ["Name", "Salary"],
///     "rows": [["Alice", "1000"]],
///     "filters": [0]
/// }"#).unwrap();
///
/// let table = snapshot.to_table().unwrap();
/// assert_eq!(table.name(), "employees");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Logical table name used as the persistence target.
    pub name: String,
    /// Header labels, in column order.
    pub columns: Vec<String>,
    /// Body rows; each must have one cell per column.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Column ordinal of each filter control, in control order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<usize>,
}

impl TableSnapshot {
    /// Builds a [`Table`] from this snapshot.
    pub fn to_table(&self) -> Result<Table, GridError> {
        let mut table = Table::new(self.name.clone(), self.columns.iter().cloned());
        for row in &self.rows {
            table.push_row(row.iter().cloned())?;
        }
        Ok(table)
    }
}

impl Table {
    /// Captures the table's current contents, hidden rows included.
    ///
    /// Filter controls are not part of the table, so `filters` is left empty.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            name: self.name().to_string(),
            columns: self.columns().to_vec(),
            rows: self.rows().iter().map(|r| r.cells().to_vec()).collect(),
            filters: Vec::new(),
        }
    }
}
