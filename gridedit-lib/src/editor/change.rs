//! Committed cell change

use serde::Serialize;

use crate::model::CellAddress;

/// A committed cell edit, addressed by the labels read at commit time.
///
/// Serializes to the form fields the persistence endpoint expects:
/// `table_name`, `columnLabel`, `rowLabel` and `newValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellChange {
    /// Logical table name.
    pub table_name: String,
    /// Header text of the edited column.
    #[serde(rename = "columnLabel")]
    pub column_label: String,
    /// First-cell text of the edited row.
    #[serde(rename = "rowLabel")]
    pub row_label: String,
    /// The committed cell text.
    #[serde(rename = "newValue")]
    pub new_value: String,
}

impl CellChange {
    /// Creates a change from a cell address and the new text.
    pub fn new(address: CellAddress, new_value: impl Into<String>) -> Self {
        Self {
            table_name: address.table_name,
            column_label: address.column_label,
            row_label: address.row_label,
            new_value: new_value.into(),
        }
    }
}

impl std::fmt::Display for CellChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}].{} = {:?}",
            self.table_name, self.row_label, self.column_label, self.new_value
        )
    }
}
