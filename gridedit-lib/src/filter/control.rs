//! Filter controls

/// Identifier of a filter control within one [`ColumnFilter`](super::ColumnFilter).
///
/// Carries the id of the filter that created it; other filters reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId {
    owner: usize,
    index: usize,
}

impl FilterId {
    pub(super) fn new(owner: usize, index: usize) -> Self {
        Self { owner, index }
    }

    pub(super) fn owner(self) -> usize {
        self.owner
    }

    pub(super) fn index(self) -> usize {
        self.index
    }
}

impl std::fmt::Display for FilterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "filter#{}.{}", self.owner, self.index)
    }
}

/// A filter input bound to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    id: FilterId,
    column: usize,
    text: String,
}

impl FilterControl {
    pub(super) fn new(id: FilterId, column: usize) -> Self {
        Self {
            id,
            column,
            text: String::new(),
        }
    }

    /// Returns the control id.
    pub fn id(&self) -> FilterId {
        self.id
    }

    /// Returns the column ordinal this control filters.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the text last typed into the control.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the control has no text and therefore matches every row.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(super) fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Returns `true` if `cell` contains this control's text, ignoring case.
    ///
    /// A missing cell is matched as empty text.
    pub fn matches(&self, cell: Option<&str>) -> bool {
        contains_ignore_case(cell.unwrap_or(""), &self.text)
    }
}

/// Case-insensitive substring test. An empty needle always matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
