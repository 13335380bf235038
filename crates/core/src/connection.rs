use crate::dialect::QueryStringBuilder;
use crate::error::Result;
use crate::scheme::TableScheme;
use crate::statement::Statement;

/// Column-name → position map for one result set, as handed back by a driver alongside each row
/// (spec.md §4.8 "header + row char pointers").
#[derive(Debug, Clone)]
pub struct RowHeader {
    columns: Vec<String>,
}

impl RowHeader {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// One result row: nullable raw text values, index-aligned with [`RowHeader`]. The driver is
/// responsible for re-reading any truncated column buffer before handing the row to a callback
/// (spec.md §4.9).
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<Option<String>>,
}

impl Row {
    #[must_use]
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A single driver handle. Not re-entrant: implementations serialize concurrent callers at
/// statement granularity (spec.md §5), typically with an internal mutex around the native
/// handle. Shared by one or more [`crate::Facade`]s via `Arc`.
pub trait Connection: Send + Sync {
    fn query_builder(&self) -> &dyn QueryStringBuilder;

    /// Execute an ordered list of statements. If a statement carries bound parameters the
    /// implementation must prepare, bind positionally in declaration order, execute, then fetch
    /// rows one at a time, invoking `on_row` for each. Statements without bound parameters (DDL,
    /// transaction control) may be sent directly as text.
    fn perform_impl(&self, statements: &[Statement], on_row: &mut dyn FnMut(&RowHeader, &Row) -> Result<()>) -> Result<()>;

    /// Fetch live column metadata for `scheme`'s table and compare it against the declared
    /// scheme, failing on the first mismatch (spec.md §4.8).
    fn verify_scheme(&self, scheme: &TableScheme) -> Result<()>;
}
