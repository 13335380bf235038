use crate::cell::{Cell, Flags};
use crate::condition::Condition;
use crate::scheme::{Schema, TableScheme};
use crate::value::SqlValue;

/// `UPDATE <scheme> SET c1=?,… [WHERE …]`. Lowering rejects an empty assignment list with
/// [`crate::error::UsageError::EmptyUpdate`] (spec.md §4.5), checked at statement-build time, not
/// here, since a caller may still add assignments with `.set(...)` after construction.
#[derive(Clone)]
pub struct Update {
    scheme: &'static TableScheme,
    assignments: Vec<(Cell, SqlValue)>,
    condition: Condition,
}

impl Update {
    #[must_use]
    pub fn new<T: Schema>() -> Self {
        Self {
            scheme: T::scheme(),
            assignments: Vec::new(),
            condition: Condition::empty(),
        }
    }

    /// Build a full-row update: every non-PK cell becomes a SET assignment, and the PK's current
    /// value becomes the WHERE clause. Mirrors "constructed from a full row" in spec.md §4.5.
    #[must_use]
    pub fn from_record<T: Schema>(record: &T) -> Self {
        let scheme = T::scheme();
        let mut assignments = Vec::new();
        let mut condition = Condition::empty();

        for cell in scheme.cells() {
            let value = cell.serialize(record);
            if cell.flags().contains(Flags::PRIMARY_KEY) {
                condition = Condition::column(cell).eq(value);
            } else {
                assignments.push((cell.clone(), value));
            }
        }

        Self {
            scheme,
            assignments,
            condition,
        }
    }

    #[must_use]
    pub fn set(mut self, cell: Cell, value: impl Into<SqlValue>) -> Self {
        self.assignments.push((cell, value.into()));
        self
    }

    #[must_use]
    pub fn where_clause(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn assignments(&self) -> &[(Cell, SqlValue)] {
        &self.assignments
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}
