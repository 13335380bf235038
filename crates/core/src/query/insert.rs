use crate::cell::Cell;
use crate::scheme::{Schema, TableScheme};
use crate::value::SqlValue;

/// `INSERT INTO <scheme> (c1,…) VALUES (v1,…)`. Built from a live record: every declared cell is
/// serialized against it (spec.md §3 "Insert: cells to insert with serialized values").
#[derive(Clone)]
pub struct Insert {
    scheme: &'static TableScheme,
    values: Vec<(Cell, SqlValue)>,
}

impl Insert {
    #[must_use]
    pub fn new<T: Schema>(record: &T) -> Self {
        let scheme = T::scheme();
        let values = scheme
            .cells()
            .iter()
            .map(|cell| (cell.clone(), cell.serialize(record)))
            .collect();
        Self { scheme, values }
    }

    /// Build directly from explicit (cell, value) pairs, bypassing record serialization.
    /// Useful when only a subset of columns should be supplied and the rest left to their
    /// DEFAULT.
    #[must_use]
    pub fn with_values(scheme: &'static TableScheme, values: Vec<(Cell, SqlValue)>) -> Self {
        Self { scheme, values }
    }

    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn values(&self) -> &[(Cell, SqlValue)] {
        &self.values
    }
}
