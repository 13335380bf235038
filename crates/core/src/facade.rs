use std::sync::Arc;

use crate::connection::{Connection, Row, RowHeader};
use crate::error::{DecodeError, Result};
use crate::query::{Query, Transaction};
use crate::scheme::Schema;

/// Materialize one record (or tuple of records, for a join projection) from a decoded row. The
/// row-decoding algorithm (spec.md §4.8): for each `(column name, index)` in the header, find the
/// cell that declares it, in the record's own scheme for a single type, or by trying each
/// tuple element's scheme in turn for a join, and deserialize the raw value into it. An
/// unmatched column name is a [`DecodeError::UnknownCell`].
pub trait Decodable: Sized {
    fn decode(header: &RowHeader, row: &Row) -> Result<Self>;
}

fn deserialize_into<T: 'static>(cell: &crate::cell::Cell, raw: Option<&str>, target: &mut T, column: &str) -> Result<()> {
    cell.deserialize(raw, target).map_err(|err| match err {
        crate::error::Error::Conversion(source) => DecodeError::Conversion {
            column: column.to_string(),
            source,
        }
        .into(),
        other => other,
    })
}

impl<T: Schema + Default + 'static> Decodable for T {
    fn decode(header: &RowHeader, row: &Row) -> Result<Self> {
        let mut target = T::default();
        let scheme = T::scheme();
        for (index, name) in header.columns().iter().enumerate() {
            let cell = scheme
                .find_cell(name)
                .ok_or_else(|| DecodeError::UnknownCell(name.clone()))?;
            deserialize_into(&cell, row.get(index), &mut target, name)?;
        }
        Ok(target)
    }
}

macro_rules! impl_decodable_tuple {
    ($($idx:tt => $t:ident),+) => {
        impl<$($t: Schema + Default + 'static),+> Decodable for ($($t,)+) {
            fn decode(header: &RowHeader, row: &Row) -> Result<Self> {
                let mut targets = ($($t::default(),)+);
                for (index, name) in header.columns().iter().enumerate() {
                    let raw = row.get(index);
                    let mut matched = false;
                    $(
                        if !matched {
                            if let Some(cell) = $t::scheme().find_cell(name) {
                                deserialize_into(&cell, raw, &mut targets.$idx, name)?;
                                matched = true;
                            }
                        }
                    )+
                    if !matched {
                        return Err(DecodeError::UnknownCell(name.clone()).into());
                    }
                }
                Ok(targets)
            }
        }
    };
}

impl_decodable_tuple!(0 => A, 1 => B);
impl_decodable_tuple!(0 => A, 1 => B, 2 => C);
impl_decodable_tuple!(0 => A, 1 => B, 2 => C, 3 => D);

/// A not-yet-materialized result set, returned by [`Facade::receive`]. Consuming it via
/// [`DataRetriever::collect`] drives the row decoder; the target type `T` (a record or a tuple of
/// records) chooses which decoding path runs.
pub struct DataRetriever {
    rows: Vec<(RowHeader, Row)>,
}

impl DataRetriever {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn collect<T: Decodable>(self) -> Result<Vec<T>> {
        self.rows
            .into_iter()
            .map(|(header, row)| T::decode(&header, &row))
            .collect()
    }
}

/// User-facing handle combining a [`Connection`] with convenience methods for execute, receive,
/// transaction, and scheme verification (spec.md §4.8). Cheaply cloneable: clones share the same
/// underlying connection and therefore the same driver-level serialization.
#[derive(Clone)]
pub struct Facade {
    connection: Arc<dyn Connection>,
}

impl Facade {
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    /// Lower and run a query with no result callback.
    pub fn execute(&self, query: impl Into<Query>) -> Result<()> {
        let statements = query.into().lower(self.connection.query_builder())?;
        self.connection.perform_impl(&statements, &mut |_, _| Ok(()))
    }

    /// Lower and run a query, buffering every row for later decoding.
    pub fn receive(&self, query: impl Into<Query>) -> Result<DataRetriever> {
        let statements = query.into().lower(self.connection.query_builder())?;
        let mut rows = Vec::new();
        self.connection.perform_impl(&statements, &mut |header, row| {
            rows.push((header.clone(), row.clone()));
            Ok(())
        })?;
        Ok(DataRetriever { rows })
    }

    pub fn verify_scheme<T: Schema>(&self) -> Result<()> {
        self.connection.verify_scheme(T::scheme())
    }

    /// `BEGIN`, run `body` (which may issue further queries against `self`), then `COMMIT` if it
    /// returns `true` or `ROLLBACK` otherwise. No nesting; a failing statement inside `body` does
    /// not auto-rollback. Propagate the error out of `body` and return `false` to roll back
    /// explicitly (spec.md §5, §4.8).
    pub fn exec_transaction(&self, body: impl FnOnce(&Facade) -> bool) -> Result<()> {
        self.execute(Transaction::Begin)?;
        let commit = body(self);
        self.execute(if commit { Transaction::Commit } else { Transaction::Rollback })
    }

    /// Run every query in `queries` inside one transaction that always commits.
    pub fn exec_transaction_all(&self, queries: impl IntoIterator<Item = Query>) -> Result<()> {
        self.execute(Transaction::Begin)?;
        for query in queries {
            let statements = query.lower(self.connection.query_builder())?;
            self.connection.perform_impl(&statements, &mut |_, _| Ok(()))?;
        }
        self.execute(Transaction::Commit)
    }
}
