use crate::cell::Cell;
use crate::condition::Condition;
use crate::dialect::QueryStringBuilder;
use crate::error::Result;
use crate::scheme::{Schema, TableScheme};
use crate::statement::Statement;

use super::{Alter, Create, Drop, Insert, Remove, Select, Update};

/// One `JOIN <table> ON <condition>` clause. Join order is construction order (spec.md §4.5).
#[derive(Clone)]
pub struct Join {
    scheme: &'static TableScheme,
    on: Condition,
}

impl Join {
    #[must_use]
    pub fn new<T: Schema>(on: Condition) -> Self {
        Self {
            scheme: T::scheme(),
            on,
        }
    }

    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn on(&self) -> &Condition {
        &self.on
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Clone)]
pub struct OrderBy {
    cell: Cell,
    direction: Direction,
}

impl OrderBy {
    #[must_use]
    pub fn new(cell: Cell, direction: Direction) -> Self {
        Self { cell, direction }
    }

    #[must_use]
    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// `(offset, limit)` with `None` as the "infinite" sentinel for `limit`. `defined()` tells a
/// dialect whether to render a `LIMIT` clause at all; SQLite renders infinite as `-1` rather than
/// omitting the clause once an offset is present (spec.md §3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultLimit {
    offset: u64,
    limit: Option<u64>,
}

impl ResultLimit {
    #[must_use]
    pub const fn new(offset: u64, limit: Option<u64>) -> Self {
        Self { offset, limit }
    }

    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }

    #[must_use]
    pub const fn limit(self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub const fn finite(self) -> bool {
        self.limit.is_some()
    }

    #[must_use]
    pub const fn defined(self) -> bool {
        self.offset > 0 || self.finite()
    }
}

/// The three transaction-control statements. Carries no schema or condition, unlike every other
/// query kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Begin,
    Commit,
    Rollback,
}

/// A tagged union over every query kind (spec.md §3 "Query objects"), replacing a CRTP-style
/// `SerializableSqlQuery<Derived>` double dispatch (see SPEC_FULL.md §1) with a plain enum that
/// [`QueryStringBuilder`] lowers through one method per variant.
pub enum Query {
    Create(Create),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Remove(Remove),
    Alter(Alter),
    Drop(Drop),
    Transaction(Transaction),
}

impl Query {
    pub fn lower(&self, builder: &dyn QueryStringBuilder) -> Result<Vec<Statement>> {
        match self {
            Self::Create(query) => builder.create_statement(query),
            Self::Insert(query) => builder.insert_statement(query),
            Self::Select(query) => builder.select_statement(query),
            Self::Update(query) => builder.update_statement(query),
            Self::Remove(query) => builder.remove_statement(query),
            Self::Alter(query) => builder.alter_statement(query),
            Self::Drop(query) => builder.drop_statement(query),
            Self::Transaction(tx) => builder.transaction_statement(*tx),
        }
    }
}

macro_rules! impl_from_query_variant {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Query {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_from_query_variant!(Create, Create);
impl_from_query_variant!(Insert, Insert);
impl_from_query_variant!(Select, Select);
impl_from_query_variant!(Update, Update);
impl_from_query_variant!(Remove, Remove);
impl_from_query_variant!(Alter, Alter);
impl_from_query_variant!(Drop, Drop);
impl_from_query_variant!(Transaction, Transaction);
