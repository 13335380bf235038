use crate::cell::Cell;
use crate::condition::Condition;
use crate::scheme::{Schema, TableScheme};

use super::common::{Direction, Join, OrderBy, ResultLimit};

/// `SELECT <projection> FROM <scheme> [JOIN …] [WHERE …] [ORDER BY …] [LIMIT …]`. An empty
/// projection renders as `*` (spec.md §4.5).
#[derive(Clone)]
pub struct Select {
    scheme: &'static TableScheme,
    projection: Vec<Cell>,
    condition: Condition,
    joins: Vec<Join>,
    order_by: Vec<OrderBy>,
    limit: ResultLimit,
}

impl Select {
    #[must_use]
    pub fn new<T: Schema>() -> Self {
        Self {
            scheme: T::scheme(),
            projection: Vec::new(),
            condition: Condition::empty(),
            joins: Vec::new(),
            order_by: Vec::new(),
            limit: ResultLimit::default(),
        }
    }

    #[must_use]
    pub fn project(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.projection.extend(cells);
        self
    }

    #[must_use]
    pub fn where_clause(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn join<T: Schema>(mut self, on: Condition) -> Self {
        self.joins.push(Join::new::<T>(on));
        self
    }

    #[must_use]
    pub fn order_by(mut self, cell: Cell, direction: Direction) -> Self {
        self.order_by.push(OrderBy::new(cell, direction));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = ResultLimit::new(self.limit.offset(), Some(limit));
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit = ResultLimit::new(offset, self.limit.limit());
        self
    }

    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn projection(&self) -> &[Cell] {
        &self.projection
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub fn order_by_list(&self) -> &[OrderBy] {
        &self.order_by
    }

    #[must_use]
    pub fn result_limit(&self) -> ResultLimit {
        self.limit
    }
}
