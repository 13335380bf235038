use crate::condition::Condition;
use crate::scheme::{Schema, TableScheme};

use super::common::OrderBy;

/// The `AS SELECT …` half of a CREATE, when present.
#[derive(Clone)]
pub struct CreateSource {
    scheme: &'static TableScheme,
    condition: Condition,
}

impl CreateSource {
    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

/// `CREATE TABLE IF NOT EXISTS <scheme>(...)`, or `CREATE TABLE IF NOT EXISTS <scheme> AS SELECT
/// … FROM <source> [WHERE …] [ORDER BY …]` when built via [`Create::as_select`].
#[derive(Clone)]
pub struct Create {
    scheme: &'static TableScheme,
    source: Option<CreateSource>,
    order_by: Vec<OrderBy>,
}

impl Create {
    #[must_use]
    pub fn new<T: Schema>() -> Self {
        Self {
            scheme: T::scheme(),
            source: None,
            order_by: Vec::new(),
        }
    }

    #[must_use]
    pub fn as_select<T: Schema, Source: Schema>(condition: Condition) -> Self {
        Self {
            scheme: T::scheme(),
            source: Some(CreateSource {
                scheme: Source::scheme(),
                condition,
            }),
            order_by: Vec::new(),
        }
    }

    #[must_use]
    pub fn order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn source(&self) -> Option<&CreateSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn order_by_list(&self) -> &[OrderBy] {
        &self.order_by
    }
}
