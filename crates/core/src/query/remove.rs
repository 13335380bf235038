use crate::condition::Condition;
use crate::scheme::{Schema, TableScheme};

/// `DELETE FROM <scheme> [WHERE …]`.
#[derive(Clone)]
pub struct Remove {
    scheme: &'static TableScheme,
    condition: Condition,
}

impl Remove {
    #[must_use]
    pub fn new<T: Schema>() -> Self {
        Self {
            scheme: T::scheme(),
            condition: Condition::empty(),
        }
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
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}
