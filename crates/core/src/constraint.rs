use crate::accessor::FieldId;
use crate::dialect::QueryStringBuilder;
use crate::error::Result;
use crate::scheme::TableScheme;

/// A polymorphic schema-level constraint capable of rendering itself through a dialect builder.
/// Only `ForeignKey` is specified (spec.md §3); other constraint kinds can implement this trait
/// without changing [`TableScheme`].
pub trait Constraint: Send + Sync {
    fn render(&self, builder: &dyn QueryStringBuilder, scheme: &TableScheme) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    OnUpdate,
    OnDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NoAction,
    Restrict,
    SetNull,
    SetDefault,
    Cascade,
}

impl Trigger {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::OnUpdate => "ON UPDATE",
            Self::OnDelete => "ON DELETE",
        }
    }
}

impl Action {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Cascade => "CASCADE",
        }
    }
}

/// `FOREIGN KEY (owning_column) REFERENCES foreign_table(foreign_column) [ON UPDATE|DELETE ...]`.
pub struct ForeignKey {
    owning_column: FieldId,
    foreign_table: String,
    foreign_column: String,
    triggers: Vec<(Trigger, Action)>,
}

impl ForeignKey {
    #[must_use]
    pub fn new(
        owning_column: FieldId,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
        triggers: Vec<(Trigger, Action)>,
    ) -> Self {
        Self {
            owning_column,
            foreign_table: foreign_table.into(),
            foreign_column: foreign_column.into(),
            triggers,
        }
    }

    #[must_use]
    pub fn owning_column(&self) -> FieldId {
        self.owning_column
    }

    #[must_use]
    pub fn foreign_table(&self) -> &str {
        &self.foreign_table
    }

    #[must_use]
    pub fn foreign_column(&self) -> &str {
        &self.foreign_column
    }

    #[must_use]
    pub fn triggers(&self) -> &[(Trigger, Action)] {
        &self.triggers
    }
}

impl Constraint for ForeignKey {
    fn render(&self, builder: &dyn QueryStringBuilder, scheme: &TableScheme) -> Result<String> {
        builder.render_foreign_key(self, scheme)
    }
}
