use crate::diff::{generate_conversion_steps, rename_column, DiffAction};
use crate::error::Result;
use crate::scheme::{Schema, TableScheme};

/// `ALTER TABLE <scheme> …`: a source scheme plus the ordered diff steps to apply (spec.md §3,
/// §4.6, §4.7). Built from two record types via [`Alter::new`]; `renaming_cell` reclassifies a
/// drop/add pair produced by the automatic diff into a single rename, preserving the column's
/// data.
#[derive(Clone)]
pub struct Alter {
    scheme: &'static TableScheme,
    target_name: String,
    steps: Vec<DiffAction>,
}

impl Alter {
    #[must_use]
    pub fn new<Old: Schema, New: Schema>() -> Self {
        let from = Old::scheme();
        let to = New::scheme();
        let steps = generate_conversion_steps(from, to);
        Self {
            scheme: from,
            target_name: to.name().to_string(),
            steps,
        }
    }

    pub fn renaming_cell(mut self, from_name: &str, to_name: &str) -> Result<Self> {
        rename_column(&mut self.steps, from_name, to_name)?;
        Ok(self)
    }

    #[must_use]
    pub fn scheme(&self) -> &'static TableScheme {
        self.scheme
    }

    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    #[must_use]
    pub fn steps(&self) -> &[DiffAction] {
        &self.steps
    }
}
