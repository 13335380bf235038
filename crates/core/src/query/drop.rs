use crate::scheme::Schema;

/// `DROP TABLE IF EXISTS <name>`.
#[derive(Clone)]
pub struct Drop {
    name: String,
}

impl Drop {
    #[must_use]
    pub fn new<T: Schema>() -> Self {
        Self {
            name: T::scheme().name().to_string(),
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
