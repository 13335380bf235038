use std::error::Error as StdError;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Structural violation detected while constructing a [`crate::TableScheme`] or looking up a
/// cell by [`crate::FieldId`].
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("column `{0}` has an empty name")]
    UnnamedColumn(String),
    #[error("scheme `{scheme}` declares more than one PRIMARY_KEY column: `{first}` and `{second}`")]
    DuplicatePrimaryKey {
        scheme: String,
        first: String,
        second: String,
    },
    #[error("field `{field}` is not declared in the scheme for `{owner}`")]
    FieldNotDeclared { owner: String, field: &'static str },
    #[error("scheme `{scheme}` declares field `{field}` on more than one cell")]
    DuplicateFieldId { scheme: String, field: &'static str },
}

/// Raised by [`crate::Facade::verify_scheme`] when a live table disagrees with the declared
/// scheme. The message names the offending column and the mismatching property.
#[derive(Debug, thiserror::Error)]
#[error("column `{column}` mismatch: {property} (expected {expected}, found {found})")]
pub struct SchemeMismatchError {
    pub column: String,
    pub property: &'static str,
    pub expected: String,
    pub found: String,
}

/// Row-materialization failure: an unknown column in the driver's header, or a converter that
/// failed to turn a raw column value back into a field.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown cell: {0}")]
    UnknownCell(String),
    #[error("failed to decode column `{column}`: {source}")]
    Conversion {
        column: String,
        #[source]
        source: ConversionError,
    },
}

/// A [`crate::TypeConverter::to`] rejected its input.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("value `{value}` is not a valid {expected_type}")]
    InvalidFormat { value: String, expected_type: &'static str },
    #[error("unexpected NULL for non-nullable column")]
    UnexpectedNull,
}

/// Raised by a backend for prepare/bind/execute failures. Carries the originating SQL when one
/// is available.
#[derive(Debug, thiserror::Error)]
#[error("driver error: {message}{}", sql.as_deref().map(|s| format!(" (sql: {s})")).unwrap_or_default())]
pub struct DriverError {
    pub message: String,
    pub sql: Option<String>,
    #[source]
    pub source: Option<BoxedError>,
}

impl DriverError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

/// A caller misused the API in a way that is not a schema, decode, or driver failure: updating
/// zero columns, or applying `rename_column` to a diff step that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("update query must set at least one column")]
    EmptyUpdate,
    #[error("no such column: `{0}`")]
    NoSuchColumn(String),
}

/// The single error taxonomy for this crate. Every fallible operation returns `Result<T>`;
/// nothing is recovered internally, matching spec.md §7's "no recovery inside the core" policy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    SchemeMismatch(#[from] SchemeMismatchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Usage(#[from] UsageError),
}

pub type Result<T> = std::result::Result<T, Error>;
