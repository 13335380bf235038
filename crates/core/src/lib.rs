//! Typed relational-database facade: declare record types and their table mapping, compose
//! strongly-typed SQL through a condition/token AST, lower it through a pluggable dialect, and
//! execute it over a driver-agnostic [`Connection`]. See the crate's companion dialect crates
//! (`schemadb-dialect-sqlite`, `schemadb-dialect-mysql`) for concrete backends, and
//! `schemadb-migrate` for the version-tracked migration task adapters.

pub mod accessor;
pub mod cell;
pub mod condition;
pub mod config;
pub mod connection;
pub mod constraint;
pub mod converter;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod facade;
pub mod query;
pub mod scheme;
pub mod statement;
pub mod token;
pub mod value;
pub mod verify;

pub use accessor::{ErasedAccessor, FieldId, TypedAccessor};
pub use cell::{Cell, Flags};
pub use condition::{field, Condition};
pub use config::{ConnectionConfig, Version};
pub use connection::{Connection, Row, RowHeader};
pub use constraint::{Action, Constraint, ForeignKey, Trigger};
pub use converter::{datetime_converter, integer_converter, nullable, string_converter, TypeConverter};
pub use dialect::{render_generic_alter_clauses, CellRepresentation, QueryStringBuilder};
pub use diff::{generate_conversion_steps, rename_column, DiffAction};
pub use error::{ConversionError, DecodeError, DriverError, Error, Result, SchemaError, SchemeMismatchError, UsageError};
pub use facade::{DataRetriever, Decodable, Facade};
pub use query::{Alter, Create, CreateSource, Direction, Drop, Insert, Join, OrderBy, Query, Remove, ResultLimit, Select, Transaction, Update};
pub use scheme::{cell_of, Schema, TableScheme};
pub use statement::Statement;
pub use token::{Token, TokenStream};
pub use value::{InnerType, SqlValue, TypeHint};
pub use verify::{compare_scheme, ColumnMetadata};

/// Library version, `"G.M.m"`, substituted at build time (spec.md §6).
#[must_use]
pub fn get_version() -> String {
    config::Version::current().to_string()
}

/// Comma-separated component list this build was assembled from.
#[must_use]
pub const fn get_components() -> &'static str {
    "core"
}
