//! MySQL backend for `schemadb-core`: the [`MysqlDialect`] lowering and the [`MysqlConnection`]
//! driver built on the `mysql` crate.

mod connection;
mod dialect;

pub use connection::MysqlConnection;
pub use dialect::MysqlDialect;
