use std::sync::Mutex;

use rusqlite::types::ValueRef;
use rusqlite::Connection as RusqliteConnection;
use schemadb_core::{compare_scheme, ColumnMetadata, Connection, DriverError, QueryStringBuilder, Result, Row, RowHeader, Statement, TableScheme};

use crate::dialect::SqliteDialect;

/// SQLite backend over `rusqlite`. One native handle guarded by a mutex (spec.md §5: not
/// re-entrant, serializes concurrent callers at statement granularity). A busy handler is
/// installed at open time to retry indefinitely on `SQLITE_BUSY` instead of surfacing it
/// (SPEC_FULL.md §6).
pub struct SqliteConnection {
    handle: Mutex<RusqliteConnection>,
    dialect: SqliteDialect,
}

impl SqliteConnection {
    /// `database` is a filesystem path, or `":memory:"` for an in-memory database (spec.md §6).
    pub fn open(database: &str) -> Result<Self> {
        let handle = if database == ":memory:" {
            RusqliteConnection::open_in_memory()
        } else {
            RusqliteConnection::open(database)
        }
        .map_err(|err| DriverError::new(err.to_string()).with_source(err))?;

        handle
            .busy_handler(Some(|_retries| true))
            .map_err(|err| DriverError::new(err.to_string()).with_source(err))?;

        handle
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|err| DriverError::new(err.to_string()).with_source(err))?;

        Ok(Self {
            handle: Mutex::new(handle),
            dialect: SqliteDialect,
        })
    }

    pub fn open_config(config: &schemadb_core::ConnectionConfig) -> Result<Self> {
        Self::open(&config.database)
    }
}

fn driver_error(err: rusqlite::Error, sql: Option<&str>) -> schemadb_core::Error {
    let mut built = DriverError::new(err.to_string());
    if let Some(sql) = sql {
        built = built.with_sql(sql.to_string());
    }
    built.with_source(err).into()
}

impl Connection for SqliteConnection {
    fn query_builder(&self) -> &dyn QueryStringBuilder {
        &self.dialect
    }

    fn perform_impl(&self, statements: &[Statement], on_row: &mut dyn FnMut(&RowHeader, &Row) -> Result<()>) -> Result<()> {
        let handle = self.handle.lock().expect("sqlite connection mutex poisoned");

        for statement in statements {
            let text = statement.compose("?");
            let parameters = statement.parameters();

            // Every `Statement` here is exactly one SQL command (even a table-copy ALTER is
            // several `Statement`s, not one multi-statement string), so `prepare` always applies
            // and a parameterless SELECT/PRAGMA still yields its rows through `query`, unlike
            // `execute_batch`, which runs the text but never hands back a row cursor.
            let mut stmt = handle.prepare(&text).map_err(|err| driver_error(err, Some(&text)))?;
            let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
            let header = RowHeader::new(column_names.clone());

            let bind_values: Vec<rusqlite::types::Value> = parameters.iter().map(to_rusqlite_value).collect();
            let mut rows = stmt
                .query(rusqlite::params_from_iter(bind_values))
                .map_err(|err| driver_error(err, Some(&text)))?;

            while let Some(row) = rows.next().map_err(|err| driver_error(err, Some(&text)))? {
                let mut values = Vec::with_capacity(column_names.len());
                for index in 0..column_names.len() {
                    let raw = row.get_ref(index).map_err(|err| driver_error(err, Some(&text)))?;
                    values.push(render_value_ref(raw));
                }
                on_row(&header, &Row::new(values))?;
            }
        }

        Ok(())
    }

    fn verify_scheme(&self, scheme: &TableScheme) -> Result<()> {
        let handle = self.handle.lock().expect("sqlite connection mutex poisoned");
        let pragma = format!("PRAGMA table_info('{}');", scheme.name());
        let mut stmt = handle.prepare(&pragma).map_err(|err| driver_error(err, Some(&pragma)))?;

        let mut live = Vec::new();
        let mut rows = stmt.query([]).map_err(|err| driver_error(err, Some(&pragma)))?;
        while let Some(row) = rows.next().map_err(|err| driver_error(err, Some(&pragma)))? {
            let name: String = row.get(1).map_err(|err| driver_error(err, Some(&pragma)))?;
            let declared_type: String = row.get(2).map_err(|err| driver_error(err, Some(&pragma)))?;
            let not_null: i64 = row.get(3).map_err(|err| driver_error(err, Some(&pragma)))?;
            let default: Option<String> = row.get(4).map_err(|err| driver_error(err, Some(&pragma)))?;
            let pk: i64 = row.get(5).map_err(|err| driver_error(err, Some(&pragma)))?;

            live.push(ColumnMetadata {
                name,
                declared_type,
                default,
                nullable: not_null == 0,
                primary_key: pk != 0,
            });
        }

        compare_scheme(scheme, &live, &self.dialect)
    }
}

fn to_rusqlite_value(value: &schemadb_core::SqlValue) -> rusqlite::types::Value {
    use rusqlite::types::Value as RV;
    use schemadb_core::SqlValue;

    match value {
        SqlValue::Null | SqlValue::Empty => RV::Null,
        SqlValue::Integer(v) => RV::Integer(*v),
        SqlValue::String(s) | SqlValue::DateTime(s) => RV::Text(s.clone()),
        SqlValue::Blob(bytes) => RV::Blob(bytes.clone()),
    }
}

fn render_value_ref(raw: ValueRef<'_>) -> Option<String> {
    match raw {
        ValueRef::Null => None,
        ValueRef::Integer(v) => Some(v.to_string()),
        ValueRef::Real(v) => Some(v.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Some(bytes.iter().map(|b| format!("{b:02x}")).collect()),
    }
}

