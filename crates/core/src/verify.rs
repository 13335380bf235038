use crate::cell::Flags;
use crate::dialect::CellRepresentation;
use crate::error::{Result, SchemeMismatchError};
use crate::scheme::TableScheme;

/// One live column's properties as read back from the database (`PRAGMA table_info` / `DESCRIBE`
/// results, normalized per backend). Compared against a declared [`crate::Cell`] by
/// [`compare_scheme`].
#[derive(Debug, Clone)]
pub struct ColumnMetadata {
    pub name: String,
    pub declared_type: String,
    /// `None` when the column has no DEFAULT; an empty string is treated the same as `None`
    /// (spec.md §4.8: `""`/`<null>` treated as empty).
    pub default: Option<String>,
    pub nullable: bool,
    pub primary_key: bool,
}

fn normalize_default(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn mismatch(column: &str, property: &'static str, expected: impl Into<String>, found: impl Into<String>) -> crate::error::Error {
    SchemeMismatchError {
        column: column.to_string(),
        property,
        expected: expected.into(),
        found: found.into(),
    }
    .into()
}

/// Compare `scheme` against `live` column-by-column: name, declared type (case-insensitive),
/// DEFAULT, nullability, and PRIMARY_KEY presence. Fails with [`SchemeMismatchError`] at the
/// first disagreement; after every live column is matched, any scheme column absent from `live`
/// also produces a mismatch (spec.md §4.8).
pub fn compare_scheme(scheme: &TableScheme, live: &[ColumnMetadata], representation: &dyn CellRepresentation) -> Result<()> {
    for column in live {
        let Some(cell) = scheme.find_cell(&column.name) else {
            return Err(mismatch(&column.name, "presence", "undeclared", "present in live table"));
        };

        let expected_type = representation.type_name(cell.type_hint());
        if !expected_type.eq_ignore_ascii_case(&column.declared_type) {
            return Err(mismatch(&column.name, "type", expected_type, column.declared_type.clone()));
        }

        let expected_default = cell
            .flags()
            .contains(Flags::DEFAULT)
            .then(|| representation.render_literal(cell.default(), cell.type_hint()));
        if normalize_default(&expected_default) != normalize_default(&column.default) {
            return Err(mismatch(
                &column.name,
                "default",
                expected_default.unwrap_or_default(),
                column.default.clone().unwrap_or_default(),
            ));
        }

        let expected_pk = cell.flags().contains(Flags::PRIMARY_KEY);

        // A declared PRIMARY_KEY column is exempt from the nullable check: SQLite's
        // `PRAGMA table_info` reports `notnull = 0` for a plain `INTEGER PRIMARY KEY` regardless
        // of the cell's converter, and `column_definition` doesn't emit `NOT NULL` for it either
        // (it would be redundant with the PRIMARY KEY clause), so the two sides never agree here.
        if !expected_pk && cell.is_nullable() != column.nullable {
            return Err(mismatch(&column.name, "nullable", cell.is_nullable().to_string(), column.nullable.to_string()));
        }

        if expected_pk != column.primary_key {
            return Err(mismatch(&column.name, "primary_key", expected_pk.to_string(), column.primary_key.to_string()));
        }
    }

    for cell in scheme.cells() {
        if !live.iter().any(|column| column.name == cell.unqualified_name()) {
            return Err(mismatch(cell.unqualified_name(), "presence", "present in live table", "missing"));
        }
    }

    Ok(())
}
