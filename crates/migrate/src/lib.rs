//! Typed migration-task adapters (spec.md §4.10): small wrappers around a target [`Version`] and
//! a query-shaped closure over a [`Facade`], meant to be handed to an external, version-tracking
//! migration manager that this crate does not implement (spec.md §1 Out-of-scope).

use schemadb_core::{Alter, Create, Drop, Facade, Result, Schema, Version};

/// Implemented by every migration-task adapter. `description` is surfaced by the external
/// migration manager for logging/progress reporting; `target_version` tells it where this task
/// lands the schema.
pub trait MigrationTask {
    fn target_version(&self) -> &Version;
    fn description(&self) -> &str;

    /// Run the task, swallowing any driver/schema error into `false` (spec.md §7: "migration-task
    /// adapters catch driver errors and map them to a boolean failure for their caller"). Prefer
    /// [`apply_strict`](MigrationTask::apply_strict) when the caller wants to log or propagate the
    /// underlying error instead of losing it.
    fn apply(&self, facade: &Facade) -> bool {
        self.apply_strict(facade).is_ok()
    }

    /// Same operation as [`apply`](MigrationTask::apply), but surfaces the error instead of
    /// collapsing it to a bool. Not named in spec.md §4.10, which only specifies the
    /// boolean-returning form; added because silently losing the failure reason makes migration
    /// failures unnecessarily hard to diagnose, and the error-surfacing form is a strict
    /// superset, `apply` is defined in terms of it above.
    fn apply_strict(&self, facade: &Facade) -> Result<()>;
}

/// Creates `T`'s table. Mirrors `CREATE TABLE IF NOT EXISTS`, so running it against an
/// already-migrated database is a no-op rather than an error.
pub struct CreateTableTask<T: Schema> {
    version: Version,
    description: String,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Schema> CreateTableTask<T> {
    #[must_use]
    pub fn new(version: Version, description: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Schema> MigrationTask for CreateTableTask<T> {
    fn target_version(&self) -> &Version {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply_strict(&self, facade: &Facade) -> Result<()> {
        facade.execute(Create::new::<T>())
    }
}

/// Drops `T`'s table. Mirrors `DROP TABLE IF EXISTS`.
pub struct DeleteTableTask<T: Schema> {
    version: Version,
    description: String,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Schema> DeleteTableTask<T> {
    #[must_use]
    pub fn new(version: Version, description: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Schema> MigrationTask for DeleteTableTask<T> {
    fn target_version(&self) -> &Version {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply_strict(&self, facade: &Facade) -> Result<()> {
        facade.execute(Drop::new::<T>())
    }
}

/// Alters `Old`'s table into `New`'s shape. `rename_map` lists `(from_name, to_name)` pairs
/// applied in order via [`Alter::renaming_cell`] before the statement is lowered, so the
/// corresponding drop/add pairs from the automatic diff carry their column's data across instead
/// of destroying and recreating it (spec.md §4.10, §4.7).
pub struct AlterTableTask<Old: Schema, New: Schema> {
    version: Version,
    description: String,
    rename_map: Vec<(String, String)>,
    _marker: std::marker::PhantomData<(Old, New)>,
}

impl<Old: Schema, New: Schema> AlterTableTask<Old, New> {
    #[must_use]
    pub fn new(version: Version, description: impl Into<String>, rename_map: Vec<(String, String)>) -> Self {
        Self {
            version,
            description: description.into(),
            rename_map,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<Old: Schema, New: Schema> MigrationTask for AlterTableTask<Old, New> {
    fn target_version(&self) -> &Version {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply_strict(&self, facade: &Facade) -> Result<()> {
        let mut alter = Alter::new::<Old, New>();
        for (from_name, to_name) in &self.rename_map {
            alter = alter.renaming_cell(from_name, to_name)?;
        }
        facade.execute(alter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadb_core::{integer_converter, nullable, string_converter, Cell, FieldId, Flags, SqlValue, TableScheme};
    use schemadb_dialect_sqlite::SqliteConnection;
    use std::sync::Arc;

    #[derive(Default)]
    struct Student {
        id: i64,
        name: String,
    }

    impl Schema for Student {
        fn build_scheme() -> Result<TableScheme> {
            TableScheme::new(
                "student",
                vec![
                    Cell::new::<Student, i64>(FieldId("id"), "id", Flags::PRIMARY_KEY, integer_converter(), |s| s.id, |s, v| s.id = v),
                    Cell::new::<Student, String>(FieldId("name"), "name", Flags::NONE, string_converter(), |s| s.name.clone(), |s, v| {
                        s.name = v;
                    }),
                ],
            )
        }
    }

    #[derive(Default)]
    struct NewStudent {
        id: i64,
        full_name: String,
        bio: Option<String>,
    }

    impl Schema for NewStudent {
        fn build_scheme() -> Result<TableScheme> {
            TableScheme::new(
                "student",
                vec![
                    Cell::new::<NewStudent, i64>(FieldId("id"), "id", Flags::PRIMARY_KEY, integer_converter(), |s| s.id, |s, v| {
                        s.id = v;
                    }),
                    Cell::new::<NewStudent, String>(
                        FieldId("full_name"),
                        "full_name",
                        Flags::NONE,
                        string_converter(),
                        |s| s.full_name.clone(),
                        |s, v| s.full_name = v,
                    ),
                    Cell::new::<NewStudent, Option<String>>(
                        FieldId("bio"),
                        "bio",
                        Flags::NONE,
                        nullable(string_converter()),
                        |s| s.bio.clone(),
                        |s, v| s.bio = v,
                    ),
                ],
            )
        }
    }

    fn version(patch: u16) -> Version {
        Version { major: 1, minor: 0, patch }
    }

    #[test]
    fn create_then_delete_round_trips() {
        let facade = Facade::new(Arc::new(SqliteConnection::open(":memory:").unwrap()));
        let create = CreateTableTask::<Student>::new(version(1), "create student table");
        assert!(create.apply(&facade));

        assert!(facade.verify_scheme::<Student>().is_ok());

        let delete = DeleteTableTask::<Student>::new(version(2), "drop student table");
        assert!(delete.apply(&facade));
    }

    #[test]
    fn alter_task_preserves_renamed_column_data() {
        let facade = Facade::new(Arc::new(SqliteConnection::open(":memory:").unwrap()));
        facade.execute(Create::new::<Student>()).unwrap();
        facade
            .execute(schemadb_core::Insert::with_values(
                Student::scheme(),
                vec![
                    (schemadb_core::cell_of::<Student>(FieldId("id")).unwrap(), SqlValue::Integer(1)),
                    (schemadb_core::cell_of::<Student>(FieldId("name")).unwrap(), SqlValue::from("Ada")),
                ],
            ))
            .unwrap();

        let alter = AlterTableTask::<Student, NewStudent>::new(
            version(2),
            "rename name to full_name",
            vec![("name".to_string(), "full_name".to_string())],
        );
        assert!(alter.apply(&facade));

        let rows: Vec<NewStudent> = facade
            .receive(schemadb_core::Select::new::<NewStudent>())
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].full_name, "Ada");
    }

    #[test]
    fn apply_strict_surfaces_the_underlying_error() {
        let facade = Facade::new(Arc::new(SqliteConnection::open(":memory:").unwrap()));
        // Altering a table that was never created fails at the driver, not at task construction.
        let alter = AlterTableTask::<Student, NewStudent>::new(version(1), "alter missing table", vec![("name".to_string(), "full_name".to_string())]);
        assert!(alter.apply_strict(&facade).is_err());
    }
}
