use schemadb_core::{
    render_generic_alter_clauses, Alter, CellRepresentation, InnerType, QueryStringBuilder, Result, Statement, Token, Transaction, TypeHint,
};

/// MySQL lowering. Column types, casts, and ALTER collapsing differ from SQLite's; everything
/// else reuses [`QueryStringBuilder`]'s generic default bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl CellRepresentation for MysqlDialect {
    fn type_name(&self, hint: TypeHint) -> String {
        match hint.inner {
            InnerType::Integer => "int".to_string(),
            InnerType::DateTime => "DATETIME".to_string(),
            InnerType::String | InnerType::Binary => "TEXT".to_string(),
        }
    }

    /// MySQL's `CAST` target spelling diverges from its column declaration spelling: an `int`
    /// column casts as `SIGNED` (spec.md §4.5).
    fn cast_type_name(&self, hint: TypeHint) -> String {
        match hint.inner {
            InnerType::Integer => "SIGNED".to_string(),
            InnerType::DateTime => "DATETIME".to_string(),
            InnerType::String | InnerType::Binary => "CHAR".to_string(),
        }
    }

    /// MySQL spells the keyword with an underscore, unlike SQLite's `AUTOINCREMENT`
    /// (spec.md §4.5 "AUTO(_)INCREMENT").
    fn autoincrement_keyword(&self) -> &'static str {
        "AUTO_INCREMENT"
    }
}

impl QueryStringBuilder for MysqlDialect {
    /// MySQL collapses every non-NoOp step into one `ALTER TABLE` statement with comma-separated
    /// clauses, rather than SQLite's one-statement-per-clause or table-copy forms (spec.md §4.7).
    fn alter_statement(&self, query: &Alter) -> Result<Vec<Statement>> {
        let table_clauses = render_generic_alter_clauses(self, query.scheme(), query.steps());
        if table_clauses.is_empty() {
            return Ok(Vec::new());
        }

        let table = query.scheme().name();
        let prefix = format!("{table} ");
        let clauses: Vec<&str> = table_clauses
            .iter()
            .map(|clause| clause.strip_prefix(&prefix).unwrap_or(clause.as_str()))
            .collect();

        let text = format!("ALTER TABLE {table} {};", clauses.join(", "));
        Ok(vec![Statement::new(vec![Token::Text(text)])])
    }

    /// MySQL rejects a prepared-statement `START TRANSACTION`; it must go over the wire as a
    /// direct text query (spec.md §4.5). `COMMIT`/`ROLLBACK` are unaffected and use the generic
    /// text form.
    fn transaction_statement(&self, tx: Transaction) -> Result<Vec<Statement>> {
        let text = match tx {
            Transaction::Begin => "START TRANSACTION;",
            Transaction::Commit => "COMMIT;",
            Transaction::Rollback => "ROLLBACK;",
        };
        Ok(vec![Statement::new(vec![Token::Text(text.to_string())])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadb_core::{Cell, FieldId, Flags, Schema, TableScheme};

    struct Student {
        id: i64,
        name: String,
    }

    impl Schema for Student {
        fn build_scheme() -> schemadb_core::Result<TableScheme> {
            TableScheme::new(
                "student",
                vec![
                    Cell::new::<Student, i64>(
                        FieldId("id"),
                        "id",
                        Flags::PRIMARY_KEY,
                        schemadb_core::integer_converter(),
                        |s| s.id,
                        |s, v| s.id = v,
                    ),
                    Cell::new::<Student, String>(
                        FieldId("name"),
                        "name",
                        Flags::NONE,
                        schemadb_core::string_converter(),
                        |s| s.name.clone(),
                        |s, v| s.name = v,
                    ),
                ],
            )
        }
    }

    #[test]
    fn alter_collapses_steps_into_one_statement() {
        struct NewStudent {
            id: i64,
            full_name: String,
        }
        impl Schema for NewStudent {
            fn build_scheme() -> schemadb_core::Result<TableScheme> {
                TableScheme::new(
                    "student",
                    vec![
                        Cell::new::<NewStudent, i64>(
                            FieldId("id"),
                            "id",
                            Flags::PRIMARY_KEY,
                            schemadb_core::integer_converter(),
                            |s| s.id,
                            |s, v| s.id = v,
                        ),
                        Cell::new::<NewStudent, String>(
                            FieldId("full_name"),
                            "full_name",
                            Flags::NONE,
                            schemadb_core::string_converter(),
                            |s| s.full_name.clone(),
                            |s, v| s.full_name = v,
                        ),
                    ],
                )
            }
        }

        let dialect = MysqlDialect;
        let alter = Alter::new::<Student, NewStudent>().renaming_cell("name", "full_name").unwrap();
        let statements = dialect.alter_statement(&alter).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].compose("?"), "ALTER TABLE student RENAME COLUMN name TO full_name;");
    }

    #[test]
    fn begin_transaction_renders_start_transaction_as_direct_text() {
        let dialect = MysqlDialect;
        let statements = dialect.transaction_statement(Transaction::Begin).unwrap();
        assert_eq!(statements[0].compose("?"), "START TRANSACTION;");
        assert!(statements[0].parameters().is_empty());
    }

    #[test]
    fn integer_casts_as_signed() {
        let dialect = MysqlDialect;
        assert_eq!(dialect.type_name(TypeHint::new(InnerType::Integer)), "int");
        assert_eq!(dialect.cast_type_name(TypeHint::new(InnerType::Integer)), "SIGNED");
    }

    #[test]
    fn autoincrement_spells_with_underscore() {
        let dialect = MysqlDialect;
        let cell = Cell::new::<Student, i64>(
            FieldId("id"),
            "id",
            Flags::PRIMARY_KEY | Flags::AUTOINCREMENT,
            schemadb_core::integer_converter(),
            |s| s.id,
            |s, v| s.id = v,
        );
        assert_eq!(dialect.column_definition(&cell), "id int PRIMARY KEY AUTO_INCREMENT");
    }
}
