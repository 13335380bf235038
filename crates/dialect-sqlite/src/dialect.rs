use schemadb_core::{
    render_generic_alter_clauses, Alter, CellRepresentation, DiffAction, InnerType, QueryStringBuilder, ResultLimit, Statement,
    TableScheme, Token, TypeHint,
};

/// SQLite lowering. Everything but ALTER uses [`QueryStringBuilder`]'s generic default bodies;
/// ALTER is fully owned here because of the table-copy special case (spec.md §4.7).
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl CellRepresentation for SqliteDialect {
    fn type_name(&self, hint: TypeHint) -> String {
        match hint.inner {
            InnerType::Integer => "INTEGER".to_string(),
            InnerType::DateTime => "DATETIME".to_string(),
            InnerType::String | InnerType::Binary => "TEXT".to_string(),
        }
    }

    fn cast_type_name(&self, hint: TypeHint) -> String {
        self.type_name(hint)
    }
}

impl QueryStringBuilder for SqliteDialect {
    fn render_limit(&self, limit: ResultLimit) -> String {
        match limit.limit() {
            Some(n) => format!(" LIMIT {}, {n}", limit.offset()),
            None => format!(" LIMIT {}, -1", limit.offset()),
        }
    }

    fn alter_statement(&self, query: &Alter) -> schemadb_core::Result<Vec<Statement>> {
        let has_drop = query.steps().iter().any(|step| matches!(step, DiffAction::DropColumn(_)));

        if !has_drop {
            return Ok(render_generic_alter_clauses(self, query.scheme(), query.steps())
                .into_iter()
                .map(|clause| Statement::new(vec![Token::Text(format!("ALTER TABLE {clause};"))]))
                .collect());
        }

        Ok(table_copy_alter(self, query))
    }
}

/// The five-statement table-copy ALTER SQLite needs whenever a step drops a column (SPEC_FULL.md
/// §6 / spec.md §4.7): `BEGIN`, `CREATE TABLE tmp_<t> AS SELECT <projected columns> FROM <t>`,
/// `DROP TABLE <t>`, `ALTER TABLE tmp_<t> RENAME TO <target>`, `COMMIT`.
fn table_copy_alter(representation: &dyn CellRepresentation, query: &Alter) -> Vec<Statement> {
    let scheme: &TableScheme = query.scheme();
    let tmp_name = format!("tmp_{}", scheme.name());
    let columns = representation.projected_columns(scheme.cells(), query.steps());

    vec![
        Statement::new(vec![Token::Text("BEGIN TRANSACTION;".to_string())]),
        Statement::new(vec![Token::Text(format!(
            "CREATE TABLE {tmp_name} AS SELECT {} FROM {};",
            columns.join(", "),
            scheme.name()
        ))]),
        Statement::new(vec![Token::Text(format!("DROP TABLE {};", scheme.name()))]),
        Statement::new(vec![Token::Text(format!(
            "ALTER TABLE {tmp_name} RENAME TO {};",
            query.target_name()
        ))]),
        Statement::new(vec![Token::Text("COMMIT;".to_string())]),
    ]
}
