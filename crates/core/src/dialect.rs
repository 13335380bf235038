use crate::cell::{Cell, Flags};
use crate::constraint::ForeignKey;
use crate::diff::{generate_conversion_steps, DiffAction};
use crate::error::{Result, UsageError};
use crate::query::{Alter, Create, Drop, Insert, Remove, Select, Transaction, Update};
use crate::scheme::TableScheme;
use crate::statement::Statement;
use crate::token::Token;
use crate::value::{SqlValue, TypeHint};

/// Per-dialect hooks for rendering column types, casts, and literal defaults, the seam every
/// dialect crate actually needs to touch to lower a [`crate::TableScheme`] into DDL text.
/// Supertrait of [`QueryStringBuilder`], which provides the query-to-statement lowering on top of
/// it.
pub trait CellRepresentation {
    /// Column declaration type for `hint` (e.g. Integer → `"INTEGER"`, MySQL Integer → `"int"`).
    fn type_name(&self, hint: TypeHint) -> String;

    /// `CAST(... AS <type>)` type spelling for `hint`, which some dialects spell differently from
    /// the declaration type (MySQL: `INTEGER` declares as `int` but casts to `SIGNED`).
    fn cast_type_name(&self, hint: TypeHint) -> String;

    /// Render a literal (non-bound) value for use in a `DEFAULT` clause or a `CAST(... AS ...)`
    /// expression.
    fn render_literal(&self, value: &SqlValue, hint: TypeHint) -> String {
        match value {
            SqlValue::Null | SqlValue::Empty => "NULL".to_string(),
            SqlValue::Integer(v) => v.to_string(),
            SqlValue::String(s) | SqlValue::DateTime(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::Blob(bytes) => format!("X'{}'", bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()),
        }
    }

    fn autoincrement_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    /// `col TYPE [PRIMARY KEY] [UNIQUE] [AUTO(_)INCREMENT] [NOT NULL] [DEFAULT v]`.
    fn column_definition(&self, cell: &Cell) -> String {
        let flags = cell.flags();
        let mut parts = vec![format!("{} {}", cell.unqualified_name(), self.type_name(cell.type_hint()))];

        if flags.contains(Flags::PRIMARY_KEY) {
            parts.push("PRIMARY KEY".to_string());
        }
        if flags.contains(Flags::UNIQUE) {
            parts.push("UNIQUE".to_string());
        }
        if flags.contains(Flags::AUTOINCREMENT) {
            parts.push(self.autoincrement_keyword().to_string());
        }
        if !cell.is_nullable() && !flags.contains(Flags::PRIMARY_KEY) {
            parts.push("NOT NULL".to_string());
        }
        if flags.contains(Flags::DEFAULT) {
            parts.push(format!("DEFAULT {}", self.render_literal(cell.default(), cell.type_hint())));
        }

        parts.join(" ")
    }

    /// Shared `fieldsWithCasts` helper (spec.md SPEC_FULL §6): starting from `base` cells, apply
    /// `steps`, an added column becomes `CAST(default AS type) AS col`, a dropped column is
    /// omitted, a renamed column becomes `from AS to`, everything else passes through unchanged.
    /// Used by CREATE-AS-SELECT lowering and the SQLite table-copy ALTER.
    fn projected_columns(&self, base: &[Cell], steps: &[DiffAction]) -> Vec<String> {
        let mut columns: Vec<(String, String)> = base
            .iter()
            .map(|cell| (cell.unqualified_name().to_string(), cell.unqualified_name().to_string()))
            .collect();

        for step in steps {
            match step {
                DiffAction::DropColumn(cell) => {
                    columns.retain(|(name, _)| name != cell.unqualified_name());
                }
                DiffAction::AddColumn(cell) => {
                    let default = self.render_literal(cell.default(), cell.type_hint());
                    let expr = format!(
                        "CAST({default} AS {}) AS {}",
                        self.cast_type_name(cell.type_hint()),
                        cell.unqualified_name()
                    );
                    columns.push((cell.unqualified_name().to_string(), expr));
                }
                DiffAction::RenameColumn { from, to } => {
                    if let Some(entry) = columns.iter_mut().find(|(name, _)| name == from.unqualified_name()) {
                        entry.1 = format!("{} AS {}", from.unqualified_name(), to.unqualified_name());
                    }
                }
                DiffAction::RenameTable(_) | DiffAction::NoOp => {}
            }
        }

        columns.into_iter().map(|(_, rendered)| rendered).collect()
    }
}

/// Lowers query objects (§3) into one or more [`Statement`]s in a given dialect (spec.md §4.5).
/// Every query-kind method has a default body expressing the generic SQL shared by SQLite and
/// MySQL; a dialect only overrides what actually differs (type names, casts, DEFAULT rendering,
/// LIMIT form, and, always, `alter_statement`, since table-copy vs. collapsed-clause ALTER
/// lowering have no shared shape worth defaulting).
pub trait QueryStringBuilder: CellRepresentation + Send + Sync {
    /// The bound-value placeholder spelling this dialect's driver expects.
    fn placeholder(&self) -> &'static str {
        "?"
    }

    /// `LIMIT offset, limit` form. An unbounded limit renders as the largest representable
    /// count; SQLite overrides this to render its own `-1` sentinel instead (spec.md §6).
    fn render_limit(&self, limit: crate::query::ResultLimit) -> String {
        match limit.limit() {
            Some(n) => format!(" LIMIT {}, {n}", limit.offset()),
            None => format!(" LIMIT {}, {}", limit.offset(), u64::MAX),
        }
    }

    fn render_foreign_key(&self, fk: &ForeignKey, scheme: &TableScheme) -> Result<String> {
        let owning = scheme.cell(fk.owning_column())?;
        let mut rendered = format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            owning.unqualified_name(),
            fk.foreign_table(),
            fk.foreign_column()
        );
        for (trigger, action) in fk.triggers() {
            rendered.push_str(&format!(" {} {}", trigger.keyword(), action.keyword()));
        }
        Ok(rendered)
    }

    fn create_statement(&self, query: &Create) -> Result<Vec<Statement>> {
        let scheme = query.scheme();
        let name = scheme.name();

        let Some(source) = query.source() else {
            let mut defs: Vec<String> = scheme.cells().iter().map(|cell| self.column_definition(cell)).collect();
            for constraint in scheme.constraints() {
                defs.push(constraint.render(self, scheme)?);
            }
            let text = format!("CREATE TABLE IF NOT EXISTS {name}({});", defs.join(", "));
            return Ok(vec![Statement::new(vec![Token::Text(text)])]);
        };

        let source_scheme = source.scheme();
        let steps = generate_conversion_steps(source_scheme, scheme);
        let columns = self.projected_columns(source_scheme.cells(), &steps);

        let mut tokens = vec![Token::Text(format!(
            "CREATE TABLE IF NOT EXISTS {name} AS SELECT {} FROM {}",
            columns.join(", "),
            source_scheme.name()
        ))];
        if source.condition().has_value() {
            tokens.push(Token::Text(" WHERE ".to_string()));
            tokens.extend(source.condition().tokens().iter().cloned());
        }
        if !query.order_by_list().is_empty() {
            tokens.push(Token::Text(format!(" {}", render_order_by(query.order_by_list()))));
        }
        tokens.push(Token::Text(";".to_string()));

        Ok(vec![Statement::new(tokens)])
    }

    fn insert_statement(&self, query: &Insert) -> Result<Vec<Statement>> {
        let names: Vec<&str> = query.values().iter().map(|(cell, _)| cell.unqualified_name()).collect();
        let mut tokens = vec![Token::Text(format!(
            "INSERT INTO {} ({}) VALUES (",
            query.scheme().name(),
            names.join(", ")
        ))];
        for (index, (_, value)) in query.values().iter().enumerate() {
            if index > 0 {
                tokens.push(Token::Text(", ".to_string()));
            }
            tokens.push(Token::Value(value.clone()));
        }
        tokens.push(Token::Text(");".to_string()));
        Ok(vec![Statement::new(tokens)])
    }

    fn select_statement(&self, query: &Select) -> Result<Vec<Statement>> {
        let projection = if query.projection().is_empty() {
            "*".to_string()
        } else {
            query
                .projection()
                .iter()
                .map(Cell::name)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut tokens = vec![Token::Text(format!("SELECT {projection} FROM {}", query.scheme().name()))];
        for join in query.joins() {
            tokens.push(Token::Text(format!(" JOIN {} ON ", join.scheme().name())));
            tokens.extend(join.on().tokens().iter().cloned());
        }
        if query.condition().has_value() {
            tokens.push(Token::Text(" WHERE ".to_string()));
            tokens.extend(query.condition().tokens().iter().cloned());
        }
        if !query.order_by_list().is_empty() {
            tokens.push(Token::Text(format!(" {}", render_order_by(query.order_by_list()))));
        }
        if query.result_limit().defined() {
            tokens.push(Token::Text(self.render_limit(query.result_limit())));
        }
        tokens.push(Token::Text(";".to_string()));

        Ok(vec![Statement::new(tokens)])
    }

    fn update_statement(&self, query: &Update) -> Result<Vec<Statement>> {
        if query.assignments().is_empty() {
            return Err(UsageError::EmptyUpdate.into());
        }

        let mut tokens = vec![Token::Text(format!("UPDATE {} SET ", query.scheme().name()))];
        for (index, (cell, value)) in query.assignments().iter().enumerate() {
            if index > 0 {
                tokens.push(Token::Text(", ".to_string()));
            }
            tokens.push(Token::Text(format!("{}=", cell.unqualified_name())));
            tokens.push(Token::Value(value.clone()));
        }
        if query.condition().has_value() {
            tokens.push(Token::Text(" WHERE ".to_string()));
            tokens.extend(query.condition().tokens().iter().cloned());
        }
        tokens.push(Token::Text(";".to_string()));

        Ok(vec![Statement::new(tokens)])
    }

    fn remove_statement(&self, query: &Remove) -> Result<Vec<Statement>> {
        let mut tokens = vec![Token::Text(format!("DELETE FROM {}", query.scheme().name()))];
        if query.condition().has_value() {
            tokens.push(Token::Text(" WHERE ".to_string()));
            tokens.extend(query.condition().tokens().iter().cloned());
        }
        tokens.push(Token::Text(";".to_string()));
        Ok(vec![Statement::new(tokens)])
    }

    fn drop_statement(&self, query: &Drop) -> Result<Vec<Statement>> {
        let text = format!("DROP TABLE IF EXISTS {};", query.name());
        Ok(vec![Statement::new(vec![Token::Text(text)])])
    }

    /// No shared default: the generic per-step `ALTER TABLE` form, MySQL's collapsed
    /// multi-clause form, and SQLite's five-statement table-copy procedure are different enough
    /// that defaulting this would just be a wrong answer for two dialects out of three.
    fn alter_statement(&self, query: &Alter) -> Result<Vec<Statement>>;

    fn transaction_statement(&self, tx: Transaction) -> Result<Vec<Statement>> {
        let text = match tx {
            Transaction::Begin => "BEGIN TRANSACTION;",
            Transaction::Commit => "COMMIT;",
            Transaction::Rollback => "ROLLBACK;",
        };
        Ok(vec![Statement::new(vec![Token::Text(text.to_string())])])
    }
}

fn render_order_by(order_by: &[crate::query::OrderBy]) -> String {
    let clauses: Vec<String> = order_by
        .iter()
        .map(|entry| format!("{} {}", entry.cell().unqualified_name(), entry.direction().keyword()))
        .collect();
    format!("ORDER BY {}", clauses.join(", "))
}

/// Render every non-[`DiffAction::NoOp`] step as its own generic `ALTER TABLE` clause, one
/// statement per step, the shape any dialect without a special case (anything but SQLite) uses
/// directly, and MySQL further collapses into one statement.
#[must_use]
pub fn render_generic_alter_clauses(representation: &dyn CellRepresentation, scheme: &TableScheme, steps: &[DiffAction]) -> Vec<String> {
    steps
        .iter()
        .filter_map(|step| match step {
            DiffAction::NoOp => None,
            DiffAction::RenameTable(name) => Some(format!("RENAME TO {name}")),
            DiffAction::AddColumn(cell) => Some(format!("ADD COLUMN {}", representation.column_definition(cell))),
            DiffAction::DropColumn(cell) => Some(format!("DROP COLUMN {}", cell.unqualified_name())),
            DiffAction::RenameColumn { from, to } => Some(format!(
                "RENAME COLUMN {} TO {}",
                from.unqualified_name(),
                to.unqualified_name()
            )),
        })
        .map(|clause| format!("{} {}", scheme.name(), clause))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldId;
    use crate::converter::integer_converter;

    struct Sqlish;

    impl CellRepresentation for Sqlish {
        fn type_name(&self, hint: TypeHint) -> String {
            match hint.inner {
                crate::value::InnerType::Integer => "INTEGER".to_string(),
                crate::value::InnerType::DateTime => "DATETIME".to_string(),
                _ => "TEXT".to_string(),
            }
        }
        fn cast_type_name(&self, hint: TypeHint) -> String {
            self.type_name(hint)
        }
    }

    impl QueryStringBuilder for Sqlish {
        fn alter_statement(&self, _query: &Alter) -> Result<Vec<Statement>> {
            unimplemented!("not exercised by these tests")
        }
    }

    #[test]
    fn empty_projection_renders_star() {
        struct Widget {
            id: i64,
        }
        impl crate::scheme::Schema for Widget {
            fn build_scheme() -> Result<TableScheme> {
                TableScheme::new(
                    "widgets",
                    vec![Cell::new::<Widget, i64>(
                        FieldId("id"),
                        "id",
                        Flags::PRIMARY_KEY,
                        integer_converter(),
                        |w| w.id,
                        |w, v| w.id = v,
                    )],
                )
            }
        }

        let builder = Sqlish;
        let query = Select::new::<Widget>();
        let statements = builder.select_statement(&query).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].compose("?"), "SELECT * FROM widgets;");
    }

    #[test]
    fn update_with_no_assignments_is_rejected() {
        struct Widget {
            id: i64,
        }
        impl crate::scheme::Schema for Widget {
            fn build_scheme() -> Result<TableScheme> {
                TableScheme::new(
                    "widgets",
                    vec![Cell::new::<Widget, i64>(
                        FieldId("id"),
                        "id",
                        Flags::PRIMARY_KEY,
                        integer_converter(),
                        |w| w.id,
                        |w, v| w.id = v,
                    )],
                )
            }
        }

        let builder = Sqlish;
        let query = Update::new::<Widget>();
        assert!(matches!(
            builder.update_statement(&query),
            Err(crate::error::Error::Usage(UsageError::EmptyUpdate))
        ));
    }
}
