use crate::cell::Cell;
use crate::error::{Result, UsageError};
use crate::scheme::TableScheme;

/// One step of a schema conversion, as produced by [`generate_conversion_steps`].
#[derive(Clone)]
pub enum DiffAction {
    NoOp,
    RenameTable(String),
    AddColumn(Cell),
    DropColumn(Cell),
    RenameColumn { from: Cell, to: Cell },
}

/// Compute the ordered list of steps that converts `from` into `to`.
///
/// Algorithm (spec.md §4.6):
/// 1. Diff cells by column name: `from \ to` and `to \ from`.
/// 2. Emit one [`DiffAction::DropColumn`] per column only in `from`, then one
///    [`DiffAction::AddColumn`] per column only in `to`.
/// 3. If the table names differ, append [`DiffAction::RenameTable`].
///
/// The structural diff cannot by itself distinguish a true drop-and-add from a rename; call
/// [`rename_column`] afterwards to reclassify a specific drop/add pair.
#[must_use]
pub fn generate_conversion_steps(from: &TableScheme, to: &TableScheme) -> Vec<DiffAction> {
    let mut steps = Vec::new();

    for cell in from.cells() {
        if to.find_cell(cell.unqualified_name()).is_none() {
            steps.push(DiffAction::DropColumn(cell.clone()));
        }
    }
    for cell in to.cells() {
        if from.find_cell(cell.unqualified_name()).is_none() {
            steps.push(DiffAction::AddColumn(cell.clone()));
        }
    }

    if from.name() != to.name() {
        steps.push(DiffAction::RenameTable(to.name().to_string()));
    }

    steps
}

/// Reclassify a `DropColumn(from) + AddColumn(to)` pair produced by [`generate_conversion_steps`]
/// into a single [`DiffAction::RenameColumn`], preserving the column's data across the alter
/// instead of destroying and recreating it.
///
/// Fails with [`UsageError::NoSuchColumn`] if either the drop of `from_name` or the add of
/// `to_name` is not present among `items`.
pub fn rename_column(items: &mut [DiffAction], from_name: &str, to_name: &str) -> Result<()> {
    let drop_index = items
        .iter()
        .position(|item| matches!(item, DiffAction::DropColumn(cell) if cell.unqualified_name() == from_name))
        .ok_or_else(|| UsageError::NoSuchColumn(from_name.to_string()))?;
    let add_index = items
        .iter()
        .position(|item| matches!(item, DiffAction::AddColumn(cell) if cell.unqualified_name() == to_name))
        .ok_or_else(|| UsageError::NoSuchColumn(to_name.to_string()))?;

    let DiffAction::DropColumn(from_cell) = std::mem::replace(&mut items[drop_index], DiffAction::NoOp) else {
        unreachable!("checked above")
    };
    let DiffAction::AddColumn(to_cell) = std::mem::replace(&mut items[add_index], DiffAction::NoOp) else {
        unreachable!("checked above")
    };

    items[drop_index] = DiffAction::RenameColumn {
        from: from_cell,
        to: to_cell,
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldId;
    use crate::cell::Flags;
    use crate::converter::{integer_converter, string_converter};

    struct Student {
        id: i64,
        name: String,
    }

    fn scheme(table: &str, with_name_column: bool, extra: Option<(&'static str, &'static str)>) -> TableScheme {
        let mut cells = vec![Cell::new::<Student, i64>(
            FieldId("id"),
            "id",
            Flags::PRIMARY_KEY,
            integer_converter(),
            |s| s.id,
            |s, v| s.id = v,
        )];
        if with_name_column {
            cells.push(Cell::new::<Student, String>(
                FieldId("name"),
                "name",
                Flags::NONE,
                string_converter(),
                |s| s.name.clone(),
                |s, v| s.name = v,
            ));
        }
        if let Some((field, name)) = extra {
            cells.push(Cell::new::<Student, String>(
                FieldId(field),
                name,
                Flags::NONE,
                string_converter(),
                |s| s.name.clone(),
                |s, v| s.name = v,
            ));
        }
        TableScheme::new(table, cells).unwrap()
    }

    #[test]
    fn plain_rename_without_explicit_hint_drops_and_adds() {
        let from = scheme("student", true, None);
        let to = scheme("student", false, Some(("full_name", "full_name")));
        let steps = generate_conversion_steps(&from, &to);

        let drops = steps
            .iter()
            .filter(|s| matches!(s, DiffAction::DropColumn(c) if c.unqualified_name() == "name"))
            .count();
        let adds = steps
            .iter()
            .filter(|s| matches!(s, DiffAction::AddColumn(c) if c.unqualified_name() == "full_name"))
            .count();
        assert_eq!(drops, 1);
        assert_eq!(adds, 1);
    }

    #[test]
    fn explicit_rename_reclassifies_the_pair() {
        let from = scheme("student", true, None);
        let to = scheme("student", false, Some(("full_name", "full_name")));
        let mut steps = generate_conversion_steps(&from, &to);

        rename_column(&mut steps, "name", "full_name").unwrap();

        let renamed = steps.iter().any(|s| {
            matches!(s, DiffAction::RenameColumn { from, to }
                if from.unqualified_name() == "name" && to.unqualified_name() == "full_name")
        });
        assert!(renamed);
        assert!(!steps
            .iter()
            .any(|s| matches!(s, DiffAction::DropColumn(_) | DiffAction::AddColumn(_))));
    }

    #[test]
    fn rename_column_rejects_missing_step() {
        let from = scheme("student", true, None);
        let to = scheme("student", true, None);
        let mut steps = generate_conversion_steps(&from, &to);
        assert!(rename_column(&mut steps, "nope", "also_nope").is_err());
    }

    #[test]
    fn table_rename_is_appended_last() {
        let from = scheme("student", true, None);
        let to = scheme("students", true, None);
        let steps = generate_conversion_steps(&from, &to);
        assert!(matches!(steps.last(), Some(DiffAction::RenameTable(name)) if name == "students"));
    }
}
