use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::accessor::FieldId;
use crate::cell::Cell;
use crate::constraint::Constraint;
use crate::error::{Result, SchemaError};

/// Table name + ordered cells + constraints. Immutable once constructed; invariants are checked
/// in [`TableScheme::new`] / [`TableScheme::with_constraints`]:
/// (a) no unnamed column, (b) at most one PRIMARY_KEY column, (c) cell field ids are unique.
#[derive(Clone)]
pub struct TableScheme {
    name: String,
    cells: Vec<Cell>,
    constraints: Vec<Arc<dyn Constraint>>,
}

impl TableScheme {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Result<Self> {
        Self::with_constraints(name, cells, Vec::new())
    }

    pub fn with_constraints(
        name: impl Into<String>,
        cells: Vec<Cell>,
        constraints: Vec<Arc<dyn Constraint>>,
    ) -> Result<Self> {
        let name = name.into();
        validate(&name, &cells)?;
        Ok(Self {
            name,
            cells,
            constraints,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    /// Find a cell by its declaring [`FieldId`]. Used internally by [`crate::cell_of`]; fails
    /// with [`SchemaError::FieldNotDeclared`] when the field was never declared in this scheme.
    pub fn cell(&self, field_id: FieldId) -> Result<Cell> {
        self.cells
            .iter()
            .find(|cell| cell.field_id() == field_id)
            .cloned()
            .ok_or(SchemaError::FieldNotDeclared {
                owner: self.name.clone(),
                field: field_id.0,
            })
            .map_err(Into::into)
    }

    /// Find a cell by its SQL column name (unqualified).
    #[must_use]
    pub fn find_cell(&self, name: &str) -> Option<Cell> {
        self.cells
            .iter()
            .find(|cell| cell.unqualified_name() == name)
            .cloned()
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|cell| cell.flags().contains(crate::cell::Flags::PRIMARY_KEY))
    }
}

fn validate(name: &str, cells: &[Cell]) -> Result<()> {
    for cell in cells {
        if cell.unqualified_name().is_empty() {
            return Err(SchemaError::UnnamedColumn(name.to_string()).into());
        }
    }

    let mut primary_keys = cells
        .iter()
        .filter(|cell| cell.flags().contains(crate::cell::Flags::PRIMARY_KEY));
    if let Some(first) = primary_keys.next() {
        if let Some(second) = primary_keys.next() {
            return Err(SchemaError::DuplicatePrimaryKey {
                scheme: name.to_string(),
                first: first.unqualified_name().to_string(),
                second: second.unqualified_name().to_string(),
            }
            .into());
        }
    }

    for (index, cell) in cells.iter().enumerate() {
        if cells[..index].iter().any(|other| other.field_id() == cell.field_id()) {
            return Err(SchemaError::DuplicateFieldId {
                scheme: name.to_string(),
                field: cell.field_id().0,
            }
            .into());
        }
    }

    Ok(())
}

/// Process-wide registry backing [`Schema::scheme`], keyed by [`TypeId`]. A `static` declared
/// inside a generic fn is *not* monomorphized per type parameter — nested items cannot capture
/// the enclosing generic, so a naive `static CACHE: OnceLock<TableScheme>` inside `scheme()` would
/// resolve to a single shared slot for every `Schema` implementor, handing every type after the
/// first caller someone else's scheme. Keying by `TypeId` instead gives each concrete type its
/// own entry in one shared map.
fn registry() -> &'static Mutex<HashMap<TypeId, &'static TableScheme>> {
    static REGISTRY: OnceLock<Mutex<HashMap<TypeId, &'static TableScheme>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Implemented by every record type that maps onto a table. `build_scheme` is the single
/// canonical source for the type's (name, cells, constraints) triple; `scheme()` caches it in a
/// process-wide, lazily-initialized, thread-safe registry with one entry per concrete `Self`.
///
/// `build_scheme` returns `Result` because scheme construction validates invariants
/// (§4.3: no unnamed column, at most one PRIMARY_KEY). A failure here is a programming error in
/// the record's scheme declaration, not a runtime condition, so `scheme()` panics on it rather
/// than threading a `Result` through every caller that just wants `&'static TableScheme`.
pub trait Schema: Sized + 'static {
    fn build_scheme() -> Result<TableScheme>;

    #[must_use]
    fn scheme() -> &'static TableScheme {
        let type_id = TypeId::of::<Self>();
        let mut registry = registry().lock().expect("schema registry mutex poisoned");
        if let Some(scheme) = registry.get(&type_id) {
            return scheme;
        }

        let scheme: &'static TableScheme = Box::leak(Box::new(Self::build_scheme().unwrap_or_else(|error| {
            panic!("invalid table scheme for {}: {error}", std::any::type_name::<Self>())
        })));
        registry.insert(type_id, scheme);
        scheme
    }
}

/// Build a fully-qualified [`Cell`] for `Owner::field_id`: looks up `Owner::scheme()`, finds the
/// cell by [`FieldId`], and attaches the table qualifier. Replaces `CellMaker(member)`.
pub fn cell_of<Owner: Schema>(field_id: FieldId) -> Result<Cell> {
    let scheme = Owner::scheme();
    let mut cell = scheme.cell(field_id)?;
    cell.set_table(scheme.name().to_string());
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldId;
    use crate::cell::Flags;
    use crate::converter::integer_converter;

    struct Widget {
        id: i64,
    }

    fn cell(name: &str, field: &'static str, flags: Flags) -> Cell {
        Cell::new::<Widget, i64>(
            FieldId(field),
            name,
            flags,
            integer_converter(),
            |w| w.id,
            |w, v| w.id = v,
        )
    }

    #[test]
    fn rejects_unnamed_column() {
        let cells = vec![cell("", "id", Flags::NONE)];
        let error = TableScheme::new("widgets", cells).unwrap_err();
        assert!(matches!(
            error,
            crate::error::Error::Schema(SchemaError::UnnamedColumn(_))
        ));
    }

    #[test]
    fn rejects_duplicate_primary_key() {
        let cells = vec![
            cell("id", "id", Flags::PRIMARY_KEY),
            cell("other", "other", Flags::PRIMARY_KEY),
        ];
        let error = TableScheme::new("widgets", cells).unwrap_err();
        assert!(matches!(
            error,
            crate::error::Error::Schema(SchemaError::DuplicatePrimaryKey { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_field_id() {
        let cells = vec![cell("a", "shared", Flags::NONE), cell("b", "shared", Flags::NONE)];
        let error = TableScheme::new("widgets", cells).unwrap_err();
        assert!(matches!(
            error,
            crate::error::Error::Schema(SchemaError::DuplicateFieldId { .. })
        ));
    }

    #[test]
    fn cell_lookup_by_field_id_and_name() {
        let cells = vec![cell("id", "id", Flags::PRIMARY_KEY)];
        let scheme = TableScheme::new("widgets", cells).unwrap();
        assert!(scheme.cell(FieldId("id")).is_ok());
        assert!(scheme.cell(FieldId("missing")).is_err());
        assert!(scheme.find_cell("id").is_some());
        assert!(scheme.find_cell("missing").is_none());
    }

    struct Gadget {
        id: i64,
        label: String,
    }

    impl Schema for Gadget {
        fn build_scheme() -> Result<TableScheme> {
            TableScheme::new(
                "gadgets",
                vec![
                    cell("id", "id", Flags::PRIMARY_KEY),
                    Cell::new::<Gadget, String>(
                        FieldId("label"),
                        "label",
                        Flags::NONE,
                        crate::converter::string_converter(),
                        |g| g.label.clone(),
                        |g, v| g.label = v,
                    ),
                ],
            )
        }
    }

    impl Schema for Widget {
        fn build_scheme() -> Result<TableScheme> {
            TableScheme::new("widgets", vec![cell("id", "id", Flags::PRIMARY_KEY)])
        }
    }

    #[test]
    fn scheme_cache_is_keyed_per_type() {
        let widget_scheme = Widget::scheme();
        let gadget_scheme = Gadget::scheme();
        assert_eq!(widget_scheme.name(), "widgets");
        assert_eq!(gadget_scheme.name(), "gadgets");
        assert!(gadget_scheme.find_cell("label").is_some());
        assert!(widget_scheme.find_cell("label").is_none());
        // Calling again returns the same cached scheme, not the other type's.
        assert_eq!(Widget::scheme().name(), "widgets");
        assert_eq!(Gadget::scheme().name(), "gadgets");
    }
}
