use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use crate::accessor::{ErasedAccessor, FieldId, TypedAccessor};
use crate::converter::TypeConverter;
use crate::value::{SqlValue, TypeHint};

/// Column flags, as a bitset with an unusual numbering (there is no bit for `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u32);

impl Flags {
    pub const NONE: Self = Self(0);
    pub const UNIQUE: Self = Self(2);
    pub const PRIMARY_KEY: Self = Self(4);
    pub const CHECK: Self = Self(16);
    pub const DEFAULT: Self = Self(32);
    pub const AUTOINCREMENT: Self = Self(64);
    pub const CUSTOM: Self = Self(256);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::NONE
    }
}

/// Column descriptor within a [`crate::TableScheme`]. A cell knows its SQL name, the qualifying
/// table name once attached by [`crate::cell_of`], the [`FieldId`] that located it, its flags,
/// its optional default, whether it accepts NULL, and an accessor that is only callable against
/// the record type it was built from (enforced by a runtime downcast, see [`ErasedAccessor`]).
#[derive(Clone)]
pub struct Cell {
    name: String,
    table: Option<String>,
    field_id: FieldId,
    flags: Flags,
    default: SqlValue,
    nullable: bool,
    accessor: Arc<dyn ErasedAccessor>,
}

impl Cell {
    /// Build a cell for `Owner::field` using the default converter supplied by the caller.
    pub fn new<Owner, T>(
        field_id: FieldId,
        name: impl Into<String>,
        flags: Flags,
        converter: TypeConverter<T>,
        get: impl Fn(&Owner) -> T + Send + Sync + 'static,
        set: impl Fn(&mut Owner, T) + Send + Sync + 'static,
    ) -> Self
    where
        Owner: 'static,
        T: 'static,
    {
        let nullable = converter.is_nullable;
        let accessor = TypedAccessor::new(get, set, converter);
        Self {
            name: name.into(),
            table: None,
            field_id,
            flags,
            default: SqlValue::Empty,
            nullable,
            accessor,
        }
    }

    /// Attach a default value. The caller passes an already-serialized [`SqlValue`] rather than a
    /// `T`, since Rust has no implicit-conversion analogue to thread through the generic bound
    /// cleanly.
    #[must_use]
    pub fn with_default(mut self, default: SqlValue) -> Self {
        self.default = default;
        self.flags |= Flags::DEFAULT;
        self
    }

    #[must_use]
    pub fn name(&self) -> String {
        match &self.table {
            Some(table) => format!("{table}.{}", self.name),
            None => self.name.clone(),
        }
    }

    #[must_use]
    pub fn unqualified_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub(crate) fn set_table(&mut self, table: impl Into<String>) {
        self.table = Some(table.into());
    }

    #[must_use]
    pub fn field_id(&self) -> FieldId {
        self.field_id
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[must_use]
    pub fn default(&self) -> &SqlValue {
        &self.default
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn type_hint(&self) -> TypeHint {
        self.accessor.hint()
    }

    /// Serialize `owner`'s field into a [`SqlValue`]. `owner` must be the same concrete type
    /// this cell was constructed for; [`crate::TableScheme`] only ever stores cells alongside
    /// the record type that built them, so this invariant always holds in practice.
    #[must_use]
    pub fn serialize<Owner: 'static>(&self, owner: &Owner) -> SqlValue {
        self.accessor.serialize_erased(owner)
    }

    /// Deserialize a raw driver value into `owner`'s field.
    pub fn deserialize<Owner: 'static>(
        &self,
        raw: Option<&str>,
        owner: &mut Owner,
    ) -> crate::error::Result<()> {
        self.accessor.deserialize_erased(raw, owner)
    }
}
