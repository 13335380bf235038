use std::any::Any;
use std::sync::Arc;

use crate::converter::TypeConverter;
use crate::error::Result;
use crate::value::{SqlValue, TypeHint};

/// Identity of a Rust struct field, distinct from the SQL column name a [`crate::Cell`] maps it
/// to. Declared as an associated constant on the owning record type (see [`crate::Schema`]).
/// Stands in for a pointer-to-member's field offset, without needing unsafe pointer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldId(pub &'static str);

/// Type-erased serialize/deserialize pair bound to one owning record type. Stored behind
/// `Arc<dyn ErasedAccessor>` inside [`crate::Cell`] so that `TableScheme` can hold a homogeneous
/// `Vec<Cell>` regardless of how many distinct record types exist in an application.
pub trait ErasedAccessor: Send + Sync {
    fn serialize_erased(&self, owner: &dyn Any) -> SqlValue;
    fn deserialize_erased(&self, raw: Option<&str>, owner: &mut dyn Any) -> Result<()>;
    fn hint(&self) -> TypeHint;
    fn is_nullable(&self) -> bool;
}

/// Concrete accessor for field `T` of record type `Owner`.
pub struct TypedAccessor<Owner, T> {
    get: Box<dyn Fn(&Owner) -> T + Send + Sync>,
    set: Box<dyn Fn(&mut Owner, T) + Send + Sync>,
    converter: TypeConverter<T>,
}

impl<Owner: 'static, T: 'static> TypedAccessor<Owner, T> {
    pub fn new(
        get: impl Fn(&Owner) -> T + Send + Sync + 'static,
        set: impl Fn(&mut Owner, T) + Send + Sync + 'static,
        converter: TypeConverter<T>,
    ) -> Arc<dyn ErasedAccessor> {
        Arc::new(Self {
            get: Box::new(get),
            set: Box::new(set),
            converter,
        })
    }
}

impl<Owner: 'static, T: 'static> ErasedAccessor for TypedAccessor<Owner, T> {
    fn serialize_erased(&self, owner: &dyn Any) -> SqlValue {
        let owner = owner
            .downcast_ref::<Owner>()
            .expect("cell accessor invoked against the wrong record type");
        (self.converter.from)(&(self.get)(owner))
    }

    fn deserialize_erased(&self, raw: Option<&str>, owner: &mut dyn Any) -> Result<()> {
        let owner = owner
            .downcast_mut::<Owner>()
            .expect("cell accessor invoked against the wrong record type");
        let value = (self.converter.to)(raw)?;
        (self.set)(owner, value);
        Ok(())
    }

    fn hint(&self) -> TypeHint {
        self.converter.hint
    }

    fn is_nullable(&self) -> bool {
        self.converter.is_nullable
    }
}
