use std::fmt;

/// Tagged value crossing the boundary between Rust record fields and a driver. `Empty` denotes
/// "no value supplied" (e.g. a column left to its DEFAULT), distinct from SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    String(String),
    /// ISO-8601 datetime, always stored as its on-wire string form (see [`crate::converter`]).
    DateTime(String),
    Blob(Vec<u8>),
    Empty,
}

impl SqlValue {
    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::DateTime(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::String(s) | Self::DateTime(s) => write!(f, "{s}"),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Empty => write!(f, ""),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Portable hint a dialect uses to pick a column declaration type, independent of the exact
/// Rust type a [`crate::TypeConverter`] serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeHint {
    pub inner: InnerType,
    /// Size hint in bytes; `0` means "no specific size".
    pub size: usize,
}

impl TypeHint {
    #[must_use]
    pub const fn new(inner: InnerType) -> Self {
        Self { inner, size: 0 }
    }

    #[must_use]
    pub const fn sized(inner: InnerType, size: usize) -> Self {
        Self { inner, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerType {
    Integer,
    Binary,
    String,
    DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string_matches_spec() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Integer(42).to_string(), "42");
        assert_eq!(SqlValue::from("hi").to_string(), "hi");
    }

    #[test]
    fn empty_is_distinct_from_null() {
        assert!(SqlValue::Empty.is_empty());
        assert!(!SqlValue::Empty.is_null());
        assert!(SqlValue::Null.is_null());
        assert!(!SqlValue::Null.is_empty());
    }
}
