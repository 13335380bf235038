use chrono::{NaiveDateTime, TimeZone, Utc};

use crate::error::{ConversionError, Result};
use crate::value::{InnerType, SqlValue, TypeHint};

/// Pluggable serialize/deserialize for a user type `T`. Built by [`integer_converter`],
/// [`string_converter`], [`datetime_converter`], or [`nullable`], or supplied per-cell directly:
/// [`crate::Cell::new`] takes a `TypeConverter<T>` argument, so a caller can hand it a
/// hand-rolled converter that fully overrides the default instead of a built-in one.
///
/// Contract: `to(from(x).as_str()) == x` for all non-null `x`; for a converter wrapped in
/// [`nullable`], `to(None) == None` and `from(None) == SqlValue::Null`.
pub struct TypeConverter<T> {
    pub is_nullable: bool,
    pub hint: TypeHint,
    pub from: Box<dyn Fn(&T) -> SqlValue + Send + Sync>,
    pub to: Box<dyn Fn(Option<&str>) -> Result<T> + Send + Sync>,
}

impl<T> TypeConverter<T> {
    #[must_use]
    pub fn new(
        hint: TypeHint,
        from: impl Fn(&T) -> SqlValue + Send + Sync + 'static,
        to: impl Fn(Option<&str>) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            is_nullable: false,
            hint,
            from: Box::new(from),
            to: Box::new(to),
        }
    }
}

/// Built-in converter for `i64`.
#[must_use]
pub fn integer_converter() -> TypeConverter<i64> {
    TypeConverter::new(
        TypeHint::new(InnerType::Integer),
        |value: &i64| SqlValue::Integer(*value),
        |raw| match raw {
            Some(text) => text.parse::<i64>().map_err(|_| {
                ConversionError::InvalidFormat {
                    value: text.to_string(),
                    expected_type: "integer",
                }
                .into()
            }),
            None => Err(ConversionError::UnexpectedNull.into()),
        },
    )
}

/// Built-in converter for any type constructible from / representable as a `String`.
#[must_use]
pub fn string_converter() -> TypeConverter<String> {
    TypeConverter::new(
        TypeHint::new(InnerType::String),
        |value: &String| SqlValue::String(value.clone()),
        |raw| match raw {
            Some(text) => Ok(text.to_string()),
            None => Err(ConversionError::UnexpectedNull.into()),
        },
    )
}

/// On-wire datetime format: `YYYY-MM-DD HH:MM:SS.000`, UTC, fractional seconds always `.000`.
/// `to` accepts a missing fractional-seconds suffix.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Built-in converter between a UTC unix timestamp (seconds) and the ISO-8601 on-wire string.
#[must_use]
pub fn datetime_converter() -> TypeConverter<i64> {
    TypeConverter::new(
        TypeHint::new(InnerType::DateTime),
        |epoch_seconds: &i64| {
            let datetime = Utc
                .timestamp_opt(*epoch_seconds, 0)
                .single()
                .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().expect("epoch 0 is valid"));
            SqlValue::DateTime(datetime.format(DATETIME_FORMAT).to_string())
        },
        |raw| {
            let text = raw.ok_or(ConversionError::UnexpectedNull)?;
            parse_datetime(text).map(|dt| dt.and_utc().timestamp())
        },
    )
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| {
            ConversionError::InvalidFormat {
                value: text.to_string(),
                expected_type: "ISO-8601 datetime",
            }
            .into()
        })
}

/// Wraps a converter for `U` into one for `Option<U>`: absent values serialize to
/// `SqlValue::Null`, and a missing/NULL raw value deserializes to `None` rather than erroring.
#[must_use]
pub fn nullable<U: 'static>(inner: TypeConverter<U>) -> TypeConverter<Option<U>> {
    let TypeConverter { hint, from, to, .. } = inner;
    TypeConverter {
        is_nullable: true,
        hint,
        from: Box::new(move |value: &Option<U>| match value {
            Some(inner) => from(inner),
            None => SqlValue::Null,
        }),
        to: Box::new(move |raw| match raw {
            None => Ok(None),
            Some(raw) => to(Some(raw)).map(Some),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trips() {
        let converter = integer_converter();
        for value in [-5_i64, 0, 42, i64::MAX] {
            let serialized = (converter.from)(&value);
            let SqlValue::Integer(raw) = serialized else {
                panic!("expected Integer")
            };
            let restored = (converter.to)(Some(&raw.to_string())).unwrap();
            assert_eq!(restored, value);
        }
    }

    #[test]
    fn string_round_trips() {
        let converter = string_converter();
        let value = "hello world".to_string();
        let serialized = (converter.from)(&value);
        let text = serialized.as_str().unwrap().to_string();
        assert_eq!((converter.to)(Some(&text)).unwrap(), value);
    }

    #[test]
    fn datetime_round_trips_and_accepts_missing_fraction() {
        let converter = datetime_converter();
        let epoch = 1_640_995_200_i64; // 2022-01-01T00:00:00Z
        let serialized = (converter.from)(&epoch);
        assert_eq!(serialized.as_str().unwrap(), "2022-01-01 00:00:00.000");
        assert_eq!((converter.to)(serialized.as_str()).unwrap(), epoch);
        assert_eq!(
            (converter.to)(Some("2022-01-01 00:00:00")).unwrap(),
            epoch
        );
    }

    #[test]
    fn datetime_rejects_bad_format() {
        let converter = datetime_converter();
        assert!((converter.to)(Some("not-a-date")).is_err());
    }

    #[test]
    fn nullable_round_trips_absent_value() {
        let converter = nullable(integer_converter());
        assert_eq!((converter.from)(&None), SqlValue::Null);
        assert_eq!((converter.to)(None).unwrap(), None);
        assert!(converter.is_nullable);

        let present = Some(7_i64);
        let serialized = (converter.from)(&present);
        let SqlValue::Integer(raw) = serialized else {
            panic!("expected Integer")
        };
        assert_eq!(
            (converter.to)(Some(&raw.to_string())).unwrap(),
            present
        );
    }
}
