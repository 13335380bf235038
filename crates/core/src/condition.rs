use crate::accessor::FieldId;
use crate::cell::Cell;
use crate::converter::TypeConverter;
use crate::error::Result;
use crate::scheme::{Schema, cell_of};
use crate::token::Token;
use crate::value::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Between,
    Like,
    In,
}

impl Operator {
    const fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::In => "IN",
        }
    }
}

/// A composable expression tree over columns and values, eventually lowered into a sequence of
/// [`Token`]s. Every value-bearing leaf is emitted as a bound placeholder, not interpolated text,
/// keeping composed SQL injection-safe regardless of what a caller passes as a "string" condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    tokens: Vec<Token>,
}

impl Condition {
    #[must_use]
    pub fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    #[must_use]
    pub fn column(cell: &Cell) -> Self {
        Self {
            tokens: vec![Token::Text(cell.name())],
        }
    }

    #[must_use]
    pub fn value(value: impl Into<SqlValue>) -> Self {
        Self {
            tokens: vec![Token::Value(value.into())],
        }
    }

    /// Route an arbitrary serializable value through its [`TypeConverter`], matching the
    /// "arbitrary serializable values" condition constructor from spec.md §3.
    #[must_use]
    pub fn serialized<T>(value: &T, converter: &TypeConverter<T>) -> Self {
        Self {
            tokens: vec![Token::Value((converter.from)(value))],
        }
    }

    #[must_use]
    pub fn raw(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.tokens.is_empty()
    }

    fn parenthesized(op: Operator, lhs: Condition, rhs: Condition) -> Self {
        let mut tokens = Vec::with_capacity(lhs.tokens.len() + rhs.tokens.len() + 4);
        tokens.push(Token::Text("(".to_string()));
        tokens.extend(lhs.tokens);
        tokens.push(Token::Text(format!(" {} ", op.sql())));
        tokens.extend(rhs.tokens);
        tokens.push(Token::Text(")".to_string()));
        Self { tokens }
    }

    fn bare(op: Operator, lhs: Condition, rhs: Condition) -> Self {
        let mut tokens = Vec::with_capacity(lhs.tokens.len() + rhs.tokens.len() + 1);
        tokens.extend(lhs.tokens);
        tokens.push(Token::Text(format!(" {} ", op.sql())));
        tokens.extend(rhs.tokens);
        Self { tokens }
    }

    #[must_use]
    pub fn and(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::And, self, rhs.into())
    }

    #[must_use]
    pub fn or(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Or, self, rhs.into())
    }

    #[must_use]
    pub fn eq(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Eq, self, rhs.into())
    }

    #[must_use]
    pub fn neq(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Neq, self, rhs.into())
    }

    #[must_use]
    pub fn lt(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Lt, self, rhs.into())
    }

    #[must_use]
    pub fn gt(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Gt, self, rhs.into())
    }

    #[must_use]
    pub fn lte(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Lte, self, rhs.into())
    }

    #[must_use]
    pub fn gte(self, rhs: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Gte, self, rhs.into())
    }

    #[must_use]
    pub fn like(self, pattern: impl Into<Condition>) -> Self {
        Self::parenthesized(Operator::Like, self, pattern.into())
    }

    /// `self BETWEEN low AND high`. The inner `low AND high` is emitted without its own
    /// parentheses; the outer BETWEEN expression is parenthesized as usual.
    #[must_use]
    pub fn between(self, low: impl Into<Condition>, high: impl Into<Condition>) -> Self {
        let inner = Self::bare(Operator::And, low.into(), high.into());
        Self::parenthesized(Operator::Between, self, inner)
    }

    /// `self IN (v1, v2, …)`.
    #[must_use]
    pub fn in_list(self, values: impl IntoIterator<Item = Condition>) -> Self {
        Self::parenthesized(Operator::In, self, Self::list(values))
    }

    /// Render an iterable of conditions as a parenthesized, comma-separated list.
    #[must_use]
    pub fn list(values: impl IntoIterator<Item = Condition>) -> Self {
        let mut items = values.into_iter().peekable();
        if items.peek().is_none() {
            return Self::empty();
        }

        let mut tokens = vec![Token::Text("(".to_string())];
        while let Some(item) = items.next() {
            tokens.extend(item.tokens);
            if items.peek().is_some() {
                tokens.push(Token::Text(", ".to_string()));
            }
        }
        tokens.push(Token::Text(")".to_string()));
        Self { tokens }
    }
}

impl From<SqlValue> for Condition {
    fn from(value: SqlValue) -> Self {
        Self::value(value)
    }
}

impl From<i64> for Condition {
    fn from(value: i64) -> Self {
        Self::value(value)
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Self::value(value)
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Self::value(value)
    }
}

impl From<&Cell> for Condition {
    fn from(cell: &Cell) -> Self {
        Self::column(cell)
    }
}

/// Construct a [`Condition`] out of a single column, looked up by [`FieldId`] in `Owner`'s
/// scheme and qualified with its table name.
pub fn field<Owner: Schema>(field_id: FieldId) -> Result<Condition> {
    let cell = cell_of::<Owner>(field_id)?;
    Ok(Condition::column(&cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldId;
    use crate::cell::Flags;
    use crate::converter::integer_converter;
    use crate::scheme::TableScheme;

    fn id_cell() -> Cell {
        Cell::new::<(), i64>(
            FieldId("id"),
            "id",
            Flags::PRIMARY_KEY,
            integer_converter(),
            |_: &()| 0,
            |_, _| {},
        )
    }

    #[test]
    fn eq_parenthesizes_and_binds_value() {
        let cond = Condition::column(&id_cell()).eq(1_i64);
        let tokens = cond.tokens();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0], Token::Text("(".into()));
        assert_eq!(tokens[1], Token::Text("id".into()));
        assert_eq!(tokens[2], Token::Text(" = ".into()));
        assert_eq!(tokens[3], Token::Value(SqlValue::Integer(1)));
        assert_eq!(tokens[4], Token::Text(")".into()));
    }

    #[test]
    fn between_does_not_double_parenthesize_the_and() {
        let cond = Condition::column(&id_cell()).between(1_i64, 5_i64);
        let rendered: String = cond
            .tokens()
            .iter()
            .map(|t| match t {
                Token::Text(text) => text.clone(),
                Token::Value(_) => "?".to_string(),
            })
            .collect();
        assert_eq!(rendered, "(id BETWEEN ? AND ?)");
    }

    #[test]
    fn in_list_renders_parenthesized_comma_list() {
        let cond = Condition::column(&id_cell()).in_list(vec![
            Condition::value(1_i64),
            Condition::value(2_i64),
            Condition::value(3_i64),
        ]);
        let rendered: String = cond
            .tokens()
            .iter()
            .map(|t| match t {
                Token::Text(text) => text.clone(),
                Token::Value(_) => "?".to_string(),
            })
            .collect();
        assert_eq!(rendered, "(id IN (?, ?, ?))");
    }

    #[test]
    fn string_literals_are_always_bound() {
        let cond = Condition::column(&id_cell()).eq("name3");
        assert!(matches!(cond.tokens()[3], Token::Value(SqlValue::String(ref s)) if s == "name3"));
    }

    #[test]
    fn field_fails_for_undeclared_member() {
        struct Unrelated;
        impl Schema for Unrelated {
            fn build_scheme() -> Result<TableScheme> {
                TableScheme::new("unrelated", vec![])
            }
        }
        assert!(field::<Unrelated>(FieldId("nope")).is_err());
    }
}
