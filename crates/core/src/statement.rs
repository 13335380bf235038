use crate::token::Token;
use crate::value::SqlValue;

/// A composed SQL statement: an ordered sequence of [`Token`]s that have not yet been lowered to
/// text. [`Statement::compose`] renders the text for a given placeholder spelling (dialects
/// differ: SQLite and MySQL both accept `?`, but the shape is dialect-owned, not hardcoded here);
/// [`Statement::parameters`] returns the values that must be bound to those placeholders in
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    tokens: Vec<Token>,
}

impl Statement {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Render the SQL text, substituting `placeholder` for every bound value in order.
    #[must_use]
    pub fn compose(&self, placeholder: &str) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Text(text) => text.clone(),
                Token::Value(_) => placeholder.to_string(),
            })
            .collect()
    }

    /// The values to bind to the placeholders produced by [`Statement::compose`], left to right.
    #[must_use]
    pub fn parameters(&self) -> Vec<SqlValue> {
        Token::binding_parameters(&self.tokens)
    }
}

impl From<Vec<Token>> for Statement {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl FromIterator<Token> for Statement {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_substitutes_placeholder_for_values_only() {
        let statement = Statement::new(vec![
            Token::Text("SELECT * FROM t WHERE id = ".to_string()),
            Token::Value(SqlValue::Integer(7)),
        ]);
        assert_eq!(statement.compose("?"), "SELECT * FROM t WHERE id = ?");
        assert_eq!(statement.parameters(), vec![SqlValue::Integer(7)]);
    }

    #[test]
    fn compose_handles_multiple_placeholders_in_order() {
        let statement = Statement::new(vec![
            Token::Text("a = ".to_string()),
            Token::Value(SqlValue::Integer(1)),
            Token::Text(" AND b = ".to_string()),
            Token::Value(SqlValue::String("x".to_string())),
        ]);
        assert_eq!(statement.compose("$"), "a = $ AND b = $");
        assert_eq!(
            statement.parameters(),
            vec![SqlValue::Integer(1), SqlValue::String("x".to_string())]
        );
    }

    #[test]
    fn empty_statement_composes_to_empty_string() {
        let statement = Statement::default();
        assert_eq!(statement.compose("?"), "");
        assert!(statement.parameters().is_empty());
    }
}
