use crate::value::SqlValue;

/// A single element of a [`crate::Statement`]: either literal SQL text (column names, operators,
/// parentheses) or a bound value emitted as a placeholder at compose time.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    Value(SqlValue),
}

impl Token {
    /// Extract the bound values from a token sequence, left to right.
    #[must_use]
    pub fn binding_parameters(tokens: &[Token]) -> Vec<SqlValue> {
        tokens
            .iter()
            .filter_map(|token| match token {
                Token::Value(value) => Some(value.clone()),
                Token::Text(_) => None,
            })
            .collect()
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<SqlValue> for Token {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

/// Small append-only builder used throughout the query lowering code to assemble token
/// sequences readably.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream(Vec<Token>);

impl TokenStream {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn push(mut self, token: impl Into<Token>) -> Self {
        self.0.push(token.into());
        self
    }

    #[must_use]
    pub fn extend(mut self, tokens: impl IntoIterator<Item = Token>) -> Self {
        self.0.extend(tokens);
        self
    }

    #[must_use]
    pub fn insert_front(mut self, token: impl Into<Token>) -> Self {
        self.0.insert(0, token.into());
        self
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Token> {
        self.0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
