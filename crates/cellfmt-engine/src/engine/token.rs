//! Token model shared by the tokenizer and the renderer.
//!
//! A [`Token`] is a piece of formula text plus its classification. Tokens are
//! never edited in place: the tokenizer's cleanup passes build new tokens when
//! a classification changes. A finished [`TokenStream`] is read-only; each
//! consumer walks it with its own [`Cursor`].

use serde::Serialize;
use std::fmt;

/// Reserved function names used for array literal scopes.
pub const ARRAY: &str = "ARRAY";
pub const ARRAY_ROW: &str = "ARRAYROW";
pub const ARRAY_STOP: &str = "ARRAYSTOP";
pub const ARRAY_ROW_STOP: &str = "ARRAYROWSTOP";

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize)]
pub enum TokenType {
    Operand,
    Function,
    Subexpression,
    Argument,
    OperatorPrefix,
    OperatorInfix,
    OperatorPostfix,
    /// Only exists between the scan and the intersection pass.
    WhiteSpace,
    /// Only exists between the sign pass and the final filter.
    Noop,
    Unknown,
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize)]
pub enum TokenSubtype {
    Start,
    Stop,
    Text,
    Number,
    Logical,
    Error,
    Range,
    Intersect,
    Union,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Token {
    value: String,
    #[serde(rename = "type")]
    token_type: TokenType,
    subtype: Option<TokenSubtype>,
}

impl Token {
    pub fn new(value: impl Into<String>, token_type: TokenType, subtype: Option<TokenSubtype>) -> Token {
        Token {
            value: value.into(),
            token_type,
            subtype,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn subtype(&self) -> Option<TokenSubtype> {
        self.subtype
    }

    /// Copy of this token with a different type; the subtype is kept.
    pub fn with_type(&self, token_type: TokenType) -> Token {
        Token::new(self.value.clone(), token_type, self.subtype)
    }

    /// Copy of this token with a different subtype.
    pub fn with_subtype(&self, subtype: TokenSubtype) -> Token {
        Token::new(self.value.clone(), self.token_type, Some(subtype))
    }

    pub fn is_start(&self) -> bool {
        self.subtype == Some(TokenSubtype::Start)
    }

    pub fn is_stop(&self) -> bool {
        self.subtype == Some(TokenSubtype::Stop)
    }

    pub fn is_operand(&self) -> bool {
        self.token_type == TokenType::Operand
    }

    pub fn is_argument(&self) -> bool {
        self.token_type == TokenType::Argument
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subtype {
            Some(subtype) => write!(f, "{:?}/{:?}({:?})", self.token_type, subtype, self.value),
            None => write!(f, "{:?}({:?})", self.token_type, self.value),
        }
    }
}

/// Ordered tokens produced by the tokenizer.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> TokenStream {
        TokenStream { tokens: Vec::new() }
    }

    pub(crate) fn push(&mut self, token: Token) -> usize {
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens)
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        TokenStream { tokens }
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenStream {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Position in a token slice with one token of lookbehind and lookahead.
///
/// A fresh cursor sits before the first token; call [`Cursor::move_next`]
/// to step onto it.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    index: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Cursor<'a> {
        Cursor {
            tokens,
            index: None,
        }
    }

    /// Advance to the next token. Returns false once past the end.
    pub fn move_next(&mut self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        if next < self.tokens.len() {
            self.index = Some(next);
            true
        } else {
            self.index = Some(self.tokens.len());
            false
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index.filter(|&i| i < self.tokens.len())
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.index().and_then(|i| self.tokens.get(i))
    }

    pub fn previous(&self) -> Option<&'a Token> {
        self.index()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.tokens.get(i))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<&'a Token> {
        self.index().and_then(|i| self.tokens.get(i + 1))
    }

    /// True when the cursor is on the first token.
    pub fn bof(&self) -> bool {
        self.index() == Some(0)
    }

    /// True when the cursor is on the last token.
    pub fn eof(&self) -> bool {
        matches!(self.index(), Some(i) if i + 1 == self.tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenStream {
        TokenStream::from(vec![
            Token::new("A1", TokenType::Operand, Some(TokenSubtype::Range)),
            Token::new("+", TokenType::OperatorInfix, None),
            Token::new("1", TokenType::Operand, Some(TokenSubtype::Number)),
        ])
    }

    #[test]
    fn test_cursor_lookaround() {
        let stream = sample();
        let mut cursor = stream.cursor();
        assert!(cursor.current().is_none());

        assert!(cursor.move_next());
        assert!(cursor.bof());
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.next().map(Token::value), Some("+"));

        assert!(cursor.move_next());
        assert!(!cursor.bof());
        assert!(!cursor.eof());
        assert_eq!(cursor.previous().map(Token::value), Some("A1"));
        assert_eq!(cursor.current().map(Token::value), Some("+"));

        assert!(cursor.move_next());
        assert!(cursor.eof());
        assert!(cursor.next().is_none());

        assert!(!cursor.move_next());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn test_empty_stream_cursor() {
        let stream = TokenStream::new();
        let mut cursor = stream.cursor();
        assert!(!cursor.move_next());
        assert!(!cursor.bof());
        assert!(!cursor.eof());
    }

    #[test]
    fn test_with_type_keeps_value_and_subtype() {
        let token = Token::new("-", TokenType::OperatorInfix, None);
        let prefix = token.with_type(TokenType::OperatorPrefix);
        assert_eq!(prefix.value(), "-");
        assert_eq!(prefix.token_type(), TokenType::OperatorPrefix);
        assert_eq!(token.token_type(), TokenType::OperatorInfix);
    }
}
