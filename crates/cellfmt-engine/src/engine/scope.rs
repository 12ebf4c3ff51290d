//! Open-scope tracking for pairing Start and Stop tokens.

use super::token::{ARRAY_ROW_STOP, ARRAY_STOP, Token, TokenSubtype, TokenType};

/// Kind of bracketed scope opened by a Start token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopeKind {
    Function,
    Subexpression,
    Array,
    ArrayRow,
}

impl ScopeKind {
    /// Scopes whose list separators are arguments rather than union operators.
    pub fn takes_arguments(self) -> bool {
        !matches!(self, ScopeKind::Subexpression)
    }

    /// Build the Stop token closing a scope of this kind.
    pub fn stop_token(self) -> Token {
        match self {
            ScopeKind::Function => Token::new("", TokenType::Function, Some(TokenSubtype::Stop)),
            ScopeKind::Subexpression => {
                Token::new("", TokenType::Subexpression, Some(TokenSubtype::Stop))
            }
            ScopeKind::Array => Token::new(ARRAY_STOP, TokenType::Function, Some(TokenSubtype::Stop)),
            ScopeKind::ArrayRow => {
                Token::new(ARRAY_ROW_STOP, TokenType::Function, Some(TokenSubtype::Stop))
            }
        }
    }
}

/// An open scope: its kind and the stream index of its Start token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub start: usize,
}

/// Stack of open scopes, innermost last.
#[derive(Clone, Debug, Default)]
pub struct BracketStack {
    scopes: Vec<Scope>,
}

impl BracketStack {
    pub fn new() -> BracketStack {
        BracketStack::default()
    }

    pub fn push(&mut self, kind: ScopeKind, start: usize) {
        self.scopes.push(Scope { kind, start });
    }

    /// Close the innermost scope. `None` means there was nothing to close,
    /// which callers must report rather than ignore.
    #[must_use]
    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    pub fn top(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn top_kind(&self) -> Option<ScopeKind> {
        self.top().map(|scope| scope.kind)
    }

    /// True when the innermost scope collects arguments.
    pub fn in_argument_scope(&self) -> bool {
        self.top_kind().is_some_and(ScopeKind::takes_arguments)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_empty_is_reported() {
        let mut stack = BracketStack::new();
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_argument_scope_follows_innermost() {
        let mut stack = BracketStack::new();
        assert!(!stack.in_argument_scope());
        stack.push(ScopeKind::Function, 0);
        assert!(stack.in_argument_scope());
        stack.push(ScopeKind::Subexpression, 1);
        assert!(!stack.in_argument_scope());
        assert_eq!(stack.pop().map(|s| s.start), Some(1));
        assert!(stack.in_argument_scope());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_array_stop_tokens() {
        let stop = ScopeKind::ArrayRow.stop_token();
        assert_eq!(stop.value(), ARRAY_ROW_STOP);
        assert!(stop.is_stop());
        assert_eq!(ScopeKind::Subexpression.stop_token().token_type(), TokenType::Subexpression);
    }
}
