//! Formula tokenizer.
//!
//! Turns formula text into a finished [`TokenStream`] in four steps:
//!
//! - **Scan**: one left-to-right pass over the characters. Strings, quoted
//!   sheet paths, bracketed references and error literals are lexical
//!   sub-states; while one is active only its own terminator means anything.
//! - **Intersections**: whitespace between two values becomes the implicit
//!   intersection operator, all other whitespace is dropped.
//! - **Signs and operands**: `+`/`-` with no value on their left become unary
//!   (unary plus is discarded), untyped operands get Number/Logical/Range.
//! - **Filter**: discarded tokens are removed.

use log::{debug, trace};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use super::error::{FormulaError, Result};
use super::scope::{BracketStack, ScopeKind};
use super::token::{ARRAY, ARRAY_ROW, Cursor, Token, TokenStream, TokenSubtype, TokenType};

/// Error literals that end the error sub-state when matched exactly.
pub const ERROR_LITERALS: &[&str] = &[
    "#NULL!",
    "#DIV/0!",
    "#VALUE!",
    "#REF!",
    "#NAME?",
    "#NUM!",
    "#N/A",
    "#SPILL!",
    "#CALC!",
    "#GETTING_DATA",
];

const INFIX_OPERATORS: &str = "+-*/^&=><";
const COMPARISON_OPERATORS: &[&str] = &["=", "<", ">", "<=", ">=", "<>"];

/// Tokenize a formula. A leading `=` is optional.
///
/// With `list_separator_is_semicolon` set, `;` separates arguments (EU
/// locales) and `,` may appear inside numbers as the decimal mark. Otherwise
/// `,` separates arguments and `;` separates array rows.
pub fn tokenize(formula: &str, list_separator_is_semicolon: bool) -> Result<TokenStream> {
    let raw = Scanner::new(formula, list_separator_is_semicolon).scan()?;
    let intersected = resolve_intersections(&raw);
    let resolved = resolve_signs_and_operands(&intersected, list_separator_is_semicolon);
    let tokens: TokenStream = resolved
        .into_iter()
        .filter(|token| token.token_type() != TokenType::Noop)
        .collect();
    trace!("tokenized {:?} into {} tokens", formula, tokens.len());
    Ok(tokens)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LexState {
    Normal,
    Text,
    Path,
    Bracket,
    ErrorLiteral,
}

struct Scanner {
    chars: Vec<(usize, char)>,
    pos: usize,
    separator: char,
    semicolon_rows: bool,
    state: LexState,
    pending: String,
    tokens: TokenStream,
    stack: BracketStack,
}

impl Scanner {
    fn new(formula: &str, list_separator_is_semicolon: bool) -> Scanner {
        let trimmed = formula.trim_start();
        let mut offset = formula.len() - trimmed.len();
        let body = match trimmed.strip_prefix('=') {
            Some(rest) => {
                offset += 1;
                rest
            }
            None => trimmed,
        };

        Scanner {
            chars: body.char_indices().map(|(i, c)| (i + offset, c)).collect(),
            pos: 0,
            separator: if list_separator_is_semicolon { ';' } else { ',' },
            semicolon_rows: !list_separator_is_semicolon,
            state: LexState::Normal,
            pending: String::new(),
            tokens: TokenStream::new(),
            stack: BracketStack::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).map(|&(_, c)| c)
    }

    fn emit(&mut self, value: impl Into<String>, token_type: TokenType, subtype: Option<TokenSubtype>) -> usize {
        self.tokens.push(Token::new(value, token_type, subtype))
    }

    /// Flush pending text as an operand; its subtype is inferred later.
    fn flush_operand(&mut self) {
        if !self.pending.is_empty() {
            let value = std::mem::take(&mut self.pending);
            self.emit(value, TokenType::Operand, None);
        }
    }

    /// Flush pending text that cannot legally precede the next character.
    fn flush_unknown(&mut self) {
        if !self.pending.is_empty() {
            let value = std::mem::take(&mut self.pending);
            debug!("unexpected text {:?} before a literal", value);
            self.emit(value, TokenType::Unknown, None);
        }
    }

    /// Close the innermost scope, which must be one of `expected`.
    fn close_scope(&mut self, position: usize, found: char, expected: &[ScopeKind]) -> Result<()> {
        match self.stack.top_kind() {
            Some(kind) if expected.contains(&kind) => {
                let _ = self.stack.pop();
                self.tokens.push(kind.stop_token());
                Ok(())
            }
            _ => Err(FormulaError::UnbalancedStructure { position, found }),
        }
    }

    fn open_scope(&mut self, kind: ScopeKind, value: impl Into<String>) {
        let token_type = match kind {
            ScopeKind::Subexpression => TokenType::Subexpression,
            _ => TokenType::Function,
        };
        let start = self.emit(value, token_type, Some(TokenSubtype::Start));
        self.stack.push(kind, start);
    }

    fn scan(mut self) -> Result<TokenStream> {
        while let Some(&(position, ch)) = self.chars.get(self.pos) {
            match self.state {
                LexState::Text => self.scan_text(ch),
                LexState::Path => self.scan_path(ch),
                LexState::Bracket => {
                    self.pending.push(ch);
                    if ch == ']' {
                        self.state = LexState::Normal;
                    }
                    self.pos += 1;
                }
                LexState::ErrorLiteral => {
                    self.pending.push(ch);
                    if ERROR_LITERALS.contains(&self.pending.as_str()) {
                        let value = std::mem::take(&mut self.pending);
                        self.emit(value, TokenType::Operand, Some(TokenSubtype::Error));
                        self.state = LexState::Normal;
                    }
                    self.pos += 1;
                }
                LexState::Normal => self.scan_normal(position, ch)?,
            }
        }

        self.finish();
        Ok(self.tokens)
    }

    fn scan_text(&mut self, ch: char) {
        if ch == '"' {
            if self.peek() == Some('"') {
                self.pending.push('"');
                self.pos += 2;
                return;
            }
            let value = std::mem::take(&mut self.pending);
            self.emit(value, TokenType::Operand, Some(TokenSubtype::Text));
            self.state = LexState::Normal;
        } else {
            self.pending.push(ch);
        }
        self.pos += 1;
    }

    fn scan_path(&mut self, ch: char) {
        if ch == '\'' {
            if self.peek() == Some('\'') {
                self.pending.push_str("''");
                self.pos += 2;
                return;
            }
            self.state = LexState::Normal;
        }
        self.pending.push(ch);
        self.pos += 1;
    }

    fn scan_normal(&mut self, position: usize, ch: char) -> Result<()> {
        if matches!(ch, '+' | '-') && self.pending.len() > 1 && scientific_base_re().is_match(&self.pending) {
            self.pending.push(ch);
            self.pos += 1;
            return Ok(());
        }

        match ch {
            '"' => {
                self.flush_unknown();
                self.state = LexState::Text;
            }
            '\'' => {
                self.flush_unknown();
                self.pending.push(ch);
                self.state = LexState::Path;
            }
            '[' => {
                self.pending.push(ch);
                self.state = LexState::Bracket;
            }
            '#' => {
                self.flush_unknown();
                self.pending.push(ch);
                self.state = LexState::ErrorLiteral;
            }
            '{' => {
                self.flush_unknown();
                self.open_scope(ScopeKind::Array, ARRAY);
                self.open_scope(ScopeKind::ArrayRow, ARRAY_ROW);
            }
            '}' => {
                self.flush_operand();
                self.close_scope(position, ch, &[ScopeKind::ArrayRow])?;
                self.close_scope(position, ch, &[ScopeKind::Array])?;
            }
            c if c.is_whitespace() => {
                self.flush_operand();
                self.emit(" ", TokenType::WhiteSpace, None);
                while self.chars.get(self.pos + 1).is_some_and(|&(_, next)| next.is_whitespace()) {
                    self.pos += 1;
                }
            }
            '<' | '>' if matches!((ch, self.peek()), ('<', Some('=' | '>')) | ('>', Some('='))) => {
                self.flush_operand();
                let mut op = String::from(ch);
                op.extend(self.peek());
                self.emit(op, TokenType::OperatorInfix, None);
                self.pos += 1;
            }
            c if INFIX_OPERATORS.contains(c) => {
                self.flush_operand();
                self.emit(c, TokenType::OperatorInfix, None);
            }
            '%' => {
                self.flush_operand();
                self.emit(ch, TokenType::OperatorPostfix, None);
            }
            '(' => {
                if self.pending.is_empty() {
                    self.open_scope(ScopeKind::Subexpression, "");
                } else {
                    let name = std::mem::take(&mut self.pending);
                    self.open_scope(ScopeKind::Function, name);
                }
            }
            ')' => {
                self.flush_operand();
                self.close_scope(position, ch, &[ScopeKind::Function, ScopeKind::Subexpression])?;
            }
            c if c == self.separator => {
                self.flush_operand();
                if self.stack.in_argument_scope() {
                    self.emit(c, TokenType::Argument, None);
                } else {
                    self.emit(c, TokenType::OperatorInfix, Some(TokenSubtype::Union));
                }
            }
            ';' if self.semicolon_rows => {
                self.flush_operand();
                if self.stack.top_kind() == Some(ScopeKind::ArrayRow) {
                    self.close_scope(position, ch, &[ScopeKind::ArrayRow])?;
                    self.emit(ch, TokenType::Argument, None);
                    self.open_scope(ScopeKind::ArrayRow, ARRAY_ROW);
                } else {
                    debug!("row separator at position {} outside an array", position);
                    self.emit(ch, TokenType::Unknown, None);
                }
            }
            _ => self.pending.push(ch),
        }

        self.pos += 1;
        Ok(())
    }

    fn finish(&mut self) {
        match self.state {
            LexState::Normal => self.flush_operand(),
            LexState::Text => {
                debug!("unterminated string literal at end of formula");
                let value = std::mem::take(&mut self.pending);
                self.emit(value, TokenType::Operand, Some(TokenSubtype::Text));
            }
            LexState::ErrorLiteral => {
                debug!("unrecognized error literal {:?}", self.pending);
                let value = std::mem::take(&mut self.pending);
                self.emit(value, TokenType::Operand, Some(TokenSubtype::Error));
            }
            LexState::Path | LexState::Bracket => {
                debug!("unterminated reference {:?} at end of formula", self.pending);
                self.flush_operand();
            }
        }
        self.state = LexState::Normal;

        if !self.stack.is_empty() {
            debug!("closing {} unclosed scope(s) at end of formula", self.stack.depth());
        }
        while let Some(scope) = self.stack.pop() {
            self.tokens.push(scope.kind.stop_token());
        }
    }
}

fn ends_value(token: &Token) -> bool {
    token.is_operand() || token.is_stop()
}

fn begins_value(token: &Token) -> bool {
    token.is_operand() || token.is_start()
}

/// Replace whitespace between two values with an intersection operator and
/// drop every other whitespace marker.
fn resolve_intersections(raw: &TokenStream) -> Vec<Token> {
    let mut out = Vec::with_capacity(raw.len());
    let mut cursor = raw.cursor();

    while cursor.move_next() {
        let Some(token) = cursor.current() else {
            break;
        };
        if token.token_type() != TokenType::WhiteSpace {
            out.push(token.clone());
            continue;
        }
        if cursor.bof() || cursor.eof() {
            continue;
        }
        if let (Some(prev), Some(next)) = (cursor.previous(), cursor.next())
            && ends_value(prev)
            && begins_value(next)
        {
            out.push(Token::new(
                " ",
                TokenType::OperatorInfix,
                Some(TokenSubtype::Intersect),
            ));
        }
    }

    out
}

/// Resolve unary signs and give every operand a subtype.
fn resolve_signs_and_operands(tokens: &[Token], decimal_comma: bool) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut cursor = Cursor::new(tokens);

    while cursor.move_next() {
        let Some(token) = cursor.current() else {
            break;
        };

        let resolved = match token.token_type() {
            TokenType::OperatorInfix if matches!(token.value(), "+" | "-") => {
                let binary = !cursor.bof()
                    && out.last().is_some_and(|prev| {
                        ends_value(prev) || prev.token_type() == TokenType::OperatorPostfix
                    });
                if binary {
                    token.clone()
                } else if token.value() == "-" {
                    token.with_type(TokenType::OperatorPrefix)
                } else {
                    token.with_type(TokenType::Noop)
                }
            }
            TokenType::OperatorInfix
                if token.subtype().is_none() && COMPARISON_OPERATORS.contains(&token.value()) =>
            {
                token.with_subtype(TokenSubtype::Logical)
            }
            TokenType::Operand if token.subtype().is_none() => {
                token.with_subtype(classify_operand(token.value(), decimal_comma))
            }
            _ => token.clone(),
        };
        out.push(resolved);
    }

    out
}

/// Infer the subtype of an operand that is not a string or error literal.
pub fn classify_operand(value: &str, decimal_comma: bool) -> TokenSubtype {
    let numeric: Cow<'_, str> = if decimal_comma && value.contains(',') {
        Cow::Owned(value.replace(',', "."))
    } else {
        Cow::Borrowed(value)
    };

    if number_re().is_match(&numeric) {
        TokenSubtype::Number
    } else if value.eq_ignore_ascii_case("TRUE") || value.eq_ignore_ascii_case("FALSE") {
        TokenSubtype::Logical
    } else {
        TokenSubtype::Range
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("number literal regex must compile")
    })
}

fn scientific_base_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[1-9](?:[.,][0-9]+)?[eE]$").expect("scientific notation regex must compile")
    })
}
