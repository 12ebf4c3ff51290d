//! Formula to expression-language translation.
//!
//! Targets share the minified template set and differ only in their
//! [`Lexicon`]. The [`LanguageStrategy`] keeps a stack of open calls so it
//! knows what each argument separator means (ternary branch, boolean join,
//! array item).

use log::debug;
use std::fmt;

use crate::engine::{
    ARRAY, ARRAY_ROW, CellRange, CellRef, RenderStrategy, Rewrite, Token, TokenSubtype, TokenType,
};

/// Ranges with more cells than this are left as written.
pub const MAX_EXPANDED_RANGE_CELLS: usize = 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target {
    JavaScript,
    TypeScript,
}

impl Target {
    pub fn lexicon(self) -> &'static Lexicon {
        match self {
            Target::JavaScript | Target::TypeScript => &C_LIKE,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::JavaScript => f.write_str("javascript"),
            Target::TypeScript => f.write_str("typescript"),
        }
    }
}

/// Spellings a target uses for formula constructs.
#[derive(Debug)]
pub struct Lexicon {
    pub equal: &'static str,
    pub not_equal: &'static str,
    pub concat: &'static str,
    pub power: &'static str,
    pub percent: &'static str,
    pub true_literal: &'static str,
    pub false_literal: &'static str,
    pub and: &'static str,
    pub or: &'static str,
    pub not: &'static str,
    pub add: &'static str,
    pub ternary_then: &'static str,
    pub ternary_else: &'static str,
    pub list_separator: &'static str,
    pub array_open: &'static str,
    pub array_close: &'static str,
    /// Formula function name (upper case) to target function name.
    pub functions: &'static [(&'static str, &'static str)],
}

static C_LIKE: Lexicon = Lexicon {
    equal: "===",
    not_equal: "!==",
    concat: "+",
    power: "**",
    percent: "/100",
    true_literal: "true",
    false_literal: "false",
    and: "&&",
    or: "||",
    not: "!",
    add: "+",
    ternary_then: "?",
    ternary_else: ":",
    list_separator: ",",
    array_open: "[",
    array_close: "]",
    functions: &[
        ("MIN", "Math.min"),
        ("MAX", "Math.max"),
        ("ABS", "Math.abs"),
        ("SQRT", "Math.sqrt"),
        ("POWER", "Math.pow"),
    ],
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Frame {
    /// `IF(...)` rendered as a parenthesised ternary.
    Conditional { separators: usize },
    /// Arguments joined by an operator (`AND`, `OR`, `SUM`). `identity` is
    /// the value of a call with no arguments.
    Join {
        op: &'static str,
        identity: &'static str,
        empty: bool,
    },
    Call,
    Group,
    Array,
    ArrayRow,
}

pub struct LanguageStrategy {
    lexicon: &'static Lexicon,
    frames: Vec<Frame>,
    decimal_comma: bool,
}

impl LanguageStrategy {
    pub fn new(target: Target, decimal_comma: bool) -> LanguageStrategy {
        LanguageStrategy {
            lexicon: target.lexicon(),
            frames: Vec::new(),
            decimal_comma,
        }
    }

    fn open_function(&mut self, name: &str) -> Rewrite {
        let lex = self.lexicon;
        let (frame, rewrite) = match name.to_ascii_uppercase().as_str() {
            ARRAY => (Frame::Array, Rewrite::Literal(lex.array_open.to_string())),
            ARRAY_ROW => (Frame::ArrayRow, Rewrite::Literal(lex.array_open.to_string())),
            "IF" => (Frame::Conditional { separators: 0 }, Rewrite::Literal("(".to_string())),
            "AND" => (join(lex.and, lex.true_literal), Rewrite::Literal("(".to_string())),
            "OR" => (join(lex.or, lex.false_literal), Rewrite::Literal("(".to_string())),
            "SUM" => (join(lex.add, "0"), Rewrite::Literal("(".to_string())),
            "NOT" => (Frame::Call, Rewrite::Literal(format!("{}(", lex.not))),
            upper => match lex.functions.iter().find(|(from, _)| *from == upper) {
                Some((_, to)) => (Frame::Call, Rewrite::Token(to.to_string())),
                None => (Frame::Call, Rewrite::Default),
            },
        };
        self.frames.push(frame);
        rewrite
    }

    fn close(&mut self) -> Rewrite {
        let lex = self.lexicon;
        match self.frames.pop() {
            Some(Frame::Array | Frame::ArrayRow) => Rewrite::Literal(lex.array_close.to_string()),
            // IF without an else-branch yields FALSE.
            Some(Frame::Conditional { separators: 1 }) => {
                Rewrite::Literal(format!("{}{})", lex.ternary_else, lex.false_literal))
            }
            Some(Frame::Join {
                identity, empty: true, ..
            }) => Rewrite::Literal(format!("{})", identity)),
            _ => Rewrite::Default,
        }
    }

    fn separator(&mut self) -> Rewrite {
        let lex = self.lexicon;
        let text = match self.frames.last_mut() {
            Some(Frame::Conditional { separators }) => {
                *separators += 1;
                match *separators {
                    1 => lex.ternary_then,
                    2 => lex.ternary_else,
                    _ => lex.list_separator,
                }
            }
            Some(Frame::Join { op, .. }) => *op,
            _ => lex.list_separator,
        };
        Rewrite::Literal(text.to_string())
    }

    fn range(&self, text: &str) -> Rewrite {
        if let Some(range) = CellRange::parse(text) {
            match range.cell_count() {
                Some(count) if count <= MAX_EXPANDED_RANGE_CELLS => {
                    let cells: Vec<String> = range.cells().map(|cell| cell.to_string()).collect();
                    return match self.frames.last() {
                        Some(Frame::Join { op, .. }) => Rewrite::Literal(cells.join(*op)),
                        _ => Rewrite::Literal(format!(
                            "{}{}{}",
                            self.lexicon.array_open,
                            cells.join(self.lexicon.list_separator),
                            self.lexicon.array_close
                        )),
                    };
                }
                _ => {
                    debug!("range {} too large to expand; left as written", text);
                    return Rewrite::Default;
                }
            }
        }
        match CellRef::parse(text) {
            Some(cell) if text.contains('$') => Rewrite::Token(cell.to_string()),
            _ => Rewrite::Default,
        }
    }

    fn infix(&self, text: &str) -> Rewrite {
        let lex = self.lexicon;
        let mapped = match text {
            "=" => lex.equal,
            "<>" => lex.not_equal,
            "&" => lex.concat,
            "^" => lex.power,
            _ => return Rewrite::Default,
        };
        Rewrite::Token(mapped.to_string())
    }
}

impl RenderStrategy for LanguageStrategy {
    fn rewrite(&mut self, text: &str, token: &Token) -> Rewrite {
        use TokenSubtype as S;
        use TokenType as T;

        if !token.is_stop()
            && let Some(Frame::Join { empty, .. }) = self.frames.last_mut()
        {
            *empty = false;
        }

        match (token.token_type(), token.subtype()) {
            (T::Function, Some(S::Start)) => self.open_function(text),
            (T::Subexpression, Some(S::Start)) => {
                self.frames.push(Frame::Group);
                Rewrite::Default
            }
            (T::Function | T::Subexpression, Some(S::Stop)) => self.close(),
            (T::Argument, _) => self.separator(),
            (T::Operand, Some(S::Text)) => Rewrite::Literal(quote_string(text)),
            (T::Operand, Some(S::Logical)) => {
                if text.eq_ignore_ascii_case("TRUE") {
                    Rewrite::Token(self.lexicon.true_literal.to_string())
                } else {
                    Rewrite::Token(self.lexicon.false_literal.to_string())
                }
            }
            (T::Operand, Some(S::Number)) if self.decimal_comma => Rewrite::Token(text.replace(',', ".")),
            (T::Operand, Some(S::Range)) => self.range(text),
            (T::OperatorInfix, Some(S::Intersect | S::Union)) => Rewrite::Default,
            (T::OperatorInfix, _) => self.infix(text),
            (T::OperatorPostfix, _) if text == "%" => Rewrite::Literal(self.lexicon.percent.to_string()),
            _ => Rewrite::Default,
        }
    }
}

fn join(op: &'static str, identity: &'static str) -> Frame {
    Frame::Join {
        op,
        identity,
        empty: true,
    }
}

/// Double-quoted string literal with `\`, `"` and line breaks escaped.
pub fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
