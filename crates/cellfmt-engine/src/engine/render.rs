//! Template renderer.
//!
//! Walks a finished [`TokenStream`] once, asks the [`RenderStrategy`] about
//! each token, and expands the matching [`Template`](super::Template) from a
//! [`TemplateSet`]. The renderer keeps the indent depth; the strategy keeps
//! whatever state it needs of its own.

use log::trace;

use super::error::Result;
use super::scope::ScopeKind;
use super::template::{RenderCase, TemplateSet};
use super::token::{ARRAY, ARRAY_ROW, Token, TokenStream, TokenSubtype, TokenType};

/// What a strategy wants done with one token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rewrite {
    /// Render the token text through its template.
    Default,
    /// Render this text through the token's template instead.
    Token(String),
    /// Emit this text as-is; the template is skipped.
    Literal(String),
}

/// Per-token override hook. Called once per token, in order, with the raw
/// token text.
pub trait RenderStrategy {
    fn rewrite(&mut self, text: &str, token: &Token) -> Rewrite;
}

/// Strategy that never overrides anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStrategy;

impl RenderStrategy for DefaultStrategy {
    fn rewrite(&mut self, _text: &str, _token: &Token) -> Rewrite {
        Rewrite::Default
    }
}

pub fn render<S>(tokens: &TokenStream, templates: &TemplateSet, strategy: &mut S) -> Result<String>
where
    S: RenderStrategy + ?Sized,
{
    let newline = templates.newline.as_str();
    let mut out = String::new();
    let mut depth = 0usize;
    let mut at_line_start = true;
    let mut scopes: Vec<ScopeKind> = Vec::new();

    let mut cursor = tokens.cursor();
    while cursor.move_next() {
        let Some(token) = cursor.current() else {
            break;
        };
        let is_stop = token.is_stop();
        if is_stop {
            scopes.pop();
        }

        let case = RenderCase::of(token, scopes.last().copied());
        let level = if is_stop { depth.saturating_sub(1) } else { depth };
        let indent = if is_stop || at_line_start {
            templates.indent_unit.repeat(level)
        } else {
            String::new()
        };
        let line_break = if cursor.next().is_some_and(Token::is_argument) {
            newline
        } else {
            ""
        };

        match strategy.rewrite(token.value(), token) {
            Rewrite::Literal(text) => {
                trace!("{} -> literal {:?}", case, text);
                out.push_str(&text);
            }
            rewrite => {
                let template = templates.get(case)?;
                let text = match rewrite {
                    Rewrite::Token(text) => text,
                    _ => default_text(token, case, templates),
                };
                if template.fresh_line && !out.is_empty() && !out.ends_with(newline) {
                    out.push_str(newline);
                }
                out.push_str(&template.apply(&text, &indent, line_break));
            }
        }

        if token.is_start() {
            depth += 1;
            scopes.push(scope_kind(token));
        } else if is_stop {
            depth = depth.saturating_sub(1);
        }
        at_line_start = is_stop || out.ends_with(newline);
    }

    let body = out.trim();
    let mut result = String::with_capacity(templates.prefix.len() + body.len() + templates.postfix.len());
    result.push_str(&templates.prefix);
    result.push_str(body);
    result.push_str(&templates.postfix);
    Ok(result)
}

fn default_text(token: &Token, case: RenderCase, templates: &TemplateSet) -> String {
    if case == RenderCase::OperandText {
        let doubled = token.value().replace('"', "\"\"");
        templates.escape.escape(&doubled).into_owned()
    } else {
        templates.escape.escape(token.value()).into_owned()
    }
}

fn scope_kind(start: &Token) -> ScopeKind {
    match (start.token_type(), start.value()) {
        (TokenType::Subexpression, _) => ScopeKind::Subexpression,
        (TokenType::Function, ARRAY) => ScopeKind::Array,
        (TokenType::Function, ARRAY_ROW) => ScopeKind::ArrayRow,
        _ => ScopeKind::Function,
    }
}

/// Check that Start and Stop tokens pair up and depth never goes negative.
pub fn is_balanced(tokens: &TokenStream) -> bool {
    let mut depth = 0usize;
    for token in tokens {
        match token.subtype() {
            Some(TokenSubtype::Start) => depth += 1,
            Some(TokenSubtype::Stop) => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
