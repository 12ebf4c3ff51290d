//! Formula engine API.
//!
//! - [`tokenize`] - Split formula text into a classified [`TokenStream`]
//! - [`Token`], [`TokenType`], [`TokenSubtype`], [`Cursor`] - Token model
//! - [`Template`], [`TemplateSet`], [`RenderCase`] - Output styles
//! - [`render`], [`RenderStrategy`] - Template expansion with per-token overrides
//! - [`CellRef`], [`CellRange`] - A1 references (used by the language emitters)

mod cell_ref;
mod error;
mod render;
mod scope;
mod template;
mod token;
mod tokenizer;

pub use cell_ref::{CellRange, CellRef};
pub use error::{FormulaError, Result};
pub use render::{DefaultStrategy, RenderStrategy, Rewrite, is_balanced, render};
pub use scope::{BracketStack, Scope, ScopeKind};
pub use template::{RenderCase, Template, TemplateSet, TokenEscape};
pub use token::{
    ARRAY, ARRAY_ROW, ARRAY_ROW_STOP, ARRAY_STOP, Cursor, Token, TokenStream, TokenSubtype, TokenType,
};
pub use tokenizer::{ERROR_LITERALS, classify_operand, tokenize};
