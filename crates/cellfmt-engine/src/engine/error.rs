//! Error types for tokenizing and rendering.

use thiserror::Error;

use super::template::RenderCase;

/// Errors produced by the tokenizer and the renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Unbalanced structure: '{found}' at position {position} has no open scope")]
    UnbalancedStructure { position: usize, found: char },

    #[error("Template set has no template for {0}")]
    MissingTemplate(RenderCase),

    #[error("Invalid template {template:?}: {message}")]
    Template { template: String, message: String },
}

pub type Result<T> = std::result::Result<T, FormulaError>;
