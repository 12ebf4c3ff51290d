//! Error types for cellfmt core.

use cellfmt_engine::FormulaError;
use thiserror::Error;

/// Errors raised by the mapping loaders, the LET rewriter and settings.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mapping is missing the required '{0}' column")]
    MissingHeader(&'static str),

    #[error("Mapping row {row} has no value for '{column}'")]
    MissingField { row: usize, column: &'static str },

    #[error("No mapping for field reference '{0}'")]
    UnmappedReference(String),

    #[error("Unknown mode '{0}'")]
    UnknownMode(String),

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
