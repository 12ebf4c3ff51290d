//! Field-to-location mapping tables.
//!
//! A mapping ties a Smartsheet column (`field`) to the cell range holding
//! its value (`location`). Tables come from CSV exports or JSON.

mod csv;
mod json;

pub use self::csv::parse_mapping_csv;
pub use self::json::parse_mapping_json;

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub field: String,
    pub location: String,
    /// Display name; used to build the LET identifier when `let_name` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifier to bind in the generated LET.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub let_name: Option<String>,
}

impl FieldMapping {
    pub fn new(field: impl Into<String>, location: impl Into<String>) -> FieldMapping {
        FieldMapping {
            field: field.into(),
            location: location.into(),
            name: None,
            let_name: None,
        }
    }

    /// Identifier bound to this field in the LET header.
    ///
    /// `let_name` wins; otherwise `name` (or `field`) with every character
    /// that is not ASCII alphanumeric replaced by `_`, prefixed with `_`.
    pub fn identifier(&self) -> String {
        if let Some(let_name) = self.let_name.as_deref() {
            return let_name.to_string();
        }
        let base = self.name.as_deref().unwrap_or(&self.field);
        let mut id = String::with_capacity(base.len() + 1);
        id.push('_');
        id.extend(base.trim().chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }));
        id
    }
}

/// Load a mapping table, choosing the parser by file extension
/// (`.json` is JSON, anything else is CSV).
pub fn load_mappings(path: &Path) -> Result<Vec<FieldMapping>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mappings = if is_json {
        parse_mapping_json(&content)?
    } else {
        parse_mapping_csv(&content)?
    };
    debug!("loaded {} field mappings from {}", mappings.len(), path.display());
    Ok(mappings)
}

/// Treat blank cells as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
