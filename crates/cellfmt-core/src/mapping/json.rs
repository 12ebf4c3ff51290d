//! JSON mapping tables: an array of `{field, location, name?, let_name?}`.

use super::FieldMapping;
use crate::error::{CoreError, Result};

pub fn parse_mapping_json(content: &str) -> Result<Vec<FieldMapping>> {
    let mappings: Vec<FieldMapping> = serde_json::from_str(content)?;
    for (index, mapping) in mappings.iter().enumerate() {
        let row = index + 1;
        if mapping.field.trim().is_empty() {
            return Err(CoreError::MissingField { row, column: "field" });
        }
        if mapping.location.trim().is_empty() {
            return Err(CoreError::MissingField { row, column: "location" });
        }
    }
    Ok(mappings)
}
