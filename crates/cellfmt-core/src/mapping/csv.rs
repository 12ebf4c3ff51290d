//! CSV mapping tables.

use log::debug;

use super::{FieldMapping, non_blank};
use crate::error::{CoreError, Result};

/// Column positions resolved from the header row.
struct Columns {
    field: usize,
    location: usize,
    name: Option<usize>,
    let_name: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Columns> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };
        Ok(Columns {
            field: find("field").ok_or(CoreError::MissingHeader("field"))?,
            location: find("location").ok_or(CoreError::MissingHeader("location"))?,
            name: find("name"),
            let_name: find("let_name"),
        })
    }
}

/// Parse a CSV mapping table. The header row must name `field` and
/// `location` columns; `name` and `let_name` are optional. Headers match
/// case-insensitively and blank rows are skipped.
pub fn parse_mapping_csv(content: &str) -> Result<Vec<FieldMapping>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut mappings = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Header is row 1.
        let row = index + 2;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            debug!("skipping blank mapping row {}", row);
            continue;
        }

        let field = non_blank(record.get(columns.field)).ok_or(CoreError::MissingField { row, column: "field" })?;
        let location = non_blank(record.get(columns.location))
            .ok_or(CoreError::MissingField { row, column: "location" })?;

        mappings.push(FieldMapping {
            field,
            location,
            name: columns.name.and_then(|i| non_blank(record.get(i))),
            let_name: columns.let_name.and_then(|i| non_blank(record.get(i))),
        });
    }

    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_with_optional_columns() {
        let content = "\
Field,Location,Name,LET_NAME
\"Due Date\",'Data'!C:C,Due,
Status,B:B,,status
";
        let mappings = parse_mapping_csv(content).unwrap();
        assert_eq!(
            mappings,
            vec![
                FieldMapping {
                    field: "Due Date".to_string(),
                    location: "'Data'!C:C".to_string(),
                    name: Some("Due".to_string()),
                    let_name: None,
                },
                FieldMapping {
                    field: "Status".to_string(),
                    location: "B:B".to_string(),
                    name: None,
                    let_name: Some("status".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_quoted_commas_and_blank_rows() {
        let content = "location , field\n\"Sheet1!A1:A9\",\"Cost, Total\"\n,\n";
        let mappings = parse_mapping_csv(content).unwrap();
        assert_eq!(mappings, vec![FieldMapping::new("Cost, Total", "Sheet1!A1:A9")]);
    }

    #[test]
    fn test_missing_header() {
        let err = parse_mapping_csv("field,range\nA,B\n").unwrap_err();
        assert!(matches!(err, CoreError::MissingHeader("location")));
    }

    #[test]
    fn test_missing_location_value() {
        let err = parse_mapping_csv("field,location\nStatus,\n").unwrap_err();
        assert!(matches!(err, CoreError::MissingField { row: 2, column: "location" }));
    }
}
