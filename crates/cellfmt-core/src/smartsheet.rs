//! Smartsheet `@row` references to Excel `LET`.
//!
//! Smartsheet formulas address the current row by column name
//! (`[Due Date]@row`, `Status@row`). [`SmartsheetRewriter`] swaps each such
//! reference for an identifier and binds the identifiers to the mapped
//! locations in a `LET(...)` header:
//!
//! ```text
//! =IF([Due Date]@row < TODAY(), "Late", Status@row)
//! =LET(_Due_Date, C:C, _Status, B:B, IF(_Due_Date < TODAY(), "Late", _Status))
//! ```

use log::{debug, trace};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

use cellfmt_engine::emit::{BeautifyOptions, beautify_with, minify};

use crate::error::{CoreError, Result};
use crate::mapping::FieldMapping;

/// Layout applied to a rewritten formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    Beautify(BeautifyOptions),
    Minify,
}

pub struct SmartsheetRewriter {
    mappings: Vec<FieldMapping>,
    /// Lower-cased field name to index in `mappings`.
    by_field: HashMap<String, usize>,
    eu: bool,
}

impl SmartsheetRewriter {
    pub fn new(mappings: &[FieldMapping]) -> SmartsheetRewriter {
        let mut by_field = HashMap::with_capacity(mappings.len());
        for (index, mapping) in mappings.iter().enumerate() {
            // First row wins for duplicated fields.
            by_field.entry(field_key(&mapping.field)).or_insert(index);
        }
        SmartsheetRewriter {
            mappings: mappings.to_vec(),
            by_field,
            eu: false,
        }
    }

    /// Use `;` between LET arguments and format with the EU separator.
    pub fn eu(mut self, eu: bool) -> SmartsheetRewriter {
        self.eu = eu;
        self
    }

    /// Replace `@row` references and wrap the formula in `LET`. Formulas with
    /// no references come back unchanged.
    pub fn rewrite(&self, formula: &str) -> Result<String> {
        let trimmed = formula.trim();
        let body = trimmed.strip_prefix('=').unwrap_or(trimmed);

        let mut used: Vec<usize> = Vec::new();
        let mut unmapped: Option<String> = None;

        let replaced = replace_outside_strings(body, |segment| {
            field_ref_re()
                .replace_all(segment, |caps: &Captures| {
                    let whole = &caps[0];
                    let field = caps
                        .name("bracketed")
                        .or_else(|| caps.name("bare"))
                        .map_or("", |m| m.as_str());
                    match self.by_field.get(&field_key(field)) {
                        Some(&index) => {
                            if !used.contains(&index) {
                                used.push(index);
                            }
                            let id = self.mappings[index].identifier();
                            trace!("{} -> {}", whole, id);
                            id
                        }
                        None => {
                            if unmapped.is_none() {
                                unmapped = Some(whole.to_string());
                            }
                            whole.to_string()
                        }
                    }
                })
                .into_owned()
        });

        if let Some(reference) = unmapped {
            return Err(CoreError::UnmappedReference(reference));
        }
        if used.is_empty() {
            return Ok(formula.to_string());
        }

        let separator = if self.eu { "; " } else { ", " };
        let mut out = String::from("=LET(");
        for &index in &used {
            let mapping = &self.mappings[index];
            out.push_str(&mapping.identifier());
            out.push_str(separator);
            out.push_str(&mapping.location);
            out.push_str(separator);
        }
        out.push_str(replaced.trim());
        out.push(')');
        debug!("bound {} field references in LET", used.len());
        Ok(out)
    }

    /// Rewrite, then lay the result out with the formula engine.
    pub fn rewrite_with_layout(&self, formula: &str, layout: Layout) -> Result<String> {
        let rewritten = self.rewrite(formula)?;
        let formatted = match layout {
            Layout::Beautify(options) => beautify_with(&rewritten, &options, self.eu)?,
            Layout::Minify => minify(&rewritten, self.eu)?,
        };
        Ok(formatted)
    }
}

fn field_key(field: &str) -> String {
    field.trim().to_lowercase()
}

fn field_ref_re() -> &'static Regex {
    static FIELD_REF_RE: OnceLock<Regex> = OnceLock::new();
    FIELD_REF_RE.get_or_init(|| {
        Regex::new(r"(?:\[(?<bracketed>[^\]]+)\]|\b(?<bare>[A-Za-z_][A-Za-z0-9_.]*))(?i:@row)\b")
            .expect("field reference regex must compile")
    })
}

/// Apply `f` to every stretch of `text` outside double-quoted strings.
/// Doubled quotes inside a string close and reopen it, which leaves the
/// string untouched either way.
fn replace_outside_strings(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut seg_start = 0;
    let mut in_string = false;

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'"' {
            continue;
        }
        if in_string {
            out.push_str(&text[seg_start..=i]);
            seg_start = i + 1;
        } else {
            out.push_str(&f(&text[seg_start..i]));
            seg_start = i;
        }
        in_string = !in_string;
    }

    if seg_start < text.len() {
        if in_string {
            out.push_str(&text[seg_start..]);
        } else {
            out.push_str(&f(&text[seg_start..]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellfmt_engine::emit::Indent;
    use pretty_assertions::assert_eq;

    fn mappings() -> Vec<FieldMapping> {
        let mut status = FieldMapping::new("Status", "B:B");
        status.let_name = Some("status".to_string());
        vec![FieldMapping::new("Due Date", "C:C"), status]
    }

    #[test]
    fn test_rewrite_binds_in_first_use_order() {
        let rewriter = SmartsheetRewriter::new(&mappings());
        let out = rewriter
            .rewrite("=IF(status@ROW=\"Done\",\"\",[due date]@row+[Due Date]@row)")
            .unwrap();
        assert_eq!(
            out,
            "=LET(status, B:B, _Due_Date, C:C, IF(status=\"Done\",\"\",_Due_Date+_Due_Date))"
        );
    }

    #[test]
    fn test_strings_are_left_alone() {
        let rewriter = SmartsheetRewriter::new(&mappings());
        let out = rewriter.rewrite("=\"Status@row \"\"x\"\"\"&Status@row").unwrap();
        assert_eq!(out, "=LET(status, B:B, \"Status@row \"\"x\"\"\"&status)");
    }

    #[test]
    fn test_no_references_is_unchanged() {
        let rewriter = SmartsheetRewriter::new(&mappings());
        assert_eq!(rewriter.rewrite("=SUM(A1:A3)").unwrap(), "=SUM(A1:A3)");
    }

    #[test]
    fn test_unmapped_reference_fails() {
        let rewriter = SmartsheetRewriter::new(&mappings());
        let err = rewriter.rewrite("=[Owner]@row").unwrap_err();
        assert!(matches!(err, CoreError::UnmappedReference(ref r) if r == "[Owner]@row"));
    }

    #[test]
    fn test_rewrite_with_layout() {
        let rewriter = SmartsheetRewriter::new(&mappings());
        assert_eq!(
            rewriter.rewrite_with_layout("= Status@row & 1", Layout::Minify).unwrap(),
            "=LET(status,B:B,status&1)"
        );
        let options = BeautifyOptions {
            indent: Indent::Spaces(2),
            comma_first: false,
        };
        assert_eq!(
            rewriter
                .rewrite_with_layout("=Status@row", Layout::Beautify(options))
                .unwrap(),
            "=LET(\n  status,\n  B:B,\n  status\n)"
        );
    }
}
