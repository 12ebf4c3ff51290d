//! Render cases and the templates that format them.
//!
//! Every token maps to exactly one [`RenderCase`]. A [`TemplateSet`] holds one
//! [`Template`] per case plus the layout strings shared by all of them.
//!
//! Templates can be written in placeholder form:
//!
//! ```text
//! {{newline}}{{autoindent}}<before>{{token}}<after>{{autolinebreak}}
//! ```
//!
//! Each placeholder is optional but they must appear in that order.

use std::collections::BTreeMap;
use std::fmt;

use super::error::{FormulaError, Result};
use super::scope::ScopeKind;
use super::token::{ARRAY, ARRAY_ROW, ARRAY_ROW_STOP, ARRAY_STOP, Token, TokenSubtype, TokenType};

const NEWLINE: &str = "{{newline}}";
const AUTOINDENT: &str = "{{autoindent}}";
const TOKEN: &str = "{{token}}";
const AUTOLINEBREAK: &str = "{{autolinebreak}}";

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum RenderCase {
    FunctionStart,
    FunctionStop,
    ArrayStart,
    ArrayStop,
    ArrayRowStart,
    ArrayRowStop,
    ArrayItemSeparator,
    ArrayRowSeparator,
    SubexpressionStart,
    SubexpressionStop,
    Argument,
    OperandText,
    OperandNumber,
    OperandLogical,
    OperandError,
    OperandRange,
    OperatorPrefix,
    OperatorInfix,
    OperatorIntersect,
    OperatorUnion,
    OperatorPostfix,
    Unknown,
}

impl RenderCase {
    pub const ALL: [RenderCase; 22] = [
        RenderCase::FunctionStart,
        RenderCase::FunctionStop,
        RenderCase::ArrayStart,
        RenderCase::ArrayStop,
        RenderCase::ArrayRowStart,
        RenderCase::ArrayRowStop,
        RenderCase::ArrayItemSeparator,
        RenderCase::ArrayRowSeparator,
        RenderCase::SubexpressionStart,
        RenderCase::SubexpressionStop,
        RenderCase::Argument,
        RenderCase::OperandText,
        RenderCase::OperandNumber,
        RenderCase::OperandLogical,
        RenderCase::OperandError,
        RenderCase::OperandRange,
        RenderCase::OperatorPrefix,
        RenderCase::OperatorInfix,
        RenderCase::OperatorIntersect,
        RenderCase::OperatorUnion,
        RenderCase::OperatorPostfix,
        RenderCase::Unknown,
    ];

    /// Pick the case for a token. `innermost` is the innermost scope open
    /// before the token, which decides how separators inside arrays render.
    pub fn of(token: &Token, innermost: Option<ScopeKind>) -> RenderCase {
        use TokenSubtype as S;
        use TokenType as T;

        match (token.token_type(), token.subtype()) {
            (T::Function, Some(S::Start)) => match token.value() {
                ARRAY => RenderCase::ArrayStart,
                ARRAY_ROW => RenderCase::ArrayRowStart,
                _ => RenderCase::FunctionStart,
            },
            (T::Function, Some(S::Stop)) => match token.value() {
                ARRAY_STOP => RenderCase::ArrayStop,
                ARRAY_ROW_STOP => RenderCase::ArrayRowStop,
                _ => RenderCase::FunctionStop,
            },
            (T::Subexpression, Some(S::Start)) => RenderCase::SubexpressionStart,
            (T::Subexpression, Some(S::Stop)) => RenderCase::SubexpressionStop,
            (T::Argument, _) => match innermost {
                Some(ScopeKind::ArrayRow) => RenderCase::ArrayItemSeparator,
                Some(ScopeKind::Array) => RenderCase::ArrayRowSeparator,
                _ => RenderCase::Argument,
            },
            (T::Operand, Some(S::Text)) => RenderCase::OperandText,
            (T::Operand, Some(S::Number)) => RenderCase::OperandNumber,
            (T::Operand, Some(S::Logical)) => RenderCase::OperandLogical,
            (T::Operand, Some(S::Error)) => RenderCase::OperandError,
            (T::Operand, _) => RenderCase::OperandRange,
            (T::OperatorPrefix, _) => RenderCase::OperatorPrefix,
            (T::OperatorInfix, Some(S::Intersect)) => RenderCase::OperatorIntersect,
            (T::OperatorInfix, Some(S::Union)) => RenderCase::OperatorUnion,
            (T::OperatorInfix, _) => RenderCase::OperatorInfix,
            (T::OperatorPostfix, _) => RenderCase::OperatorPostfix,
            _ => RenderCase::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderCase::FunctionStart => "function_start",
            RenderCase::FunctionStop => "function_stop",
            RenderCase::ArrayStart => "array_start",
            RenderCase::ArrayStop => "array_stop",
            RenderCase::ArrayRowStart => "array_row_start",
            RenderCase::ArrayRowStop => "array_row_stop",
            RenderCase::ArrayItemSeparator => "array_item_separator",
            RenderCase::ArrayRowSeparator => "array_row_separator",
            RenderCase::SubexpressionStart => "subexpression_start",
            RenderCase::SubexpressionStop => "subexpression_stop",
            RenderCase::Argument => "argument",
            RenderCase::OperandText => "operand_text",
            RenderCase::OperandNumber => "operand_number",
            RenderCase::OperandLogical => "operand_logical",
            RenderCase::OperandError => "operand_error",
            RenderCase::OperandRange => "operand_range",
            RenderCase::OperatorPrefix => "operator_prefix",
            RenderCase::OperatorInfix => "operator_infix",
            RenderCase::OperatorIntersect => "operator_intersect",
            RenderCase::OperatorUnion => "operator_union",
            RenderCase::OperatorPostfix => "operator_postfix",
            RenderCase::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Option<RenderCase> {
        RenderCase::ALL.into_iter().find(|case| case.name() == name)
    }
}

impl fmt::Display for RenderCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured form of a placeholder template.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Template {
    /// `{{newline}}`: start on a fresh line unless the output already ends
    /// with a newline.
    pub fresh_line: bool,
    /// `{{autoindent}}`
    pub indent: bool,
    pub before: String,
    /// `{{token}}`
    pub token: bool,
    pub after: String,
    /// `{{autolinebreak}}`
    pub line_break: bool,
}

impl Template {
    /// Template that emits only literal text.
    pub fn literal(text: &str) -> Template {
        Template {
            before: text.to_string(),
            ..Template::default()
        }
    }

    /// Template that emits the token between two literal strings.
    pub fn wrap(before: &str, after: &str) -> Template {
        Template {
            before: before.to_string(),
            token: true,
            after: after.to_string(),
            ..Template::default()
        }
    }

    pub fn indented(mut self) -> Template {
        self.indent = true;
        self
    }

    pub fn on_fresh_line(mut self) -> Template {
        self.fresh_line = true;
        self
    }

    pub fn with_line_break(mut self) -> Template {
        self.line_break = true;
        self
    }

    /// Parse a template written with placeholders.
    pub fn parse(source: &str) -> Result<Template> {
        let invalid = |message: &str| FormulaError::Template {
            template: source.to_string(),
            message: message.to_string(),
        };

        let mut rest = source;
        let fresh_line = consume_prefix(&mut rest, NEWLINE);
        let indent = consume_prefix(&mut rest, AUTOINDENT);
        let line_break = match rest.strip_suffix(AUTOLINEBREAK) {
            Some(stripped) => {
                rest = stripped;
                true
            }
            None => false,
        };

        let (before, token, after) = match rest.split_once(TOKEN) {
            Some((before, after)) => (before, true, after),
            None => (rest, false, ""),
        };

        for text in [before, after] {
            if text.contains(TOKEN) {
                return Err(invalid("{{token}} may appear only once"));
            }
            for placeholder in [NEWLINE, AUTOINDENT, AUTOLINEBREAK] {
                if text.contains(placeholder) {
                    return Err(invalid(&format!("{} is out of place", placeholder)));
                }
            }
        }

        Ok(Template {
            fresh_line,
            indent,
            before: before.to_string(),
            token,
            after: after.to_string(),
            line_break,
        })
    }

    /// Expand the template for one token.
    pub fn apply(&self, token: &str, indent: &str, line_break: &str) -> String {
        let mut out = String::with_capacity(self.before.len() + token.len() + self.after.len());
        if self.indent {
            out.push_str(indent);
        }
        out.push_str(&self.before);
        if self.token {
            out.push_str(token);
        }
        out.push_str(&self.after);
        if self.line_break {
            out.push_str(line_break);
        }
        out
    }
}

fn consume_prefix(rest: &mut &str, prefix: &str) -> bool {
    match rest.strip_prefix(prefix) {
        Some(stripped) => {
            *rest = stripped;
            true
        }
        None => false,
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fresh_line {
            f.write_str(NEWLINE)?;
        }
        if self.indent {
            f.write_str(AUTOINDENT)?;
        }
        f.write_str(&self.before)?;
        if self.token {
            f.write_str(TOKEN)?;
        }
        f.write_str(&self.after)?;
        if self.line_break {
            f.write_str(AUTOLINEBREAK)?;
        }
        Ok(())
    }
}

/// How default token text is escaped before it is placed in a template.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TokenEscape {
    #[default]
    None,
    Html,
}

impl TokenEscape {
    pub fn escape<'a>(self, text: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            TokenEscape::None => std::borrow::Cow::Borrowed(text),
            TokenEscape::Html if !text.contains(['&', '<', '>', '"', '\'']) => {
                std::borrow::Cow::Borrowed(text)
            }
            TokenEscape::Html => {
                let mut out = String::with_capacity(text.len() + 8);
                for ch in text.chars() {
                    match ch {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        '"' => out.push_str("&quot;"),
                        '\'' => out.push_str("&#39;"),
                        _ => out.push(ch),
                    }
                }
                std::borrow::Cow::Owned(out)
            }
        }
    }
}

/// A complete output style: one template per render case plus layout.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TemplateSet {
    templates: BTreeMap<RenderCase, Template>,
    /// Repeated once per nesting level for `{{autoindent}}`.
    pub indent_unit: String,
    /// Used for `{{autolinebreak}}` and `{{newline}}` and to detect line starts.
    pub newline: String,
    pub prefix: String,
    pub postfix: String,
    pub escape: TokenEscape,
}

impl TemplateSet {
    pub fn new() -> TemplateSet {
        TemplateSet::default()
    }

    pub fn set(&mut self, case: RenderCase, template: Template) -> &mut TemplateSet {
        self.templates.insert(case, template);
        self
    }

    pub fn with(mut self, case: RenderCase, template: Template) -> TemplateSet {
        self.templates.insert(case, template);
        self
    }

    pub fn remove(&mut self, case: RenderCase) -> Option<Template> {
        self.templates.remove(&case)
    }

    pub fn get(&self, case: RenderCase) -> Result<&Template> {
        self.templates
            .get(&case)
            .ok_or(FormulaError::MissingTemplate(case))
    }

    /// Cases with no template.
    pub fn missing(&self) -> Vec<RenderCase> {
        RenderCase::ALL
            .into_iter()
            .filter(|case| !self.templates.contains_key(case))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_template() {
        let template = Template::parse("{{newline}}{{autoindent}}<b>{{token}}</b>(\n{{autolinebreak}}").unwrap();
        assert!(template.fresh_line);
        assert!(template.indent);
        assert!(template.token);
        assert!(template.line_break);
        assert_eq!(template.before, "<b>");
        assert_eq!(template.after, "</b>(\n");
        assert_eq!(template.apply("SUM", "  ", "\n"), "  <b>SUM</b>(\n\n");
    }

    #[test]
    fn test_parse_literal_template() {
        let template = Template::parse(",\n").unwrap();
        assert!(!template.token);
        assert_eq!(template.apply(";", "    ", ""), ",\n");
    }

    #[test]
    fn test_parse_rejects_misplaced_placeholders() {
        assert!(matches!(
            Template::parse("{{token}}{{autoindent}}"),
            Err(FormulaError::Template { .. })
        ));
        assert!(Template::parse("{{token}}{{token}}").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let source = "{{autoindent}}\"{{token}}\"{{autolinebreak}}";
        assert_eq!(Template::parse(source).unwrap().to_string(), source);
    }

    #[test]
    fn test_case_names_round_trip() {
        for case in RenderCase::ALL {
            assert_eq!(RenderCase::from_name(case.name()), Some(case));
        }
    }

    #[test]
    fn test_argument_case_depends_on_scope() {
        let sep = Token::new(",", TokenType::Argument, None);
        assert_eq!(RenderCase::of(&sep, Some(ScopeKind::Function)), RenderCase::Argument);
        assert_eq!(RenderCase::of(&sep, Some(ScopeKind::ArrayRow)), RenderCase::ArrayItemSeparator);
        assert_eq!(RenderCase::of(&sep, Some(ScopeKind::Array)), RenderCase::ArrayRowSeparator);
    }

    #[test]
    fn test_missing_template_is_reported() {
        let set = TemplateSet::new().with(RenderCase::OperandNumber, Template::wrap("", ""));
        assert!(set.get(RenderCase::OperandNumber).is_ok());
        assert_eq!(
            set.get(RenderCase::Argument),
            Err(FormulaError::MissingTemplate(RenderCase::Argument))
        );
        assert_eq!(set.missing().len(), RenderCase::ALL.len() - 1);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(TokenEscape::Html.escape("<>"), "&lt;&gt;");
        assert_eq!(TokenEscape::None.escape("<>"), "<>");
    }
}
