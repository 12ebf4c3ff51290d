//! Built-in template sets.

use crate::engine::{RenderCase, Template, TemplateSet, TokenEscape};

/// Multi-line layout: one argument per line, nested calls indented by
/// `indent_unit`. With `comma_first` the separator starts the next line.
pub fn beautify_templates(indent_unit: &str, comma_first: bool) -> TemplateSet {
    let nl = "\n";
    let argument = if comma_first {
        Template::wrap("", " ").indented()
    } else {
        Template::wrap("", nl)
    };
    let mut set = TemplateSet::new()
        .with(RenderCase::FunctionStart, Template::wrap("", &format!("({}", nl)).indented())
        .with(RenderCase::FunctionStop, Template::literal(")").on_fresh_line().indented())
        .with(RenderCase::SubexpressionStart, Template::literal(&format!("({}", nl)).indented())
        .with(RenderCase::SubexpressionStop, Template::literal(")").on_fresh_line().indented())
        .with(RenderCase::ArrayStart, Template::literal("{").indented())
        .with(RenderCase::ArrayStop, Template::literal("}"))
        .with(RenderCase::ArrayRowStart, Template::literal(""))
        .with(RenderCase::ArrayRowStop, Template::literal(""))
        .with(RenderCase::ArrayItemSeparator, Template::wrap("", ""))
        .with(RenderCase::ArrayRowSeparator, Template::wrap("", ""))
        .with(RenderCase::Argument, argument)
        .with(RenderCase::OperandText, Template::wrap("\"", "\"").indented())
        .with(RenderCase::OperandNumber, Template::wrap("", "").indented())
        .with(RenderCase::OperandLogical, Template::wrap("", "").indented())
        .with(RenderCase::OperandError, Template::wrap("", "").indented())
        .with(RenderCase::OperandRange, Template::wrap("", "").indented())
        .with(RenderCase::OperatorPrefix, Template::wrap("", "").indented())
        .with(RenderCase::OperatorInfix, Template::wrap(" ", " "))
        .with(RenderCase::OperatorIntersect, Template::literal(" "))
        .with(RenderCase::OperatorUnion, Template::wrap("", " "))
        .with(RenderCase::OperatorPostfix, Template::wrap("", ""))
        .with(RenderCase::Unknown, Template::wrap("", "").indented());

    if comma_first {
        for case in [
            RenderCase::FunctionStop,
            RenderCase::SubexpressionStop,
            RenderCase::ArrayStop,
            RenderCase::OperandText,
            RenderCase::OperandNumber,
            RenderCase::OperandLogical,
            RenderCase::OperandError,
            RenderCase::OperandRange,
            RenderCase::OperatorPostfix,
            RenderCase::Unknown,
        ] {
            if let Some(template) = set.get(case).ok().cloned() {
                set.set(case, template.with_line_break());
            }
        }
    }

    set.indent_unit = indent_unit.to_string();
    set.newline = nl.to_string();
    set.prefix = "=".to_string();
    set
}

/// Everything inline with no optional whitespace.
pub fn minify_templates() -> TemplateSet {
    let mut set = TemplateSet::new()
        .with(RenderCase::FunctionStart, Template::wrap("", "("))
        .with(RenderCase::FunctionStop, Template::literal(")"))
        .with(RenderCase::SubexpressionStart, Template::literal("("))
        .with(RenderCase::SubexpressionStop, Template::literal(")"))
        .with(RenderCase::ArrayStart, Template::literal("{"))
        .with(RenderCase::ArrayStop, Template::literal("}"))
        .with(RenderCase::ArrayRowStart, Template::literal(""))
        .with(RenderCase::ArrayRowStop, Template::literal(""))
        .with(RenderCase::OperandText, Template::wrap("\"", "\""))
        .with(RenderCase::OperatorIntersect, Template::literal(" "));
    for case in [
        RenderCase::ArrayItemSeparator,
        RenderCase::ArrayRowSeparator,
        RenderCase::Argument,
        RenderCase::OperandNumber,
        RenderCase::OperandLogical,
        RenderCase::OperandError,
        RenderCase::OperandRange,
        RenderCase::OperatorPrefix,
        RenderCase::OperatorInfix,
        RenderCase::OperatorUnion,
        RenderCase::OperatorPostfix,
        RenderCase::Unknown,
    ] {
        set.set(case, Template::wrap("", ""));
    }
    set.prefix = "=".to_string();
    set
}

/// Minified structure without the leading `=`, for code generation.
pub fn language_templates() -> TemplateSet {
    let mut set = minify_templates();
    set.prefix.clear();
    set
}

fn span(class: &str) -> Template {
    Template::wrap(&format!("<span class=\"{}\">", class), "</span>")
}

fn span_literal(class: &str, text: &str) -> Template {
    Template::literal(&format!("<span class=\"{}\">{}</span>", class, text))
}

/// Beautify's layout with every token wrapped in a classed `<span>`.
pub fn html_templates(indent_width: usize) -> TemplateSet {
    let nl = "<br />\n";
    let mut set = TemplateSet::new()
        .with(
            RenderCase::FunctionStart,
            Template::wrap(
                "<span class=\"function\">",
                &format!("</span><span class=\"function-start\">(</span>{}", nl),
            )
            .indented(),
        )
        .with(
            RenderCase::FunctionStop,
            span_literal("function-stop", ")").on_fresh_line().indented(),
        )
        .with(
            RenderCase::SubexpressionStart,
            Template::literal(&format!("<span class=\"subexpression-start\">(</span>{}", nl)).indented(),
        )
        .with(
            RenderCase::SubexpressionStop,
            span_literal("subexpression-stop", ")").on_fresh_line().indented(),
        )
        .with(RenderCase::ArrayStart, span_literal("array", "{").indented())
        .with(RenderCase::ArrayStop, span_literal("array", "}"))
        .with(RenderCase::ArrayRowStart, Template::literal(""))
        .with(RenderCase::ArrayRowStop, Template::literal(""))
        .with(RenderCase::ArrayItemSeparator, span("array-separator"))
        .with(RenderCase::ArrayRowSeparator, span("array-separator"))
        .with(
            RenderCase::Argument,
            Template::wrap("<span class=\"argument\">", &format!("</span>{}", nl)),
        )
        .with(
            RenderCase::OperandText,
            Template::wrap("<span class=\"text\">&quot;", "&quot;</span>").indented(),
        )
        .with(RenderCase::OperandNumber, span("number").indented())
        .with(RenderCase::OperandLogical, span("logical").indented())
        .with(RenderCase::OperandError, span("error").indented())
        .with(RenderCase::OperandRange, span("range").indented())
        .with(RenderCase::OperatorPrefix, span("operator-prefix").indented())
        .with(
            RenderCase::OperatorInfix,
            Template::wrap(" <span class=\"operator\">", "</span> "),
        )
        .with(RenderCase::OperatorIntersect, Template::literal(" "))
        .with(
            RenderCase::OperatorUnion,
            Template::wrap("<span class=\"operator-union\">", "</span> "),
        )
        .with(RenderCase::OperatorPostfix, span("operator-postfix"))
        .with(RenderCase::Unknown, span("unknown").indented());

    set.indent_unit = "&nbsp;".repeat(indent_width);
    set.newline = nl.to_string();
    set.prefix = "=".to_string();
    set.escape = TokenEscape::Html;
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_cover_every_case() {
        assert!(beautify_templates("  ", false).missing().is_empty());
        assert!(beautify_templates("\t", true).missing().is_empty());
        assert!(minify_templates().missing().is_empty());
        assert!(language_templates().missing().is_empty());
        assert!(html_templates(4).missing().is_empty());
    }

    #[test]
    fn test_comma_first_moves_the_break() {
        let plain = beautify_templates("  ", false);
        let leading = beautify_templates("  ", true);
        assert_eq!(plain.get(RenderCase::Argument).unwrap().to_string(), "{{token}}\n");
        assert_eq!(
            leading.get(RenderCase::Argument).unwrap().to_string(),
            "{{autoindent}}{{token}} "
        );
        assert!(leading.get(RenderCase::OperandRange).unwrap().line_break);
        assert!(!plain.get(RenderCase::OperandRange).unwrap().line_break);
    }
}
