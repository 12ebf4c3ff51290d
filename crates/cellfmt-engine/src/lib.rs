//! cellfmt_engine - Spreadsheet formula tokenizer, template renderer and emitters.

pub mod emit;
pub mod engine;

pub use emit::{Target, beautify, beautify_with, minify, to_html, to_target_language};
pub use engine::{FormulaError, Result, render, tokenize};

#[cfg(test)]
mod tests {
    use crate::emit::*;
    use crate::engine::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn shape(tokens: &TokenStream) -> Vec<(TokenType, Option<TokenSubtype>)> {
        tokens.iter().map(|t| (t.token_type(), t.subtype())).collect()
    }

    #[test]
    fn test_prefix_minus_then_infix_plus() {
        let tokens = tokenize("-A1+1", false).unwrap();
        let got: Vec<(TokenType, &str)> = tokens.iter().map(|t| (t.token_type(), t.value())).collect();
        assert_eq!(
            got,
            vec![
                (TokenType::OperatorPrefix, "-"),
                (TokenType::Operand, "A1"),
                (TokenType::OperatorInfix, "+"),
                (TokenType::Operand, "1"),
            ]
        );
    }

    #[test]
    fn test_error_literal_then_number() {
        let tokens = tokenize("=#N/A+1", false).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens.get(0).map(Token::value), Some("#N/A"));
        assert_eq!(tokens.get(0).and_then(Token::subtype), Some(TokenSubtype::Error));
        assert_eq!(tokens.get(2).and_then(Token::subtype), Some(TokenSubtype::Number));
    }

    #[test]
    fn test_us_and_eu_separators_give_same_shape() {
        let us = tokenize("=SUM(A1,B1)", false).unwrap();
        let eu = tokenize("=SUM(A1;B1)", true).unwrap();
        assert_eq!(shape(&us), shape(&eu));
        assert_eq!(us.get(2).map(Token::value), Some(","));
        assert_eq!(eu.get(2).map(Token::value), Some(";"));
    }

    #[test]
    fn test_beautify_then_minify_is_minify() {
        for formula in [
            "=IF(A1>5,SUM(B1:B5),0)",
            "=-(A1+B1)*2%",
            "=VLOOKUP(\"a\"\"b\",'My Sheet'!A:B,2,FALSE)",
            "=SUM((A1,B1))+A1:C3 B2:B4",
            "=INDEX({1,2;3,4},2,1)&#N/A",
        ] {
            let beautified = beautify(formula, 2, false).unwrap();
            assert_eq!(minify(&beautified, false).unwrap(), minify(formula, false).unwrap());
        }
    }

    #[test]
    fn test_unbalanced_close_is_fatal() {
        assert!(matches!(
            beautify("=SUM(1))", 4, false),
            Err(FormulaError::UnbalancedStructure { found: ')', .. })
        ));
    }

    #[test]
    fn test_custom_template_set_is_checked() {
        let mut set = presets::minify_templates();
        set.remove(RenderCase::Argument);
        let tokens = tokenize("=SUM(1,2)", false).unwrap();
        assert_eq!(
            render(&tokens, &set, &mut DefaultStrategy),
            Err(FormulaError::MissingTemplate(RenderCase::Argument))
        );
    }

    fn operand() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-H][1-9]",
            "[1-9][0-9]{0,2}",
            "\"[a-z ]{0,4}\"",
            Just("TRUE".to_string()),
            Just("#REF!".to_string()),
        ]
    }

    fn expression() -> impl Strategy<Value = String> {
        operand().prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                (inner.clone(), prop_oneof![Just("+"), Just("*"), Just("&"), Just("<>")], inner.clone())
                    .prop_map(|(a, op, b)| format!("{}{}{}", a, op, b)),
                inner.clone().prop_map(|e| format!("-({})", e)),
                prop::collection::vec(inner, 1..4).prop_map(|args| format!("SUM({})", args.join(","))),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_generated_formulas_are_balanced(body in expression()) {
            let tokens = tokenize(&format!("={}", body), false).unwrap();
            prop_assert!(is_balanced(&tokens));
        }

        #[test]
        fn prop_minify_is_idempotent(body in expression()) {
            let once = minify(&format!("={}", body), false).unwrap();
            prop_assert_eq!(minify(&once, false).unwrap(), once.clone());
            let pretty = beautify(&once, 3, false).unwrap();
            prop_assert_eq!(minify(&pretty, false).unwrap(), once);
        }
    }
}
