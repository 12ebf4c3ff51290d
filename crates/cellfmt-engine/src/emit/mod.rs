//! Ready-made output styles built on [`render`](crate::engine::render).
//!
//! Each emitter tokenizes the formula, picks a template set from
//! [`presets`] and renders it. `eu` selects `;` as the list separator.

mod lang;
pub mod presets;

pub use lang::{LanguageStrategy, Lexicon, MAX_EXPANDED_RANGE_CELLS, Target, quote_string};

use crate::engine::{DefaultStrategy, RenderStrategy, Result, TemplateSet, render, tokenize};

/// Indentation unit for beautified output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Indent {
    Spaces(usize),
    Tabs,
}

impl Indent {
    pub fn unit(self) -> String {
        match self {
            Indent::Spaces(width) => " ".repeat(width),
            Indent::Tabs => "\t".to_string(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(4)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BeautifyOptions {
    pub indent: Indent,
    /// Start continuation lines with the separator instead of ending lines with it.
    pub comma_first: bool,
}

impl BeautifyOptions {
    pub fn templates(&self) -> TemplateSet {
        presets::beautify_templates(&self.indent.unit(), self.comma_first)
    }
}

/// Tokenize and render with any template set and strategy.
pub fn render_formula<S>(formula: &str, templates: &TemplateSet, strategy: &mut S, eu: bool) -> Result<String>
where
    S: RenderStrategy + ?Sized,
{
    let tokens = tokenize(formula, eu)?;
    render(&tokens, templates, strategy)
}

pub fn beautify(formula: &str, indent_width: usize, eu: bool) -> Result<String> {
    let options = BeautifyOptions {
        indent: Indent::Spaces(indent_width),
        comma_first: false,
    };
    beautify_with(formula, &options, eu)
}

pub fn beautify_with(formula: &str, options: &BeautifyOptions, eu: bool) -> Result<String> {
    render_formula(formula, &options.templates(), &mut DefaultStrategy, eu)
}

pub fn minify(formula: &str, eu: bool) -> Result<String> {
    render_formula(formula, &presets::minify_templates(), &mut DefaultStrategy, eu)
}

pub fn to_html(formula: &str, indent_width: usize, eu: bool) -> Result<String> {
    render_formula(formula, &presets::html_templates(indent_width), &mut DefaultStrategy, eu)
}

/// Translate a formula into an expression in `target`.
pub fn to_target_language(formula: &str, target: Target, eu: bool) -> Result<String> {
    let mut strategy = LanguageStrategy::new(target, eu);
    render_formula(formula, &presets::language_templates(), &mut strategy, eu)
}
