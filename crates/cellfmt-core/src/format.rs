//! Output modes and the one-call formatter used by the command line.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use cellfmt_engine::emit::{BeautifyOptions, Indent, Target, presets, render_formula, to_target_language};
use cellfmt_engine::engine::{DefaultStrategy, RenderCase, Template, TemplateSet, tokenize};

use crate::error::{CoreError, Result};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Beautify,
    Minify,
    Html,
    JavaScript,
    TypeScript,
    /// The token stream as JSON.
    Tokens,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Beautify,
        Mode::Minify,
        Mode::Html,
        Mode::JavaScript,
        Mode::TypeScript,
        Mode::Tokens,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Beautify => "beautify",
            Mode::Minify => "minify",
            Mode::Html => "html",
            Mode::JavaScript => "javascript",
            Mode::TypeScript => "typescript",
            Mode::Tokens => "tokens",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        match wanted.to_ascii_lowercase().as_str() {
            "js" => return Ok(Mode::JavaScript),
            "ts" => return Ok(Mode::TypeScript),
            _ => {}
        }
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

/// Everything that decides how a formula is printed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub mode: Mode,
    pub beautify: BeautifyOptions,
    /// Semicolon list separator and decimal comma.
    pub eu: bool,
    /// Per-case replacements for the beautify and HTML template sets.
    pub templates: BTreeMap<RenderCase, Template>,
}

impl FormatOptions {
    fn indent_width(&self) -> usize {
        match self.beautify.indent {
            Indent::Spaces(width) => width,
            Indent::Tabs => 1,
        }
    }

    fn with_overrides(&self, mut set: TemplateSet) -> TemplateSet {
        for (case, template) in &self.templates {
            set.set(*case, template.clone());
        }
        set
    }
}

/// Format one formula in the requested mode.
pub fn format_formula(formula: &str, options: &FormatOptions) -> Result<String> {
    let eu = options.eu;
    let out = match options.mode {
        Mode::Beautify => {
            let set = options.with_overrides(options.beautify.templates());
            render_formula(formula, &set, &mut DefaultStrategy, eu)?
        }
        Mode::Minify => render_formula(formula, &presets::minify_templates(), &mut DefaultStrategy, eu)?,
        Mode::Html => {
            let set = options.with_overrides(presets::html_templates(options.indent_width()));
            render_formula(formula, &set, &mut DefaultStrategy, eu)?
        }
        Mode::JavaScript => to_target_language(formula, Target::JavaScript, eu)?,
        Mode::TypeScript => to_target_language(formula, Target::TypeScript, eu)?,
        Mode::Tokens => serde_json::to_string_pretty(&tokenize(formula, eu)?)?,
    };
    Ok(out)
}
