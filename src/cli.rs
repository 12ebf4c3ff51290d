//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

use cellfmt_core::{CoreError, FormatOptions, Indent, Mode};

#[derive(Debug, Parser)]
#[command(
    name = "cellfmt",
    version,
    about = "Beautify, minify and translate spreadsheet formulas"
)]
pub struct Cli {
    /// Formula text. Read from --file or stdin when absent.
    pub formula: Option<String>,

    /// Output mode: beautify, minify, html, javascript, typescript or tokens
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Indent width in spaces
    #[arg(short, long)]
    pub indent: Option<usize>,

    /// Indent with tabs
    #[arg(long)]
    pub tabs: bool,

    /// Beautify with separators leading each continuation line
    #[arg(long)]
    pub comma_first: bool,

    /// Semicolon list separator and decimal comma
    #[arg(long)]
    pub eu: bool,

    /// Read the formula from a file ("-" for stdin)
    #[arg(short, long, conflicts_with = "formula")]
    pub file: Option<PathBuf>,

    /// CSV or JSON field mapping; rewrites Smartsheet @row references into LET
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Settings file (default: cellfmt.toml in the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line flags over settings loaded from file.
    pub fn apply(&self, options: &mut FormatOptions) -> Result<(), CoreError> {
        if let Some(mode) = self.mode.as_deref() {
            options.mode = mode.parse::<Mode>()?;
        }
        if let Some(width) = self.indent {
            options.beautify.indent = Indent::Spaces(width);
        }
        if self.tabs {
            options.beautify.indent = Indent::Tabs;
        }
        if self.comma_first {
            options.beautify.comma_first = true;
        }
        if self.eu {
            options.eu = true;
        }
        Ok(())
    }
}
