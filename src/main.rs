//! cellfmt - Spreadsheet formula beautifier, minifier and translator

mod cli;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use log::{LevelFilter, debug};
use std::io::Read;
use std::path::{Path, PathBuf};

use cellfmt_core::{SmartsheetRewriter, format_formula, load_mappings, load_settings};
use cli::Cli;

fn main() {
    let args = Cli::parse();
    logger::init(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<()> {
    let (settings_path, explicit) = match args.config.as_ref() {
        Some(path) => (Some(path.clone()), true),
        None => (user_settings_path(), false),
    };
    let (mut options, warnings) = load_settings(settings_path.as_deref(), explicit);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    args.apply(&mut options)?;
    debug!("options: {:?}", options);

    let mut formula = read_formula(args)?;
    if let Some(path) = args.mapping.as_deref() {
        let mappings =
            load_mappings(path).with_context(|| format!("Failed to load mapping {}", path.display()))?;
        formula = SmartsheetRewriter::new(&mappings)
            .eu(options.eu)
            .rewrite(&formula)?;
    }

    let out = format_formula(&formula, &options)?;
    println!("{}", out);
    Ok(())
}

fn read_formula(args: &Cli) -> Result<String> {
    if let Some(formula) = args.formula.as_ref() {
        return Ok(formula.clone());
    }
    match args.file.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map(|text| text.trim_end().to_string())
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read formula from stdin")?;
            Ok(text.trim_end().to_string())
        }
    }
}

fn user_settings_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellfmt")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("cellfmt.toml");
    Some(path)
}
