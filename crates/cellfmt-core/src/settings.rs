//! User settings (`cellfmt.toml`).
//!
//! Problems with the file never stop formatting: they are returned as
//! warnings and the affected values keep their defaults.

use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use cellfmt_engine::emit::Indent;
use cellfmt_engine::engine::{RenderCase, Template};

use crate::format::{FormatOptions, Mode};

const MAX_SETTINGS_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_INDENT_WIDTH: usize = 16;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    mode: Option<String>,
    indent: Option<usize>,
    tabs: Option<bool>,
    comma_first: Option<bool>,
    eu: Option<bool>,
    templates: Option<BTreeMap<String, String>>,
}

/// Read settings from `path` into `FormatOptions`.
///
/// `explicit` marks a path the user asked for; a missing explicit file is a
/// warning, a missing default file is not.
pub fn load_settings(path: Option<&Path>, explicit: bool) -> (FormatOptions, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut options = FormatOptions::default();

    let Some(path) = path else {
        return (options, warnings);
    };
    if !path.exists() {
        if explicit {
            warnings.push(format!("Settings file not found: {}", path.display()));
        }
        return (options, warnings);
    }

    let content = match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_SETTINGS_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SETTINGS_FILE_BYTES
            ));
            return (options, warnings);
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (options, warnings);
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read metadata for {}: {}", path.display(), err));
            return (options, warnings);
        }
    };

    match toml::from_str::<SettingsFile>(&content) {
        Ok(file) => apply(&file, &mut options, &mut warnings),
        Err(err) => warnings.push(format!("Failed to parse {}: {}", path.display(), err)),
    }
    debug!("settings from {}: {:?}", path.display(), options);
    (options, warnings)
}

fn apply(file: &SettingsFile, options: &mut FormatOptions, warnings: &mut Vec<String>) {
    if let Some(mode) = file.mode.as_deref() {
        match mode.parse::<Mode>() {
            Ok(mode) => options.mode = mode,
            Err(err) => warnings.push(err.to_string()),
        }
    }

    if let Some(width) = file.indent {
        if width > MAX_INDENT_WIDTH {
            warnings.push(format!(
                "Indent width {} is larger than {}; using {}",
                width, MAX_INDENT_WIDTH, MAX_INDENT_WIDTH
            ));
        }
        options.beautify.indent = Indent::Spaces(width.min(MAX_INDENT_WIDTH));
    }
    if file.tabs == Some(true) {
        options.beautify.indent = Indent::Tabs;
    }
    if let Some(comma_first) = file.comma_first {
        options.beautify.comma_first = comma_first;
    }
    if let Some(eu) = file.eu {
        options.eu = eu;
    }

    for (name, source) in file.templates.iter().flatten() {
        let Some(case) = RenderCase::from_name(name.trim()) else {
            warnings.push(format!("Unknown template '{}'", name));
            continue;
        };
        match Template::parse(source) {
            Ok(template) => {
                options.templates.insert(case, template);
            }
            Err(err) => warnings.push(format!("Template '{}': {}", name, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_settings(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cellfmt-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_full_settings() {
        let path = write_settings(
            "full.toml",
            r#"
mode = "html"
indent = 2
comma_first = true
eu = true

[templates]
operand_number = "{{autoindent}}#{{token}}"
"#,
        );
        let (options, warnings) = load_settings(Some(&path), true);
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(options.mode, Mode::Html);
        assert_eq!(options.beautify.indent, Indent::Spaces(2));
        assert!(options.beautify.comma_first);
        assert!(options.eu);
        assert_eq!(
            options.templates.get(&RenderCase::OperandNumber).map(|t| t.to_string()),
            Some("{{autoindent}}#{{token}}".to_string())
        );
    }

    #[test]
    fn test_problems_become_warnings() {
        let path = write_settings(
            "bad.toml",
            r#"
mode = "pretty"
indent = 99
tabs = true

[templates]
nonsense = "{{token}}"
argument = "{{token}}{{autoindent}}"
"#,
        );
        let (options, warnings) = load_settings(Some(&path), true);
        assert_eq!(warnings.len(), 4, "{:?}", warnings);
        assert_eq!(options.mode, Mode::Beautify);
        assert_eq!(options.beautify.indent, Indent::Tabs);
        assert!(options.templates.is_empty());
    }

    #[test]
    fn test_unknown_key_rejects_file() {
        let path = write_settings("unknown.toml", "mode = \"minify\"\ncolour = true\n");
        let (options, warnings) = load_settings(Some(&path), true);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
        assert_eq!(options, FormatOptions::default());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("cellfmt-settings-does-not-exist.toml");
        assert_eq!(load_settings(Some(&path), false).1.len(), 0);
        assert_eq!(load_settings(Some(&path), true).1.len(), 1);
        assert!(load_settings(None, false).1.is_empty());
    }
}
