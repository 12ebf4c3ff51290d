//! cellfmt-core - Field mappings, Smartsheet LET rewriting, settings and
//! the mode dispatch shared by front ends.

pub mod error;
pub mod format;
pub mod mapping;
pub mod settings;
pub mod smartsheet;

pub use error::{CoreError, Result};
pub use format::{FormatOptions, Mode, format_formula};
pub use mapping::{FieldMapping, load_mappings, parse_mapping_csv, parse_mapping_json};
pub use settings::load_settings;
pub use smartsheet::{Layout, SmartsheetRewriter};

pub use cellfmt_engine::emit::{BeautifyOptions, Indent};
