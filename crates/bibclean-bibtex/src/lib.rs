//! BibTeX parsing and formatting
//!
//! This crate provides a BibTeX parser and writer that keeps `@string`
//! macro references symbolic, so that a file can be read, edited and written
//! back without expanding `booktitle = cvpr` into its full text.
//!
//! Features:
//! - Nom-based parser for robust BibTeX parsing
//! - Symbolic `@string` references and `#` concatenation
//! - Configurable writer (indent, entry ordering)

mod entry;
mod formatter;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField, FieldValue, ValuePart};
pub use formatter::{
    format_entries, format_entry, format_field_value, format_string_definition, BibTeXWriter,
};
pub use parser::{parse, parse_entry, BibTeXParseError, BibTeXParseResult, ParseError};
