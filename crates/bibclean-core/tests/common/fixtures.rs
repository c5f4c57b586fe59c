//! Test fixture loading utilities

use std::collections::HashMap;
use std::path::PathBuf;

use bibclean_bibtex::{parse, BibTeXEntry, FieldValue};

/// Get the path to a fixture file
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a BibTeX fixture
#[allow(dead_code)]
pub fn load_bibtex_fixture(name: &str) -> String {
    load_fixture(&format!("bibtex/{}", name))
}

/// Parse cleaned output back into its entries and @String definitions
#[allow(dead_code)]
pub fn parse_output(text: &str) -> (Vec<BibTeXEntry>, HashMap<String, FieldValue>) {
    let result = parse(text).expect("cleaned output should parse");
    assert!(result.errors.is_empty(), "parse errors: {:?}", result.errors);
    (result.entries, result.strings)
}

/// Resolve a field of `entry` through the preamble definitions
#[allow(dead_code)]
pub fn resolve<'a>(
    entry: &'a BibTeXEntry,
    field: &str,
    strings: &'a HashMap<String, FieldValue>,
) -> Option<&'a str> {
    match entry.get(field)? {
        FieldValue::Literal(text) => Some(text.as_str()),
        value => {
            let name = value.as_reference()?.to_lowercase();
            strings.get(&name)?.as_literal()
        }
    }
}

/// Find an entry by citation key
#[allow(dead_code)]
pub fn find<'a>(entries: &'a [BibTeXEntry], cite_key: &str) -> &'a BibTeXEntry {
    entries
        .iter()
        .find(|e| e.cite_key == cite_key)
        .unwrap_or_else(|| panic!("missing entry {}", cite_key))
}
