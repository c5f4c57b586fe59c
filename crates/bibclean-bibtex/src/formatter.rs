//! BibTeX formatting module
//!
//! Converts BibTeXEntry structures back to BibTeX string format.

use super::entry::{BibTeXEntry, FieldValue, ValuePart};

/// Writer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXWriter {
    /// Prefix written before every field line
    pub indent: String,
    /// Order entries by citation key (stable) instead of input order
    pub sort_entries: bool,
}

impl Default for BibTeXWriter {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            sort_entries: true,
        }
    }
}

impl BibTeXWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format a single entry.
    ///
    /// Fields are written in alphabetical order, without a trailing comma:
    ///
    /// ```text
    /// @inproceedings{foo2020,
    ///     booktitle = cvprw,
    ///     title = {X}
    /// }
    /// ```
    pub fn write_entry(&self, entry: &BibTeXEntry) -> String {
        let mut result = String::new();

        // Entry type and cite key
        result.push('@');
        result.push_str(entry.entry_type.as_str());
        result.push('{');
        result.push_str(&entry.cite_key);

        let mut fields: Vec<_> = entry.fields.iter().collect();
        fields.sort_by(|a, b| a.key.cmp(&b.key));

        for field in fields {
            result.push_str(",\n");
            result.push_str(&self.indent);
            result.push_str(&field.key);
            result.push_str(" = ");
            result.push_str(&format_field_value(&field.value));
        }

        result.push_str("\n}\n");
        result
    }

    /// Format a list of entries, separated by blank lines
    pub fn write_entries(&self, entries: &[BibTeXEntry]) -> String {
        let mut ordered: Vec<&BibTeXEntry> = entries.iter().collect();
        if self.sort_entries {
            ordered.sort_by(|a, b| a.cite_key.cmp(&b.cite_key));
        }

        ordered
            .into_iter()
            .map(|entry| self.write_entry(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format a single BibTeX entry with the default writer
pub fn format_entry(entry: &BibTeXEntry) -> String {
    BibTeXWriter::default().write_entry(entry)
}

/// Format multiple entries with the default writer
pub fn format_entries(entries: &[BibTeXEntry]) -> String {
    BibTeXWriter::default().write_entries(entries)
}

/// Format a field value: literals in braces (bare if numeric), macro
/// references bare, concatenations joined with ` # `
pub fn format_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Literal(text) => format_literal(text),
        FieldValue::Expression(parts) => parts
            .iter()
            .map(|part| match part {
                ValuePart::Literal(text) => format_literal(text),
                ValuePart::Reference(name) => name.clone(),
            })
            .collect::<Vec<_>>()
            .join(" # "),
    }
}

fn format_literal(value: &str) -> String {
    // Check if the value is purely numeric
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    // Braces preserve LaTeX commands and case protection
    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}

/// Format a @String definition with the name padded to `width` columns,
/// e.g. `@String(CVPRW = {CVPR Workshops})`
pub fn format_string_definition(name: &str, value: &str, width: usize) -> String {
    format!("@String({name:<width$} = {{{value}}})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::BibTeXEntryType;

    #[test]
    fn test_format_simple_entry() {
        let mut entry = BibTeXEntry::new("Smith2024", BibTeXEntryType::Article);
        entry.set_field("title", "A Great Paper");
        entry.set_field("author", "John Smith");
        entry.set_field("year", "2024");

        let formatted = format_entry(&entry);
        assert_eq!(
            formatted,
            "@article{Smith2024,\n    author = {John Smith},\n    title = {A Great Paper},\n    year = 2024\n}\n"
        );
    }

    #[test]
    fn test_format_reference_is_bare() {
        let mut entry = BibTeXEntry::new("foo2020", BibTeXEntryType::InProceedings);
        entry.set_field("booktitle", FieldValue::reference("cvprw"));

        let formatted = format_entry(&entry);
        assert!(formatted.contains("    booktitle = cvprw\n"));
    }

    #[test]
    fn test_format_concatenation() {
        let value = FieldValue::Expression(vec![
            ValuePart::Reference("jan".into()),
            ValuePart::Literal("~1st".into()),
        ]);
        assert_eq!(format_field_value(&value), "jan # {~1st}");
    }

    #[test]
    fn test_custom_indent() {
        let writer = BibTeXWriter {
            indent: "\t".to_string(),
            sort_entries: false,
        };
        let mut entry = BibTeXEntry::new("Test", BibTeXEntryType::Misc);
        entry.set_field("note", "x");
        assert_eq!(writer.write_entry(&entry), "@misc{Test,\n\tnote = {x}\n}\n");
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let entries = vec![
            BibTeXEntry::new("zeta", BibTeXEntryType::Misc),
            BibTeXEntry::new("alpha", BibTeXEntryType::Misc),
        ];
        let sorted = format_entries(&entries);
        assert_eq!(sorted, "@misc{alpha\n}\n\n@misc{zeta\n}\n");

        let writer = BibTeXWriter {
            sort_entries: false,
            ..BibTeXWriter::default()
        };
        assert!(writer.write_entries(&entries).starts_with("@misc{zeta"));
    }

    #[test]
    fn test_format_string_definition() {
        assert_eq!(
            format_string_definition("PAMI", "IEEE TPAMI", 6),
            "@String(PAMI   = {IEEE TPAMI})"
        );
        assert_eq!(
            format_string_definition("ICASSP", "ICASSP", 6),
            "@String(ICASSP = {ICASSP})"
        );
    }
}
