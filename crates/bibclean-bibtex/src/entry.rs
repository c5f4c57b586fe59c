//! BibTeX entry data structures

use std::fmt;

/// BibTeX entry type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Software,
    Dataset,
    /// Any other type, stored lower-case so it is written back unchanged
    Other(String),
}

impl BibTeXEntryType {
    /// Parse an entry type from a string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" => Self::Online,
            "software" => Self::Software,
            "dataset" => Self::Dataset,
            other => Self::Other(other.to_string()),
        }
    }

    /// Convert entry type to canonical string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Online => "online",
            Self::Software => "software",
            Self::Dataset => "dataset",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for BibTeXEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of a `#`-concatenated field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePart {
    /// Braced, quoted or numeric text
    Literal(String),
    /// Bare name of an `@string` macro, left unresolved
    Reference(String),
}

/// A field value as it appeared in the source
///
/// Values that mention at least one `@string` macro are kept as an
/// [`FieldValue::Expression`] so the macro survives a parse/write cycle.
/// Everything else collapses into a [`FieldValue::Literal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Literal(String),
    Expression(Vec<ValuePart>),
}

impl FieldValue {
    /// A value made of a single macro reference, e.g. `booktitle = cvpr`
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Expression(vec![ValuePart::Reference(name.into())])
    }

    /// Build a value from parsed parts, collapsing pure-literal concatenations
    pub fn from_parts(parts: Vec<ValuePart>) -> Self {
        if parts.iter().any(|p| matches!(p, ValuePart::Reference(_))) {
            return Self::Expression(parts);
        }
        let text = parts
            .into_iter()
            .map(|p| match p {
                ValuePart::Literal(s) | ValuePart::Reference(s) => s,
            })
            .collect();
        Self::Literal(text)
    }

    /// The text of a literal value, `None` for expressions
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Expression(_) => None,
        }
    }

    /// The macro name when the value is exactly one reference
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Expression(parts) => match parts.as_slice() {
                [ValuePart::Reference(name)] => Some(name),
                _ => None,
            },
            Self::Literal(_) => None,
        }
    }

    /// Text used for comparisons: literal text, or the parts joined with
    /// macro names in place of their expansion
    pub fn plain_text(&self) -> String {
        match self {
            Self::Literal(s) => s.clone(),
            Self::Expression(parts) => parts
                .iter()
                .map(|p| match p {
                    ValuePart::Literal(s) | ValuePart::Reference(s) => s.as_str(),
                })
                .collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: FieldValue,
}

/// A parsed BibTeX entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    /// Create a new BibTeX entry
    pub fn new(cite_key: impl Into<String>, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing the value in place if the key already exists.
    ///
    /// Keys are stored lower-case.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => field.value = value,
            None => self.fields.push(BibTeXField { key, value }),
        }
    }

    /// Get a field value by key (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        let key_lower = key.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.key == key_lower)
            .map(|f| &f.value)
    }

    /// Get a literal field value by key, `None` if missing or symbolic
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_literal)
    }

    /// Whether the entry has a field, literal or symbolic
    pub fn has_field(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a field, returning its value
    pub fn remove_field(&mut self, key: &str) -> Option<FieldValue> {
        let key_lower = key.to_lowercase();
        let pos = self.fields.iter().position(|f| f.key == key_lower)?;
        Some(self.fields.remove(pos).value)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }

    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }

    pub fn booktitle(&self) -> Option<&str> {
        self.get_field("booktitle")
    }

    pub fn journal(&self) -> Option<&str> {
        self.get_field("journal")
    }
}
