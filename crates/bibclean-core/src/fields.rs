//! Field classification
//!
//! Every field of an entry is either kept verbatim, dropped, or left for the
//! operator to decide. `ID` and `ENTRYTYPE` are structural and never pass
//! through here.

use std::collections::BTreeSet;

use lazy_static::lazy_static;

/// How a field is treated during cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldClass {
    /// Copied verbatim
    Reserved,
    /// Dropped with a notice
    Removed,
    /// Operator decides per occurrence
    Unclassified,
}

const DEFAULT_RESERVED: &[&str] = &[
    "title",
    "author",
    "booktitle",
    "year",
    "journal",
    "comment",
    "groups",
    "timestamp",
    "file",
    "howpublished",
];

const DEFAULT_REMOVED: &[&str] = &[
    "pages",
    "number",
    "volume",
    "organization",
    "date",
    "owner",
    "publisher",
    "journaltitle",
    "eprint",
    "eprintclass",
    "eprinttype",
    "institution",
];

lazy_static! {
    static ref DEFAULT_POLICY: FieldPolicy = FieldPolicy {
        reserved: DEFAULT_RESERVED.iter().map(|s| s.to_string()).collect(),
        removed: DEFAULT_REMOVED.iter().map(|s| s.to_string()).collect(),
    };
}

/// The reserved and removed field sets. Anything in neither is unclassified.
///
/// The two sets are kept disjoint: adding a field to one class takes it out
/// of the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPolicy {
    reserved: BTreeSet<String>,
    removed: BTreeSet<String>,
}

impl FieldPolicy {
    /// A policy with nothing classified; every field goes to the operator
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in policy
    pub fn builtin() -> Self {
        DEFAULT_POLICY.clone()
    }

    /// Classify a field name (case-insensitive)
    pub fn classify(&self, field: &str) -> FieldClass {
        let field = field.to_lowercase();
        if self.reserved.contains(&field) {
            FieldClass::Reserved
        } else if self.removed.contains(&field) {
            FieldClass::Removed
        } else {
            FieldClass::Unclassified
        }
    }

    pub fn reserve(&mut self, field: &str) {
        let field = field.to_lowercase();
        self.removed.remove(&field);
        self.reserved.insert(field);
    }

    pub fn remove(&mut self, field: &str) {
        let field = field.to_lowercase();
        self.reserved.remove(&field);
        self.removed.insert(field);
    }

    pub fn reserved(&self) -> impl Iterator<Item = &str> {
        self.reserved.iter().map(String::as_str)
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.removed.iter().map(String::as_str)
    }
}
