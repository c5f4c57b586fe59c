//! Entry normalization
//!
//! Builds a fresh entry for every input entry: migrates legacy BibLaTeX
//! fields, applies the field policy, rewrites venues into `@string`
//! references and drops duplicates by citation key or title.

use std::collections::HashSet;
use std::fmt;

use bibclean_bibtex::{BibTeXEntry, BibTeXEntryType, FieldValue};
use tracing::{debug, info, warn};

use crate::config::is_valid_token;
use crate::error::{CleanError, Result};
use crate::fields::{FieldClass, FieldPolicy};
use crate::operator::{DuplicateCollision, FieldDecision, Operator};
use crate::venues::{match_conference, match_journal, VenueTable};

const ARXIV_PREFIX: &str = "arXiv preprint ";
const ARXIV_ID_PREFIX: &str = "arXiv:";

/// Counters for one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub entries_read: usize,
    pub entries_kept: usize,
    pub duplicates_skipped: usize,
    pub fields_removed: usize,
    pub fields_reserved_by_operator: usize,
    pub fields_deleted_by_operator: usize,
    pub venues_matched: usize,
    pub venues_from_operator: usize,
    pub venues_unchanged: usize,
}

impl fmt::Display for NormalizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries read, {} kept, {} duplicates skipped; fields: {} removed, {} kept and {} deleted by operator; venues: {} matched, {} from operator, {} unchanged",
            self.entries_read,
            self.entries_kept,
            self.duplicates_skipped,
            self.fields_removed,
            self.fields_reserved_by_operator,
            self.fields_deleted_by_operator,
            self.venues_matched,
            self.venues_from_operator,
            self.venues_unchanged,
        )
    }
}

/// Output of a normalization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBibliography {
    /// Accepted entries in input order
    pub entries: Vec<BibTeXEntry>,
    pub report: NormalizationReport,
}

/// Outcome of venue canonicalization for one entry
enum VenueOutcome {
    Matched,
    FromOperator,
    Unchanged,
    Skipped,
}

/// Cleans a list of entries against a venue table and a field policy
pub struct Normalizer<'a> {
    venues: &'a VenueTable,
    fields: &'a FieldPolicy,
}

impl<'a> Normalizer<'a> {
    pub fn new(venues: &'a VenueTable, fields: &'a FieldPolicy) -> Self {
        Self { venues, fields }
    }

    /// Normalize `entries`, escalating ambiguous cases to `operator`.
    ///
    /// Input entries are never modified. The first entry with a given
    /// citation key or title (both compared case-insensitively) wins; later
    /// ones are acknowledged by the operator and dropped.
    pub fn normalize(
        &self,
        entries: &[BibTeXEntry],
        operator: &mut dyn Operator,
    ) -> Result<NormalizedBibliography> {
        let mut report = NormalizationReport {
            entries_read: entries.len(),
            ..NormalizationReport::default()
        };
        let mut kept = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut seen_titles: HashSet<String> = HashSet::new();

        for entry in entries {
            let cleaned = self.clean_entry(entry, operator, &mut report)?;

            let folded_id = cleaned.cite_key.to_lowercase();
            let folded_title = cleaned.get("title").map(|t| t.plain_text().to_lowercase());

            let collision = DuplicateCollision {
                id: seen_ids.contains(&folded_id),
                title: folded_title
                    .as_ref()
                    .is_some_and(|t| seen_titles.contains(t)),
            };
            if collision.any() {
                warn!("Skipping duplicate {} (matched {})", cleaned.cite_key, collision);
                operator
                    .acknowledge_duplicate(&cleaned, collision)
                    .map_err(CleanError::Operator)?;
                report.duplicates_skipped += 1;
                continue;
            }

            seen_ids.insert(folded_id);
            if let Some(title) = folded_title {
                seen_titles.insert(title);
            }
            kept.push(cleaned);
        }

        report.entries_kept = kept.len();
        Ok(NormalizedBibliography {
            entries: kept,
            report,
        })
    }

    fn clean_entry(
        &self,
        entry: &BibTeXEntry,
        operator: &mut dyn Operator,
        report: &mut NormalizationReport,
    ) -> Result<BibTeXEntry> {
        let mut cleaned = BibTeXEntry::new(entry.cite_key.clone(), entry.entry_type.clone());
        migrate_fields(entry, &mut cleaned);

        for field in &entry.fields {
            match self.fields.classify(&field.key) {
                FieldClass::Reserved => cleaned.set_field(field.key.clone(), field.value.clone()),
                FieldClass::Removed => {
                    info!("Removed `{}` from {}", field.key, entry.cite_key);
                    report.fields_removed += 1;
                }
                FieldClass::Unclassified => {
                    let decision = operator
                        .classify_field(&entry.cite_key, &field.key)
                        .map_err(CleanError::Operator)?;
                    match decision {
                        FieldDecision::Reserve => {
                            debug!("Operator kept `{}` in {}", field.key, entry.cite_key);
                            cleaned.set_field(field.key.clone(), field.value.clone());
                            report.fields_reserved_by_operator += 1;
                        }
                        FieldDecision::Delete => {
                            debug!("Operator deleted `{}` from {}", field.key, entry.cite_key);
                            report.fields_deleted_by_operator += 1;
                        }
                    }
                }
            }
        }

        let entry_type = cleaned.entry_type.clone();
        let outcome = match entry_type {
            BibTeXEntryType::InProceedings => self.canonicalize_booktitle(&mut cleaned, operator)?,
            BibTeXEntryType::Article => self.canonicalize_journal(&mut cleaned, operator)?,
            _ => VenueOutcome::Skipped,
        };
        match outcome {
            VenueOutcome::Matched => report.venues_matched += 1,
            VenueOutcome::FromOperator => report.venues_from_operator += 1,
            VenueOutcome::Unchanged => report.venues_unchanged += 1,
            VenueOutcome::Skipped => {}
        }

        Ok(cleaned)
    }

    fn canonicalize_booktitle(
        &self,
        entry: &mut BibTeXEntry,
        operator: &mut dyn Operator,
    ) -> Result<VenueOutcome> {
        // Already symbolic, or missing
        let Some(booktitle) = entry.booktitle().map(str::to_string) else {
            return Ok(VenueOutcome::Skipped);
        };

        if let Some(token) = match_conference(&booktitle) {
            debug!("{}: booktitle {:?} -> {}", entry.cite_key, booktitle, token);
            self.set_reference(entry, "booktitle", token);
            return Ok(VenueOutcome::Matched);
        }

        let answer = operator
            .conference_abbreviation(&entry.cite_key, &booktitle)
            .map_err(CleanError::Operator)?;
        Ok(self.apply_answer(entry, "booktitle", answer))
    }

    fn canonicalize_journal(
        &self,
        entry: &mut BibTeXEntry,
        operator: &mut dyn Operator,
    ) -> Result<VenueOutcome> {
        if let Some(stripped) = entry
            .journal()
            .and_then(|j| j.strip_prefix(ARXIV_PREFIX))
            .map(str::to_string)
        {
            entry.set_field("journal", stripped);
        }

        let Some(journal) = entry.journal().map(str::to_string) else {
            return Ok(VenueOutcome::Skipped);
        };
        if journal.starts_with(ARXIV_ID_PREFIX) {
            return Ok(VenueOutcome::Skipped);
        }

        if let Some(token) = match_journal(&journal) {
            debug!("{}: journal {:?} -> {}", entry.cite_key, journal, token);
            self.set_reference(entry, "journal", token);
            return Ok(VenueOutcome::Matched);
        }

        let answer = operator
            .journal_abbreviation(&entry.cite_key, &journal)
            .map_err(CleanError::Operator)?;
        Ok(self.apply_answer(entry, "journal", answer))
    }

    fn apply_answer(
        &self,
        entry: &mut BibTeXEntry,
        field: &str,
        answer: Option<String>,
    ) -> VenueOutcome {
        match answer.filter(|token| !token.is_empty()) {
            Some(token) => {
                if !is_valid_token(&token) {
                    warn!(
                        "{}: `{}` is not a valid @String name; the output will not parse back",
                        entry.cite_key, token
                    );
                }
                self.set_reference(entry, field, &token);
                VenueOutcome::FromOperator
            }
            None => VenueOutcome::Unchanged,
        }
    }

    fn set_reference(&self, entry: &mut BibTeXEntry, field: &str, token: &str) {
        if !self.venues.contains_token(token) {
            warn!(
                "{}: `{}` has no @String definition in the preamble",
                entry.cite_key, token
            );
        }
        entry.set_field(field, FieldValue::reference(token));
    }
}

/// Carry BibLaTeX `date` / `journaltitle` over to their BibTeX names
fn migrate_fields(source: &BibTeXEntry, target: &mut BibTeXEntry) {
    if let Some(date) = source.get("date") {
        if !source.has_field("year") {
            target.set_field("year", date.clone());
        }
    }

    if let Some(journaltitle) = source.get("journaltitle") {
        match source.entry_type {
            BibTeXEntryType::InProceedings => target.set_field("booktitle", journaltitle.clone()),
            BibTeXEntryType::Article => target.set_field("journal", journaltitle.clone()),
            _ => {}
        }
    }
}
