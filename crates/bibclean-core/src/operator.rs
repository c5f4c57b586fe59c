//! Operator decisions
//!
//! The normalizer never guesses. Unknown fields, unrecognized venues and
//! duplicates are escalated through the [`Operator`] trait, which is backed
//! by the terminal in the CLI and by canned answers in tests.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use bibclean_bibtex::{format_entry, BibTeXEntry};

use crate::venues::{VenueKind, VenueTable};

/// What to do with an unclassified field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDecision {
    Reserve,
    Delete,
}

impl FieldDecision {
    /// `r`/`R` reserves, anything else deletes
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("r") {
            FieldDecision::Reserve
        } else {
            FieldDecision::Delete
        }
    }
}

/// Which keys of a duplicate entry were already seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DuplicateCollision {
    pub id: bool,
    pub title: bool,
}

impl DuplicateCollision {
    pub fn any(&self) -> bool {
        self.id || self.title
    }
}

impl fmt::Display for DuplicateCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.id, self.title) {
            (true, true) => f.write_str("ID and title"),
            (true, false) => f.write_str("ID"),
            (false, true) => f.write_str("title"),
            (false, false) => f.write_str("nothing"),
        }
    }
}

/// Source of decisions for ambiguous cases.
///
/// Abbreviation answers of `None` (or an empty string) leave the venue
/// unchanged.
pub trait Operator {
    /// Keep or delete a field that is neither reserved nor removed
    fn classify_field(&mut self, cite_key: &str, field: &str) -> io::Result<FieldDecision>;

    /// Abbreviation token for an unrecognized `booktitle`
    fn conference_abbreviation(
        &mut self,
        cite_key: &str,
        booktitle: &str,
    ) -> io::Result<Option<String>>;

    /// Abbreviation token for an unrecognized `journal`
    fn journal_abbreviation(&mut self, cite_key: &str, journal: &str)
        -> io::Result<Option<String>>;

    /// Acknowledge that `entry` is a duplicate and will be dropped
    fn acknowledge_duplicate(
        &mut self,
        entry: &BibTeXEntry,
        collision: DuplicateCollision,
    ) -> io::Result<()>;
}

fn non_empty(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Line-based prompts on a reader/writer pair, normally stdin/stdout
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
    conference_hint: Option<String>,
    journal_hint: Option<String>,
}

impl ConsoleOperator<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            conference_hint: None,
            journal_hint: None,
        }
    }

    /// List the known tokens of `venues` under each abbreviation prompt
    pub fn with_venue_hints(mut self, venues: &VenueTable) -> Self {
        self.conference_hint = Some(token_hint(venues, VenueKind::Conference));
        self.journal_hint = Some(token_hint(venues, VenueKind::Journal));
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a prompt and read one line. End of input counts as an empty answer.
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_abbreviation(
        &mut self,
        kind: VenueKind,
        cite_key: &str,
        venue: &str,
    ) -> io::Result<Option<String>> {
        let hint = match kind {
            VenueKind::Conference => self.conference_hint.clone(),
            VenueKind::Journal => self.journal_hint.clone(),
        };
        let mut prompt = format!("Unrecognized {kind} in {cite_key}: {venue}\n");
        if let Some(hint) = hint {
            prompt.push_str(&format!("  known: {hint}\n"));
        }
        prompt.push_str("> Abbreviation (Enter leaves it unchanged): ");
        self.ask(&prompt).map(non_empty)
    }
}

fn token_hint(venues: &VenueTable, kind: VenueKind) -> String {
    venues
        .of_kind(kind)
        .map(|v| v.token.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn classify_field(&mut self, cite_key: &str, field: &str) -> io::Result<FieldDecision> {
        let prompt = format!(
            "Unrecognized field `{field}` in {cite_key}\n> R keeps it, Enter deletes it: "
        );
        self.ask(&prompt).map(|a| FieldDecision::from_answer(&a))
    }

    fn conference_abbreviation(
        &mut self,
        cite_key: &str,
        booktitle: &str,
    ) -> io::Result<Option<String>> {
        self.ask_abbreviation(VenueKind::Conference, cite_key, booktitle)
    }

    fn journal_abbreviation(
        &mut self,
        cite_key: &str,
        journal: &str,
    ) -> io::Result<Option<String>> {
        self.ask_abbreviation(VenueKind::Journal, cite_key, journal)
    }

    fn acknowledge_duplicate(
        &mut self,
        entry: &BibTeXEntry,
        collision: DuplicateCollision,
    ) -> io::Result<()> {
        let prompt = format!(
            "Duplicate entry (ID seen: {}, title seen: {}):\n{}> Enter to continue; this entry will be skipped: ",
            collision.id,
            collision.title,
            format_entry(entry)
        );
        self.ask(&prompt).map(|_| ())
    }
}

/// A prompt received by [`ScriptedOperator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Field { cite_key: String, field: String },
    Conference { cite_key: String, booktitle: String },
    Journal { cite_key: String, journal: String },
    Duplicate { cite_key: String, collision: DuplicateCollision },
}

/// Canned answers, consumed in order by field and abbreviation prompts.
///
/// Once the script runs out every prompt gets the empty (default) answer.
/// Duplicate acknowledgements do not consume answers. Every prompt is
/// recorded in [`ScriptedOperator::prompts`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub prompts: Vec<Prompt>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// An operator that always gives the default answer
    pub fn silent() -> Self {
        Self::default()
    }

    fn next_answer(&mut self) -> String {
        self.answers.pop_front().unwrap_or_default()
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    fn classify_field(&mut self, cite_key: &str, field: &str) -> io::Result<FieldDecision> {
        self.prompts.push(Prompt::Field {
            cite_key: cite_key.to_string(),
            field: field.to_string(),
        });
        Ok(FieldDecision::from_answer(&self.next_answer()))
    }

    fn conference_abbreviation(
        &mut self,
        cite_key: &str,
        booktitle: &str,
    ) -> io::Result<Option<String>> {
        self.prompts.push(Prompt::Conference {
            cite_key: cite_key.to_string(),
            booktitle: booktitle.to_string(),
        });
        Ok(non_empty(self.next_answer()))
    }

    fn journal_abbreviation(
        &mut self,
        cite_key: &str,
        journal: &str,
    ) -> io::Result<Option<String>> {
        self.prompts.push(Prompt::Journal {
            cite_key: cite_key.to_string(),
            journal: journal.to_string(),
        });
        Ok(non_empty(self.next_answer()))
    }

    fn acknowledge_duplicate(
        &mut self,
        entry: &BibTeXEntry,
        collision: DuplicateCollision,
    ) -> io::Result<()> {
        self.prompts.push(Prompt::Duplicate {
            cite_key: entry.cite_key.clone(),
            collision,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibclean_bibtex::BibTeXEntryType;
    use std::io::Cursor;

    #[test]
    fn test_field_decision_from_answer() {
        assert_eq!(FieldDecision::from_answer("r"), FieldDecision::Reserve);
        assert_eq!(FieldDecision::from_answer("R\n"), FieldDecision::Reserve);
        assert_eq!(FieldDecision::from_answer(""), FieldDecision::Delete);
        assert_eq!(FieldDecision::from_answer("reserve"), FieldDecision::Delete);
        assert_eq!(FieldDecision::from_answer("d"), FieldDecision::Delete);
    }

    #[test]
    fn test_console_operator_reads_answers_in_order() {
        let input = Cursor::new("R\n\n  tpds \n");
        let mut operator = ConsoleOperator::new(input, Vec::new());

        assert_eq!(
            operator.classify_field("a", "doi").unwrap(),
            FieldDecision::Reserve
        );
        assert_eq!(operator.conference_abbreviation("a", "Foo").unwrap(), None);
        assert_eq!(
            operator.journal_abbreviation("a", "Bar").unwrap(),
            Some("tpds".to_string())
        );

        let output = String::from_utf8(operator.into_output()).unwrap();
        assert!(output.contains("`doi` in a"));
        assert!(output.contains("Unrecognized conference in a: Foo"));
        assert!(output.contains("Unrecognized journal in a: Bar"));
    }

    #[test]
    fn test_console_operator_end_of_input_is_default() {
        let mut operator = ConsoleOperator::new(Cursor::new(""), Vec::new());
        assert_eq!(
            operator.classify_field("a", "doi").unwrap(),
            FieldDecision::Delete
        );
        assert_eq!(operator.conference_abbreviation("a", "Foo").unwrap(), None);
    }

    #[test]
    fn test_console_operator_shows_hints_and_duplicates() {
        let mut operator = ConsoleOperator::new(Cursor::new("\n\n"), Vec::new())
            .with_venue_hints(&VenueTable::builtin());
        operator.journal_abbreviation("a", "Bar").unwrap();

        let mut entry = BibTeXEntry::new("dup", BibTeXEntryType::Misc);
        entry.set_field("title", "X");
        operator
            .acknowledge_duplicate(&entry, DuplicateCollision { id: false, title: true })
            .unwrap();

        let output = String::from_utf8(operator.into_output()).unwrap();
        assert!(output.contains("known: pami, ijcv, tog"));
        assert!(output.contains("ID seen: false, title seen: true"));
        assert!(output.contains("@misc{dup,"));
    }

    #[test]
    fn test_scripted_operator_records_prompts() {
        let mut operator = ScriptedOperator::new(["r", "cvpr"]);
        assert_eq!(
            operator.classify_field("k", "doi").unwrap(),
            FieldDecision::Reserve
        );
        assert_eq!(
            operator.conference_abbreviation("k", "Somewhere").unwrap(),
            Some("cvpr".to_string())
        );
        assert_eq!(operator.journal_abbreviation("k", "J").unwrap(), None);
        assert_eq!(operator.remaining(), 0);
        assert_eq!(operator.prompts.len(), 3);
    }

    #[test]
    fn test_collision_display() {
        let both = DuplicateCollision { id: true, title: true };
        assert_eq!(both.to_string(), "ID and title");
        assert!(!DuplicateCollision::default().any());
    }
}
