//! Parse, normalize and serialize a whole bibliography

use std::path::Path;

use bibclean_bibtex::parse;
use tracing::{debug, info};

use crate::config::CleanConfig;
use crate::error::{CleanError, Result};
use crate::normalizer::{NormalizationReport, Normalizer};
use crate::operator::Operator;
use crate::preamble;

/// Cleaned file content and what happened while producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutput {
    pub text: String,
    pub report: NormalizationReport,
}

/// Clean BibTeX source text. `origin` names the source in error messages.
///
/// Any entry that fails to parse aborts the run.
pub fn clean_text(
    source: &str,
    origin: &str,
    config: &CleanConfig,
    operator: &mut dyn Operator,
) -> Result<CleanOutput> {
    let parsed = parse(source).map_err(|e| CleanError::Parse {
        origin: origin.to_string(),
        line: 0,
        message: e.to_string(),
    })?;
    if parsed.has_errors() {
        let error = &parsed.errors[0];
        return Err(CleanError::Parse {
            origin: origin.to_string(),
            line: error.line,
            message: error.message.clone(),
        });
    }
    debug!(
        "Parsed {} entries and {} @string definitions from {}",
        parsed.entries.len(),
        parsed.strings.len(),
        origin
    );

    let venues = config.venue_table();
    let fields = config.field_policy();
    let normalized = Normalizer::new(&venues, &fields).normalize(&parsed.entries, operator)?;

    let mut text = preamble::render(&venues);
    text.push_str(&config.writer().write_entries(&normalized.entries));

    Ok(CleanOutput {
        text,
        report: normalized.report,
    })
}

/// Clean `input` into `output`. Nothing is written unless the whole input
/// was processed.
pub fn clean_file(
    input: &Path,
    output: &Path,
    config: &CleanConfig,
    operator: &mut dyn Operator,
) -> Result<NormalizationReport> {
    let source = std::fs::read_to_string(input).map_err(|source| CleanError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let cleaned = clean_text(&source, &input.display().to_string(), config, operator)?;

    std::fs::write(output, &cleaned.text).map_err(|source| CleanError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    info!("Wrote {} entries to {:?}", cleaned.report.entries_kept, output);

    Ok(cleaned.report)
}
