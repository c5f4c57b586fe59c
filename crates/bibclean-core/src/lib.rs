//! Core library for bibclean
//!
//! Cleans a BibTeX library for a computer-vision paper:
//! - rewrites venue names into `@string` abbreviation references
//! - drops metadata fields that do not belong in a reference list
//! - skips duplicate entries by citation key or title
//!
//! Anything the rules cannot decide is handed to an [`Operator`].

pub mod config;
pub mod error;
pub mod fields;
pub mod normalizer;
pub mod operator;
pub mod pipeline;
pub mod preamble;
pub mod venues;

pub use config::{CleanConfig, FieldsConfig, VenueConfig, WriterConfig};
pub use error::{CleanError, ConfigError, Result};
pub use fields::{FieldClass, FieldPolicy};
pub use normalizer::{NormalizationReport, NormalizedBibliography, Normalizer};
pub use operator::{
    ConsoleOperator, DuplicateCollision, FieldDecision, Operator, Prompt, ScriptedOperator,
};
pub use pipeline::{clean_file, clean_text, CleanOutput};
pub use venues::{match_conference, match_journal, Venue, VenueKind, VenueTable};
