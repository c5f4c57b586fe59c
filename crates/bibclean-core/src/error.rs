//! Error types for bibclean-core

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for cleaning operations
pub type Result<T> = std::result::Result<T, CleanError>;

/// Main error type for a cleaning run. Every variant aborts the run before
/// any output is written.
#[derive(Error, Debug)]
pub enum CleanError {
    /// Input file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be written
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input is not valid BibTeX
    #[error("{origin}:{line}: {message}")]
    Parse {
        origin: String,
        line: u32,
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Reading an answer from the operator failed
    #[error("Operator prompt failed: {0}")]
    Operator(#[source] io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("Failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    /// A field is listed as both reserved and removed
    #[error("Field `{0}` is listed as both reserved and removed")]
    ConflictingField(String),

    /// A venue token is empty or not a valid @string name
    #[error("Invalid venue token `{0}`")]
    InvalidVenueToken(String),

    /// A venue token is defined twice
    #[error("Venue token `{0}` is defined more than once")]
    DuplicateVenue(String),
}
