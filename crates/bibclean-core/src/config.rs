//! Configuration for bibclean
//!
//! Optional TOML files extend the built-in venue table and field policy and
//! adjust the writer:
//!
//! ```toml
//! [fields]
//! reserved = ["url"]
//! removed = ["abstract"]
//!
//! [writer]
//! indent = "  "
//! sort_entries = false
//!
//! [[venues]]
//! token = "tpds"
//! display = "IEEE TPDS"
//! kind = "journal"
//! ```
//!
//! Files are looked up in `~/.bibclean/config.toml` and then
//! `<project>/.bibclean/config.toml`; later files extend earlier ones.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bibclean_bibtex::BibTeXWriter;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::fields::FieldPolicy;
use crate::venues::{Venue, VenueKind, VenueTable};

const CONFIG_DIR: &str = ".bibclean";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Additions to the field policy
    pub fields: FieldsConfig,
    /// Output layout
    pub writer: WriterConfig,
    /// Extra or overridden venues
    pub venues: Vec<VenueConfig>,
}

/// Fields to add to the reserved or removed class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    pub reserved: Vec<String>,
    pub removed: Vec<String>,
}

/// Writer settings; unset values fall back to the writer defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_entries: Option<bool>,
}

/// A venue definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueConfig {
    pub token: String,
    pub display: String,
    pub kind: VenueKind,
}

impl CleanConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load and validate a single config file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from standard locations
    ///
    /// Loads in order: user (~/.bibclean/config.toml), project
    /// (<root>/.bibclean/config.toml). Missing files are skipped.
    pub fn load_standard(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(CONFIG_DIR).join(CONFIG_FILE));
        }
        if let Some(root) = project_root {
            candidates.push(root.join(CONFIG_DIR).join(CONFIG_FILE));
        }

        let mut config = Self::default();
        for path in candidates {
            if path.is_file() {
                debug!("Loading config from {:?}", path);
                config.merge(Self::load_file(&path)?);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Extend this configuration with `other`. Field lists and venues are
    /// appended (a later venue replaces an earlier one with the same token);
    /// writer settings set in `other` win.
    pub fn merge(&mut self, other: CleanConfig) {
        for field in other.fields.reserved {
            self.fields.removed.retain(|f| !f.eq_ignore_ascii_case(&field));
            self.fields.reserved.push(field);
        }
        for field in other.fields.removed {
            self.fields.reserved.retain(|f| !f.eq_ignore_ascii_case(&field));
            self.fields.removed.push(field);
        }

        if other.writer.indent.is_some() {
            self.writer.indent = other.writer.indent;
        }
        if other.writer.sort_entries.is_some() {
            self.writer.sort_entries = other.writer.sort_entries;
        }

        for venue in other.venues {
            self.venues
                .retain(|v| !v.token.eq_ignore_ascii_case(&venue.token));
            self.venues.push(venue);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reserved: HashSet<String> = self
            .fields
            .reserved
            .iter()
            .map(|f| f.to_lowercase())
            .collect();
        if let Some(field) = self
            .fields
            .removed
            .iter()
            .find(|f| reserved.contains(&f.to_lowercase()))
        {
            return Err(ConfigError::ConflictingField(field.clone()));
        }

        let mut tokens = HashSet::new();
        for venue in &self.venues {
            if !is_valid_token(&venue.token) {
                return Err(ConfigError::InvalidVenueToken(venue.token.clone()));
            }
            if !tokens.insert(venue.token.to_lowercase()) {
                return Err(ConfigError::DuplicateVenue(venue.token.clone()));
            }
        }

        Ok(())
    }

    /// Built-in field policy with this configuration's additions
    pub fn field_policy(&self) -> FieldPolicy {
        let mut policy = FieldPolicy::builtin();
        for field in &self.fields.reserved {
            policy.reserve(field);
        }
        for field in &self.fields.removed {
            policy.remove(field);
        }
        policy
    }

    /// Built-in venue table with this configuration's venues added
    pub fn venue_table(&self) -> VenueTable {
        let mut table = VenueTable::builtin();
        for venue in &self.venues {
            table.insert(Venue::new(&venue.token, &venue.display, venue.kind));
        }
        table
    }

    /// Writer with this configuration's overrides applied
    pub fn writer(&self) -> BibTeXWriter {
        let defaults = BibTeXWriter::default();
        BibTeXWriter {
            indent: self.writer.indent.clone().unwrap_or(defaults.indent),
            sort_entries: self.writer.sort_entries.unwrap_or(defaults.sort_entries),
        }
    }
}

/// `@string` names: a letter followed by letters, digits, `_` or `-`
pub(crate) fn is_valid_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldClass;

    #[test]
    fn test_default_config() {
        let config = CleanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.writer(), BibTeXWriter::default());
        assert_eq!(config.venue_table(), VenueTable::builtin());
        assert_eq!(config.field_policy(), FieldPolicy::builtin());
    }

    #[test]
    fn test_from_toml() {
        let config = CleanConfig::from_toml(
            r#"
[fields]
reserved = ["url", "pages"]
removed = ["abstract"]

[writer]
indent = "  "

[[venues]]
token = "tpds"
display = "IEEE TPDS"
kind = "journal"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.writer().indent, "  ");
        assert!(config.writer().sort_entries);

        let policy = config.field_policy();
        assert_eq!(policy.classify("url"), FieldClass::Reserved);
        assert_eq!(policy.classify("pages"), FieldClass::Reserved);
        assert_eq!(policy.classify("abstract"), FieldClass::Removed);

        let table = config.venue_table();
        assert_eq!(table.display_for("tpds"), Some("IEEE TPDS"));
        assert_eq!(table.token_for("IEEE TPDS", VenueKind::Journal), Some("tpds"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = CleanConfig::default();
        config.fields.removed.push("abstract".to_string());
        config.writer.sort_entries = Some(false);
        let toml_str = config.to_toml().unwrap();
        assert_eq!(CleanConfig::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_conflicts() {
        let mut config = CleanConfig::default();
        config.fields.reserved.push("url".to_string());
        config.fields.removed.push("URL".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConflictingField(f)) if f == "URL"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_venues() {
        let venue = |token: &str| VenueConfig {
            token: token.to_string(),
            display: "X".to_string(),
            kind: VenueKind::Conference,
        };

        let config = CleanConfig {
            venues: vec![venue("")],
            ..CleanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidVenueToken(_))));

        let config = CleanConfig {
            venues: vec![venue("has space")],
            ..CleanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidVenueToken(_))));

        let config = CleanConfig {
            venues: vec![venue("abc"), venue("ABC")],
            ..CleanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateVenue(_))));
    }

    #[test]
    fn test_is_valid_token() {
        assert!(is_valid_token("miccai"));
        assert!(is_valid_token("Neur-IPS_w2"));
        assert!(!is_valid_token("MICCAI 2015"));
        assert!(!is_valid_token("3dv"));
        assert!(!is_valid_token(""));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base = CleanConfig::from_toml(
            r#"
[fields]
reserved = ["url"]

[writer]
indent = "\t"
sort_entries = false

[[venues]]
token = "x"
display = "Old"
kind = "journal"
"#,
        )
        .unwrap();
        let project = CleanConfig::from_toml(
            r#"
[fields]
removed = ["url"]

[writer]
sort_entries = true

[[venues]]
token = "X"
display = "New"
kind = "conference"
"#,
        )
        .unwrap();

        base.merge(project);
        assert!(base.validate().is_ok());
        assert!(base.fields.reserved.is_empty());
        assert_eq!(base.fields.removed, vec!["url".to_string()]);
        assert_eq!(base.writer.indent.as_deref(), Some("\t"));
        assert_eq!(base.writer.sort_entries, Some(true));
        assert_eq!(base.venues.len(), 1);
        assert_eq!(base.venues[0].display, "New");
    }

    #[test]
    fn test_load_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[writer\nindent = 3").unwrap();
        assert!(matches!(
            CleanConfig::load_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_standard_reads_project_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join(CONFIG_FILE),
            "[fields]\nremoved = [\"zzz-project-only\"]\n",
        )
        .unwrap();

        let config = CleanConfig::load_standard(Some(dir.path())).unwrap();
        assert!(config.fields.removed.contains(&"zzz-project-only".to_string()));
    }
}
