//! Configuration for progress tracking and reporting.
//!
//! Both configs can be loaded from a TOML table:
//!
//! ```toml
//! [tracker]
//! duplicate_start = "restart"
//! unknown_id = "warn"
//! validate_percentage = true
//! max_open_sessions = 64
//!
//! [reporter]
//! id_prefix = "cortex"
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// What to do when Start arrives for an id that is already open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateStartPolicy {
    /// Close the open session and open a fresh one.
    #[default]
    Restart,
    /// Keep the open session and return an error.
    Reject,
}

/// What to do with Report or Done for an id that is not open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownIdPolicy {
    /// Drop silently (debug log only).
    Ignore,
    /// Drop and log a warning.
    #[default]
    Warn,
    /// Return an error.
    Reject,
}

/// Receiver side configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub duplicate_start: DuplicateStartPolicy,
    pub unknown_id: UnknownIdPolicy,
    /// Reject percentages outside `[0, 100]` instead of accepting them.
    pub validate_percentage: bool,
    /// Maximum number of concurrently open sessions, unlimited when unset.
    pub max_open_sessions: Option<NonZeroUsize>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            duplicate_start: DuplicateStartPolicy::default(),
            unknown_id: UnknownIdPolicy::default(),
            validate_percentage: false,
            max_open_sessions: None,
        }
    }
}

impl TrackerConfig {
    pub fn with_duplicate_start(mut self, policy: DuplicateStartPolicy) -> Self {
        self.duplicate_start = policy;
        self
    }

    pub fn with_unknown_id(mut self, policy: UnknownIdPolicy) -> Self {
        self.unknown_id = policy;
        self
    }

    pub fn with_percentage_validation(mut self, enabled: bool) -> Self {
        self.validate_percentage = enabled;
        self
    }

    pub fn with_max_open_sessions(mut self, max: NonZeroUsize) -> Self {
        self.max_open_sessions = Some(max);
        self
    }
}

/// Default prefix for generated progress ids.
pub const DEFAULT_ID_PREFIX: &str = "progress";

/// Sender side configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Prefix for generated ids (`<prefix>-<n>`).
    pub id_prefix: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

impl ReporterConfig {
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.id_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "reporter.id_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Combined progress configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub tracker: TrackerConfig,
    pub reporter: ReporterConfig,
}

impl ProgressConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.reporter.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ProgressConfig::default();
        assert_eq!(config.tracker.duplicate_start, DuplicateStartPolicy::Restart);
        assert_eq!(config.tracker.unknown_id, UnknownIdPolicy::Warn);
        assert!(!config.tracker.validate_percentage);
        assert_eq!(config.tracker.max_open_sessions, None);
        assert_eq!(config.reporter.id_prefix, DEFAULT_ID_PREFIX);
    }

    #[test]
    fn test_parse_toml() {
        let config = ProgressConfig::from_toml_str(
            r#"
            [tracker]
            duplicate_start = "reject"
            unknown_id = "ignore"
            validate_percentage = true
            max_open_sessions = 8

            [reporter]
            id_prefix = "indexer"
            "#,
        )
        .expect("valid config");

        assert_eq!(
            config.tracker,
            TrackerConfig::default()
                .with_duplicate_start(DuplicateStartPolicy::Reject)
                .with_unknown_id(UnknownIdPolicy::Ignore)
                .with_percentage_validation(true)
                .with_max_open_sessions(NonZeroUsize::new(8).unwrap())
        );
        assert_eq!(config.reporter.id_prefix, "indexer");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ProgressConfig::from_toml_str("[tracker]\nunknown_id = \"reject\"\n")
            .expect("valid config");
        assert_eq!(config.tracker.unknown_id, UnknownIdPolicy::Reject);
        assert_eq!(config.tracker.duplicate_start, DuplicateStartPolicy::Restart);
        assert_eq!(config.reporter, ReporterConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = ProgressConfig::from_toml_str("[tracker]\nmax_open_sessions = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ProgressConfig::from_toml_str("[reporter]\nid_prefix = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ProgressConfig::from_toml_str("[tracker]\nduplicate_start = \"merge\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.toml");
        std::fs::write(&path, "[reporter]\nid_prefix = \"rust-analyzer\"\n").expect("write");

        let config = ProgressConfig::from_file(&path).expect("load");
        assert_eq!(config.reporter.id_prefix, "rust-analyzer");

        let missing = ProgressConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
