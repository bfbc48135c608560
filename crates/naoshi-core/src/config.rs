//! Configuration loading for Naoshi
//!
//! Configuration lives in a `naoshi.toml` at the project root. Every field
//! has a default, so running without a config file works out of the box.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::NaoshiError;
use crate::result::Result;

/// File name searched for during configuration discovery.
pub const CONFIG_FILE_NAME: &str = "naoshi.toml";

const DEFAULT_PARSER_BINARY: &str = "hh_parse";
const DEFAULT_PARSER_CONCURRENCY: usize = 8;

/// Top-level Naoshi configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct NaoshiConfig {
    pub parser: ParserSettings,
    pub migrations: MigrationSettings,
}

/// Settings for the external parser invocation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserSettings {
    /// Parser executable; resolved through `PATH` when not absolute.
    pub binary: PathBuf,
    /// Pass `--php5-compat-mode` to the parser.
    pub php5_compat: bool,
    /// Maximum number of parser subprocesses running at once.
    pub max_concurrency: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_PARSER_BINARY),
            php5_compat: true,
            max_concurrency: DEFAULT_PARSER_CONCURRENCY,
        }
    }
}

/// Migration selection settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MigrationSettings {
    /// Migrations applied when none are named on the command line.
    /// Empty means "all registered migrations".
    pub enabled: Vec<String>,
}

impl NaoshiConfig {
    /// Load configuration from an explicit file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|err| NaoshiError::io(path, err))?;
        toml::from_str(&content).map_err(|err| {
            NaoshiError::config(format!("invalid config at '{}': {err}", path.display()))
        })
    }

    /// Walk upward from `start`, returning the first `naoshi.toml` found.
    pub fn discover(start: impl AsRef<Path>) -> Result<Option<Self>> {
        for dir in start.as_ref().ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(config = %candidate.display(), "using discovered config");
                return Self::load(candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Discover a config from `start`, falling back to defaults.
    pub fn discover_or_default(start: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::discover(start)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = NaoshiConfig::default();
        assert_eq!(config.parser.binary, PathBuf::from("hh_parse"));
        assert!(config.parser.php5_compat);
        assert_eq!(config.parser.max_concurrency, 8);
        assert!(config.migrations.enabled.is_empty());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: NaoshiConfig = toml::from_str(
            r#"
            [parser]
            binary = "/opt/hhvm/bin/hh_parse"
            max_concurrency = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.parser.binary, PathBuf::from("/opt/hhvm/bin/hh_parse"));
        assert_eq!(config.parser.max_concurrency, 2);
        assert!(config.parser.php5_compat);
    }

    #[test]
    fn load_reports_invalid_toml_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "parser = 3").unwrap();

        let err = NaoshiConfig::load(&path).unwrap_err();
        assert!(matches!(err, NaoshiError::Config { .. }));
    }

    #[test]
    fn discover_walks_up_to_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[migrations]\nenabled = [\"array-ref-in-foreach\"]\n",
        )
        .unwrap();

        let config = NaoshiConfig::discover(&nested).unwrap().unwrap();
        assert_eq!(config.migrations.enabled, vec!["array-ref-in-foreach"]);
    }

    #[test]
    fn discover_without_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(NaoshiConfig::discover(dir.path()).unwrap(), None);
    }
}
