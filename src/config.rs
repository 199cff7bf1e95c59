//! `apexdoc.toml` configuration.
//!
//! ```toml
//! indent_size = 4
//! use_tabs = false
//! extra_modifiers = ["testMethod", "@Deprecated"]
//! ```

use crate::reindent::{IndentUnit, MAX_INDENT_WIDTH};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "apexdoc.toml";

const DEFAULT_INDENT_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Spaces per indent level. Ignored when `use_tabs` is set.
    pub indent_size: usize,
    pub use_tabs: bool,
    /// Additional keywords stripped from signatures before the return type
    /// is read.
    pub extra_modifiers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
            use_tabs: false,
            extra_modifiers: Vec::new(),
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("invalid configuration")?;
        if !(1..=MAX_INDENT_WIDTH).contains(&config.indent_size) {
            bail!(
                "indent_size must be between 1 and {}, got {}",
                MAX_INDENT_WIDTH,
                config.indent_size
            );
        }
        Ok(config)
    }

    /// Load `explicit` if given, otherwise `apexdoc.toml` in `dir` when it
    /// exists, otherwise defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if !candidate.is_file() {
                    tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config =
            Self::parse(&content).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn indent_unit(&self) -> IndentUnit {
        if self.use_tabs {
            IndentUnit::Tab
        } else {
            IndentUnit::Spaces(self.indent_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_four_spaces() {
        let config = Config::default();
        assert_eq!(config.indent_unit(), IndentUnit::Spaces(4));
        assert!(config.extra_modifiers.is_empty());
    }

    #[test]
    fn parses_partial_file() {
        let config = Config::parse("indent_size = 2\n").unwrap();
        assert_eq!(config.indent_size, 2);
        assert!(!config.use_tabs);
    }

    #[test]
    fn tabs_win_over_size() {
        let config = Config::parse("indent_size = 2\nuse_tabs = true\n").unwrap();
        assert_eq!(config.indent_unit(), IndentUnit::Tab);
    }

    #[test]
    fn rejects_zero_indent() {
        let err = Config::parse("indent_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("indent_size"));
    }

    #[test]
    fn rejects_oversized_indent() {
        let err = Config::parse("indent_size = 9223372036854775807\n").unwrap_err();
        assert!(err.to_string().contains("between 1 and 16"));
        assert_eq!(Config::parse("indent_size = 16\n").unwrap().indent_size, 16);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::parse("indent = 3\n").is_err());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn load_discovers_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "extra_modifiers = [\"future\"]\n",
        )
        .unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.extra_modifiers, vec!["future".to_string()]);
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing), dir.path()).is_err());
    }
}
