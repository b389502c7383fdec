//! Configuration types for doclint.

use crate::l10n::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for doclint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Master switch. When false, no rule runs.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requested message language. When unset, callers derive it from the
    /// document (see [`RunContext::for_document`](crate::RunContext::for_document)).
    #[serde(default)]
    pub lang: Option<String>,

    /// Language every rule catalog must define.
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Evaluate rules on a thread pool.
    #[serde(default)]
    pub parallel: bool,

    /// Wall-clock budget per rule in milliseconds.
    #[serde(default)]
    pub rule_budget_ms: Option<u64>,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            lang: None,
            default_lang: default_lang(),
            parallel: false,
            rule_budget_ms: None,
            rules: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.enabled
            && self
                .rules
                .get(rule_name)
                .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Returns the per-rule budget, if any.
    #[must_use]
    pub fn rule_budget(&self) -> Option<Duration> {
        self.rule_budget_ms.map(Duration::from_millis)
    }
}

fn default_lang() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(doclint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(doclint::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },
}
