//! Locating and loading `doclint.toml`.
//!
//! Priority:
//!
//! 1. `--config <path>`
//! 2. `doclint.toml`, then `.doclint.toml`, in the document's directory
//! 3. `config.toml` in the global directory (`$DOCLINT_CONFIG_DIR` or `~/.doclint/`)
//! 4. built-in defaults

use doclint_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Config file names looked up beside the document.
const LOCAL_NAMES: &[&str] = &["doclint.toml", ".doclint.toml"];

/// File name inside the global directory.
const GLOBAL_NAME: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line; not checked for existence.
    Explicit(PathBuf),
    /// Found beside the linted document.
    Local(PathBuf),
    /// Found in the global directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Local(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the configuration, or returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match self.path() {
            Some(path) => {
                tracing::info!("Using config: {}", path.display());
                Config::from_file(path)
            }
            None => Ok(Config::default()),
        }
    }
}

/// Resolves the configuration for a document living in `document_dir`.
#[must_use]
pub fn resolve(document_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(document_dir, explicit, global_dir().as_deref())
}

fn resolve_with(document_dir: &Path, explicit: Option<&Path>, global: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(path) = LOCAL_NAMES
        .iter()
        .map(|name| document_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found local config: {}", path.display());
        return ConfigSource::Local(path);
    }

    match global.map(|dir| dir.join(GLOBAL_NAME)) {
        Some(path) if path.is_file() => {
            tracing::debug!("Found global config: {}", path.display());
            ConfigSource::Global(path)
        }
        _ => ConfigSource::Default,
    }
}

/// Returns `$DOCLINT_CONFIG_DIR`, else `~/.doclint`.
fn global_dir() -> Option<PathBuf> {
    std::env::var_os("DOCLINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".doclint")))
}
