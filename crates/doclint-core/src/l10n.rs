//! Localized rule messages and language resolution.
//!
//! Every rule ships a [`MessageCatalog`] mapping language codes to
//! [`Messages`]. At run time the requested language is looked up exactly;
//! when it is missing the default language is used instead, silently.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Language every catalog must define unless a linter is configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A catalog lacks messages for the default language.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error(
    "message catalog{} has no entry for default language `{default_lang}` (available: {available})",
    .rule.as_deref().map_or_else(String::new, |r| format!(" of rule `{r}`"))
)]
#[diagnostic(
    code(doclint::configuration),
    help("add a `{default_lang}` message set to the catalog")
)]
pub struct ConfigurationError {
    /// Rule owning the catalog, when known.
    pub rule: Option<String>,
    /// Default language that was required.
    pub default_lang: String,
    /// Comma-separated list of languages the catalog does define.
    pub available: String,
}

impl ConfigurationError {
    /// Attaches the owning rule name.
    #[must_use]
    pub fn for_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

/// The localized text of one rule in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    /// What the rule requires.
    pub description: String,
    /// How to make the document comply.
    #[serde(alias = "how_to_fix")]
    pub how_to_fix: String,
    /// Where to look for more detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Any further rule-specific fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Messages {
    /// Creates a message set without help text.
    #[must_use]
    pub fn new(description: impl Into<String>, how_to_fix: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            how_to_fix: how_to_fix.into(),
            help: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a rule-specific field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Immutable mapping from language code to [`Messages`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    languages: BTreeMap<String, Messages>,
}

impl MessageCatalog {
    /// Starts building a catalog.
    #[must_use]
    pub fn builder() -> MessageCatalogBuilder {
        MessageCatalogBuilder::default()
    }

    /// Parses a catalog from TOML, one table per language.
    ///
    /// ```toml
    /// [en]
    /// description = "All sections must start with a heading."
    /// how_to_fix = "Add a heading."
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the TOML deserialization error.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Returns the messages for an exact language code.
    #[must_use]
    pub fn get(&self, lang: &str) -> Option<&Messages> {
        self.languages.get(lang)
    }

    /// Returns true if the catalog defines `lang`.
    #[must_use]
    pub fn contains(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// Returns the defined language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Checks that the catalog defines `default_lang`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if it does not.
    pub fn validate(&self, default_lang: &str) -> Result<(), ConfigurationError> {
        if self.contains(default_lang) {
            Ok(())
        } else {
            Err(ConfigurationError {
                rule: None,
                default_lang: default_lang.to_string(),
                available: self.languages().collect::<Vec<_>>().join(", "),
            })
        }
    }

    /// Resolves messages for `requested`, see [`resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if neither language is present.
    pub fn resolve(&self, requested: &str, default_lang: &str) -> Result<&Messages, ConfigurationError> {
        resolve(requested, self, default_lang)
    }
}

/// Builder for [`MessageCatalog`].
#[derive(Debug, Default)]
pub struct MessageCatalogBuilder {
    languages: BTreeMap<String, Messages>,
}

impl MessageCatalogBuilder {
    /// Adds (or replaces) the messages for a language.
    #[must_use]
    pub fn language(mut self, lang: impl Into<String>, messages: Messages) -> Self {
        self.languages.insert(lang.into(), messages);
        self
    }

    /// Finishes the catalog.
    #[must_use]
    pub fn build(self) -> MessageCatalog {
        MessageCatalog {
            languages: self.languages,
        }
    }
}

/// Picks the best message set for `requested`.
///
/// Returns `catalog[requested]` when present, otherwise
/// `catalog[default_lang]`. Lookup is exact: `"nl-BE"` does not match `"nl"`.
///
/// # Errors
///
/// Returns [`ConfigurationError`] only when `default_lang` is missing and
/// `requested` did not match.
pub fn resolve<'c>(
    requested: &str,
    catalog: &'c MessageCatalog,
    default_lang: &str,
) -> Result<&'c Messages, ConfigurationError> {
    if let Some(messages) = catalog.get(requested) {
        return Ok(messages);
    }
    catalog.get(default_lang).ok_or_else(|| ConfigurationError {
        rule: None,
        default_lang: default_lang.to_string(),
        available: catalog.languages().collect::<Vec<_>>().join(", "),
    })
}
