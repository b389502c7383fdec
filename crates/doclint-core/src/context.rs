//! Context passed to rules for one linting run.

use crate::l10n::{resolve, ConfigurationError, MessageCatalog, Messages, DEFAULT_LANGUAGE};
use crate::node::Document;
use std::collections::BTreeMap;

/// Run metadata shared by every rule in one pass.
///
/// The requested language travels here explicitly; rules never consult a
/// process-wide locale. Rules that do not report text may ignore the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Language the caller would like messages in.
    pub lang: String,
    /// Language used when a catalog lacks `lang`.
    pub default_lang: String,
    /// Free-form metadata (e.g. the document's source path).
    pub metadata: BTreeMap<String, String>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl RunContext {
    /// Creates a context requesting `lang` with the default fallback language.
    #[must_use]
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            default_lang: DEFAULT_LANGUAGE.to_string(),
            metadata: BTreeMap::new(),
        }
    }

    /// Creates a context from the `lang` attribute of the document element.
    ///
    /// Falls back to the default language when the attribute is absent or blank.
    #[must_use]
    pub fn for_document(doc: &dyn Document) -> Self {
        let lang = doc
            .attribute(doc.root(), "lang")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);
        Self::new(lang)
    }

    /// Overrides the fallback language.
    #[must_use]
    pub fn with_default_lang(mut self, default_lang: impl Into<String>) -> Self {
        self.default_lang = default_lang.into();
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Resolves a rule's messages for this run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the catalog lacks both languages.
    pub fn localize<'c>(&self, catalog: &'c MessageCatalog) -> Result<&'c Messages, ConfigurationError> {
        resolve(&self.lang, catalog, &self.default_lang)
    }
}
