//! Rule requiring every section to open with a heading.
//!
//! # Rationale
//!
//! A `<section>` is a titled part of a document. Without a leading heading
//! it does not show up in the outline and screen readers cannot announce it.
//! Untitled wrappers should be a `<div>` instead.
//!
//! # Detected Patterns
//!
//! - `<section>` with no element children
//! - `<section>` whose first element child is not `h1`–`h6`
//!
//! # Allowed Patterns
//!
//! - `<section><h2>..</h2>..</section>` (any of `h1`–`h6`)

use doclint_core::{Document, Finding, MessageCatalog, Messages, NodeId, Rule, RuleError, RunContext};
use tracing::debug;

/// Rule name for no-headingless-sections.
pub const NAME: &str = "no-headingless-sections";

/// Returns true when `section` lacks a leading `h1`–`h6`.
///
/// A missing first child and a first child of another type both count.
#[must_use]
pub fn has_no_heading(doc: &dyn Document, section: NodeId) -> bool {
    doc.first_element_child(section)
        .and_then(|child| doc.local_name(child))
        .map_or(true, |name| !is_heading(name))
}

/// ASCII case-insensitive, like type selectors.
fn is_heading(local_name: &str) -> bool {
    matches!(local_name.as_bytes(), [b'h' | b'H', b'1'..=b'6'])
}

/// Requires every `<section>` to start with a heading element.
#[derive(Debug, Clone)]
pub struct NoHeadinglessSections {
    catalog: MessageCatalog,
}

impl Default for NoHeadinglessSections {
    fn default() -> Self {
        Self::new()
    }
}

impl NoHeadinglessSections {
    /// Creates the rule with its built-in `en`, `nl` and `zh` messages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: MessageCatalog::builder()
                .language(
                    "en",
                    Messages::new(
                        "All sections must start with a `h2-6` element.",
                        "Add a `h2-6` to the offending section or use a `<div>`.",
                    )
                    .with_help("See developer console."),
                )
                .language(
                    "nl",
                    Messages::new(
                        "Alle secties moeten beginnen met een `h2-6` element.",
                        "Voeg een `h2-6` toe aan de conflicterende sectie of gebruik een `<div>`.",
                    )
                    .with_help("Zie de developer console."),
                )
                .language(
                    "zh",
                    Messages::new(
                        "所有章节（section）都必须以 `h2-6` 元素开头。",
                        "将 `h2-6` 添加到有问题的章节或使用 `<div>`。",
                    ),
                )
                .build(),
        }
    }

    /// Replaces the message catalog, e.g. with one loaded from TOML.
    #[must_use]
    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }
}

impl Rule for NoHeadinglessSections {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires every section to start with a heading element"
    }

    fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    fn evaluate(&self, ctx: &RunContext, doc: &dyn Document) -> Result<Option<Finding>, RuleError> {
        let sections = doc.query_selector_all("section")?;
        let offenders: Vec<NodeId> = sections
            .iter()
            .copied()
            .filter(|&section| has_no_heading(doc, section))
            .collect();
        debug!(
            "{}: {} of {} section(s) lack a heading",
            NAME,
            offenders.len(),
            sections.len()
        );
        self.finding(ctx, offenders)
    }
}
