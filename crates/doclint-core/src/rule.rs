//! Rule trait for defining structural checks.

use crate::context::RunContext;
use crate::finding::Finding;
use crate::l10n::{ConfigurationError, MessageCatalog};
use crate::node::{Document, NodeId};
use crate::selector::{Selector, SelectorError};
use miette::Diagnostic;
use thiserror::Error;

/// Errors a rule may return from [`Rule::evaluate`].
///
/// A well-formed document never causes one of these; they signal a bug in
/// the rule. The [`Linter`](crate::Linter) records them and moves on.
#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    /// The rule's catalog could not be resolved.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A selector used by the rule is invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Selector(#[from] SelectorError),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// A structural check over a [`Document`].
///
/// Rules are stateless: `evaluate` takes `&self`, must not mutate the
/// document, and must return the same result for the same inputs.
///
/// # Example
///
/// ```ignore
/// use doclint_core::{Document, Finding, MessageCatalog, Messages, Rule, RuleError, RunContext};
///
/// pub struct NoEmptyParagraphs {
///     catalog: MessageCatalog,
/// }
///
/// impl Rule for NoEmptyParagraphs {
///     fn name(&self) -> &'static str { "no-empty-paragraphs" }
///     fn catalog(&self) -> &MessageCatalog { &self.catalog }
///
///     fn evaluate(&self, ctx: &RunContext, doc: &dyn Document) -> Result<Option<Finding>, RuleError> {
///         let offenders = doc
///             .query_selector_all("p")?
///             .into_iter()
///             .filter(|&p| doc.first_element_child(p).is_none())
///             .collect();
///         self.finding(ctx, offenders)
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the unique kebab-case name of this rule (e.g. "no-headingless-sections").
    fn name(&self) -> &'static str;

    /// Returns a brief, untranslated summary of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the localized messages this rule reports with.
    fn catalog(&self) -> &MessageCatalog;

    /// Checks a document.
    ///
    /// Returns `Ok(None)` when the document complies.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] only on an internal failure of the rule.
    fn evaluate(&self, ctx: &RunContext, doc: &dyn Document) -> Result<Option<Finding>, RuleError>;

    /// Builds this rule's finding for `offenders` in the context's language.
    ///
    /// Returns `Ok(None)` when `offenders` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Configuration`] if the catalog lacks the default language.
    fn finding(
        &self,
        ctx: &RunContext,
        offenders: Vec<NodeId>,
    ) -> Result<Option<Finding>, RuleError> {
        if offenders.is_empty() {
            return Ok(None);
        }
        let messages = ctx
            .localize(self.catalog())
            .map_err(|e| e.for_rule(self.name()))?;
        Ok(Finding::new(self.name(), offenders, messages.clone()))
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Predicate deciding whether a selected element violates a rule.
pub type ViolationPredicate = fn(&dyn Document, NodeId) -> bool;

/// A rule of the shape "select elements, keep those that violate a predicate".
///
/// Most structural checks fit this shape, so they can be declared instead of
/// implementing [`Rule`] by hand.
#[derive(Clone)]
pub struct SelectorRule {
    name: &'static str,
    description: &'static str,
    selector: Selector,
    has_violation: ViolationPredicate,
    catalog: MessageCatalog,
}

impl std::fmt::Debug for SelectorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorRule")
            .field("name", &self.name)
            .field("selector", &self.selector.as_str())
            .finish_non_exhaustive()
    }
}

impl SelectorRule {
    /// Creates a selector rule.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if `selector` cannot be parsed.
    pub fn new(
        name: &'static str,
        selector: &str,
        has_violation: ViolationPredicate,
        catalog: MessageCatalog,
    ) -> Result<Self, SelectorError> {
        Ok(Self {
            name,
            description: "",
            selector: Selector::parse(selector)?,
            has_violation,
            catalog,
        })
    }

    /// Sets the summary returned by [`Rule::description`].
    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Returns the selector this rule queries.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl Rule for SelectorRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    fn evaluate(&self, ctx: &RunContext, doc: &dyn Document) -> Result<Option<Finding>, RuleError> {
        let offenders = doc
            .select(&self.selector)
            .into_iter()
            .filter(|&node| (self.has_violation)(doc, node))
            .collect();
        self.finding(ctx, offenders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::l10n::Messages;
    use crate::ElementTree;

    fn catalog() -> MessageCatalog {
        MessageCatalog::builder()
            .language("en", Messages::new("Paragraphs must not be empty.", "Remove it."))
            .language("nl", Messages::new("Paragrafen mogen niet leeg zijn.", "Verwijder ze."))
            .build()
    }

    fn is_empty(doc: &dyn Document, node: NodeId) -> bool {
        doc.first_element_child(node).is_none()
    }

    fn document() -> (ElementTree, NodeId) {
        let mut tree = ElementTree::new("body");
        let full = tree.append(tree.root(), "p");
        tree.append(full, "span");
        let empty = tree.append(tree.root(), "p");
        (tree, empty)
    }

    #[test]
    fn selector_rule_reports_matching_offenders() {
        let rule = SelectorRule::new("no-empty-paragraphs", "p", is_empty, catalog())
            .unwrap()
            .with_description("Forbids empty paragraphs");
        let (tree, empty) = document();

        let finding = rule
            .evaluate(&RunContext::new("nl"), &tree)
            .unwrap()
            .unwrap();
        assert_eq!(finding.rule(), "no-empty-paragraphs");
        assert_eq!(finding.offending_elements(), &[empty]);
        assert_eq!(finding.description(), "Paragrafen mogen niet leeg zijn.");
        assert_eq!(rule.description(), "Forbids empty paragraphs");
    }

    #[test]
    fn selector_rule_is_absent_on_compliant_document() {
        let rule = SelectorRule::new("no-empty-paragraphs", "div", is_empty, catalog()).unwrap();
        let (tree, _) = document();
        assert!(rule.evaluate(&RunContext::new("en"), &tree).unwrap().is_none());
    }

    #[test]
    fn selector_rule_rejects_bad_selector() {
        assert!(SelectorRule::new("bad", "body > p", is_empty, catalog()).is_err());
    }

    #[test]
    fn finding_without_default_language_is_configuration_error() {
        let rule = SelectorRule::new(
            "no-empty-paragraphs",
            "p",
            is_empty,
            MessageCatalog::builder()
                .language("nl", Messages::new("leeg", "verwijder"))
                .build(),
        )
        .unwrap();
        let (tree, _) = document();
        let err = rule.evaluate(&RunContext::new("fr"), &tree).unwrap_err();
        match err {
            RuleError::Configuration(e) => {
                assert_eq!(e.rule.as_deref(), Some("no-empty-paragraphs"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
