//! Minimal node capability interface that rules query.
//!
//! Rules never see a concrete tree. They depend on [`Document`], which only
//! exposes local names, attributes and element navigation. Anything that can
//! answer those questions (an HTML DOM binding, an XML tree, the in-memory
//! [`ElementTree`](crate::ElementTree)) can be linted.

use crate::selector::{Selector, SelectorError};
use serde::{Deserialize, Serialize};

/// Opaque handle to one element of one document.
///
/// Handles are only meaningful for the document that produced them. Two
/// handles are equal when they refer to the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only element tree that rules evaluate against.
///
/// Only element nodes are modelled; text and comments are invisible to rules.
/// Implementations must be cheap to share across threads because the
/// [`Linter`](crate::Linter) may evaluate rules in parallel.
pub trait Document: Send + Sync {
    /// Returns the document element (e.g. `<html>`).
    fn root(&self) -> NodeId;

    /// Returns the local (tag) name of an element, or `None` for a foreign id.
    fn local_name(&self, node: NodeId) -> Option<&str>;

    /// Returns the value of an attribute on an element.
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Returns the parent element.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns the first element child.
    fn first_element_child(&self, node: NodeId) -> Option<NodeId>;

    /// Returns the next element sibling.
    fn next_element_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Returns the element children of a node in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut next = self.first_element_child(node);
        while let Some(child) = next {
            out.push(child);
            next = self.next_element_sibling(child);
        }
        out
    }

    /// Returns every element in pre-order (document order), root included.
    fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut children = self.children(node);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Returns all elements matching a parsed selector, in document order.
    fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|&node| selector.matches(self, node))
            .collect()
    }

    /// Parses `selector` and returns the matching elements in document order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if the selector cannot be parsed.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(&selector))
    }

    /// Describes where an element sits, e.g. `html > body > section:nth-of-type(2)`.
    ///
    /// The `:nth-of-type` suffix is only added when the element has siblings
    /// with the same local name.
    fn element_path(&self, node: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let name = self.local_name(id).unwrap_or("?");
            let segment = match self.parent(id) {
                Some(parent) => {
                    let same: Vec<NodeId> = self
                        .children(parent)
                        .into_iter()
                        .filter(|&c| self.local_name(c) == Some(name))
                        .collect();
                    if same.len() > 1 {
                        let position = same.iter().position(|&c| c == id).map_or(0, |p| p + 1);
                        format!("{name}:nth-of-type({position})")
                    } else {
                        name.to_string()
                    }
                }
                None => name.to_string(),
            };
            segments.push(segment);
            current = self.parent(id);
        }
        segments.reverse();
        segments.join(" > ")
    }
}
