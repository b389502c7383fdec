//! Arena-backed in-memory element tree.

use crate::node::{Document, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct ElementData {
    local_name: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory [`Document`] made only of elements.
///
/// Nodes are stored in an arena and addressed by [`NodeId`]. Ids are handed
/// out in creation order, so a tree built top-down has ids in document order.
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<ElementData>,
}

impl ElementTree {
    /// Creates a tree containing only a root element.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![ElementData {
                local_name: root_name.into(),
                attributes: BTreeMap::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a new element as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn append(&mut self, parent: NodeId, local_name: impl Into<String>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes[parent.index()].children.push(id);
        self.nodes.push(ElementData {
            local_name: local_name.into(),
            attributes: BTreeMap::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    /// Sets an attribute, replacing any previous value.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to this tree.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.nodes[node.index()]
            .attributes
            .insert(name.into(), value.into());
        self
    }

    /// Returns the number of elements in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds a tree from a nested [`ElementSpec`].
    #[must_use]
    pub fn from_spec(spec: &ElementSpec) -> Self {
        let mut tree = Self::new(spec.name.clone());
        let root = tree.root();
        tree.nodes[0].attributes.clone_from(&spec.attributes);
        tree.append_specs(root, &spec.children);
        tree
    }

    fn append_specs(&mut self, parent: NodeId, specs: &[ElementSpec]) {
        for spec in specs {
            let id = self.append(parent, spec.name.clone());
            self.nodes[id.index()].attributes.clone_from(&spec.attributes);
            self.append_specs(id, &spec.children);
        }
    }

    /// Converts the tree back to its nested form.
    #[must_use]
    pub fn to_spec(&self) -> ElementSpec {
        self.spec_of(self.root())
    }

    fn spec_of(&self, node: NodeId) -> ElementSpec {
        let data = &self.nodes[node.index()];
        ElementSpec {
            name: data.local_name.clone(),
            attributes: data.attributes.clone(),
            children: data.children.iter().map(|&c| self.spec_of(c)).collect(),
        }
    }

    fn get(&self, node: NodeId) -> Option<&ElementData> {
        self.nodes.get(node.index())
    }
}

impl Document for ElementTree {
    fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    fn local_name(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|n| n.local_name.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.attributes.get(name).map(String::as_str)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.children.first().copied()
    }

    fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.nodes[parent.index()].children;
        let position = siblings.iter().position(|&s| s == node)?;
        siblings.get(position + 1).copied()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }
}

/// Serializable nested description of an element.
///
/// ```json
/// { "name": "section", "attributes": { "id": "intro" }, "children": [ { "name": "h2" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Local name of the element.
    pub name: String,
    /// Attributes by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Element children in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Creates a spec with no attributes and no children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a child.
    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_links_parent_and_siblings() {
        let mut tree = ElementTree::new("body");
        let a = tree.append(tree.root(), "section");
        let b = tree.append(tree.root(), "div");
        assert_eq!(tree.parent(a), Some(tree.root()));
        assert_eq!(tree.first_element_child(tree.root()), Some(a));
        assert_eq!(tree.next_element_sibling(a), Some(b));
        assert_eq!(tree.next_element_sibling(b), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn foreign_ids_are_absent() {
        let tree = ElementTree::new("html");
        let foreign = NodeId::new(42);
        assert_eq!(tree.local_name(foreign), None);
        assert_eq!(tree.first_element_child(foreign), None);
        assert!(tree.children(foreign).is_empty());
    }

    #[test]
    fn attributes_are_replaced() {
        let mut tree = ElementTree::new("html");
        let root = tree.root();
        tree.set_attribute(root, "lang", "en").set_attribute(root, "lang", "nl");
        assert_eq!(tree.attribute(root, "lang"), Some("nl"));
        assert_eq!(tree.attribute(root, "dir"), None);
    }

    #[test]
    fn spec_builds_matching_tree() {
        let spec = ElementSpec::new("html").attr("lang", "zh").child(
            ElementSpec::new("body")
                .child(ElementSpec::new("section").child(ElementSpec::new("h2")))
                .child(ElementSpec::new("section")),
        );
        let tree = ElementTree::from_spec(&spec);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.attribute(tree.root(), "lang"), Some("zh"));
        assert_eq!(tree.query_selector_all("section").unwrap().len(), 2);
        assert_eq!(tree.to_spec(), spec);
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let spec: ElementSpec =
            serde_json::from_str(r#"{"name":"section","children":[{"name":"p"}]}"#).unwrap();
        assert!(spec.attributes.is_empty());
        assert_eq!(spec.children[0], ElementSpec::new("p"));
    }
}
