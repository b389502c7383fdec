//! Loading document trees from JSON.

use anyhow::{Context, Result};
use doclint_core::{ElementSpec, ElementTree};
use std::path::Path;

/// Reads a nested [`ElementSpec`] JSON file into an [`ElementTree`].
pub fn load(path: &Path) -> Result<ElementTree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid document: {}", path.display()))
}

/// Parses a nested [`ElementSpec`] JSON string.
pub fn parse(content: &str) -> Result<ElementTree> {
    let spec: ElementSpec = serde_json::from_str(content)?;
    let tree = ElementTree::from_spec(&spec);
    tracing::debug!("Loaded document with {} element(s)", tree.len());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclint_core::Document;

    #[test]
    fn parses_nested_json() {
        let tree = parse(
            r#"{
                "name": "html",
                "attributes": { "lang": "nl" },
                "children": [
                    { "name": "body", "children": [ { "name": "section" } ] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.attribute(tree.root(), "lang"), Some("nl"));
    }

    #[test]
    fn rejects_missing_name() {
        assert!(parse(r#"{ "children": [] }"#).is_err());
    }

    #[test]
    fn load_names_the_file_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
