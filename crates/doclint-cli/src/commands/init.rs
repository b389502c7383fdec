//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# doclint configuration

# Master switch for all rules
enabled = true

# Message language; when unset the document's <html lang> is used
# lang = "nl"

# Language every rule's messages must provide
default_lang = "en"

# Evaluate rules on a thread pool
parallel = false

# Per-rule wall-clock budget in milliseconds
# rule_budget_ms = 250

[rules.no-headingless-sections]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("doclint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created doclint.toml");
    println!("\nNext steps:");
    println!("  1. Edit doclint.toml to configure rules");
    println!("  2. Run: doclint check <document.json>");

    Ok(())
}
