//! List rules command implementation.

use anyhow::{Context, Result};
use doclint_core::{Config, Rule};
use doclint_rules::all_rules;

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
///
/// Descriptions are shown in `lang`, else the configured `lang`, falling
/// back to the configured `default_lang`.
pub fn run(lang: Option<String>, source: &ConfigSource) -> Result<()> {
    let config = source.load().context("Failed to load config")?;
    let lang = lang
        .or_else(|| config.lang.clone())
        .unwrap_or_else(|| config.default_lang.clone());

    println!("Available rules:\n");
    println!("{:<28} {:<12} Description", "Name", "Languages");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        let languages: Vec<&str> = rule.catalog().languages().collect();
        println!(
            "{:<28} {:<12} {}",
            rule.name(),
            languages.join(","),
            describe(rule.as_ref(), &lang, &config)
        );
    }

    println!("\nDisable a rule in doclint.toml:");
    println!("  [rules.no-headingless-sections]");
    println!("  enabled = false");
    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  doclint check --rules no-headingless-sections index.json");

    Ok(())
}

fn describe<'r>(rule: &'r dyn Rule, lang: &str, config: &Config) -> &'r str {
    rule.catalog()
        .resolve(lang, &config.default_lang)
        .map_or(rule.description(), |m| m.description.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclint_core::{Document, Finding, MessageCatalog, Messages, RuleError, RunContext};

    #[test]
    fn describe_uses_configured_default_language() {
        let config = Config::parse("default_lang = \"nl\"").unwrap();
        let rules = all_rules();
        assert_eq!(
            describe(rules[0].as_ref(), "fr", &config),
            "Alle secties moeten beginnen met een `h2-6` element."
        );
    }

    #[test]
    fn describe_falls_back_to_summary_without_messages() {
        struct Bare(MessageCatalog);
        impl Rule for Bare {
            fn name(&self) -> &'static str {
                "bare"
            }
            fn description(&self) -> &'static str {
                "Bare rule"
            }
            fn catalog(&self) -> &MessageCatalog {
                &self.0
            }
            fn evaluate(&self, _: &RunContext, _: &dyn Document) -> Result<Option<Finding>, RuleError> {
                Ok(None)
            }
        }
        let bare = Bare(
            MessageCatalog::builder()
                .language("en", Messages::new("english", "fix"))
                .build(),
        );
        let config = Config::parse("default_lang = \"zh\"").unwrap();
        assert_eq!(describe(&bare, "fr", &config), "Bare rule");
    }
}
