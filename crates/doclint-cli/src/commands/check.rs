//! Check command implementation.

use anyhow::{Context, Result};
use doclint_core::{Linter, RuleBox, RunContext};
use doclint_rules::{all_rules, rule_by_name};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    document: &Path,
    format: OutputFormat,
    lang: Option<String>,
    rules_filter: Option<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load().context("Failed to load config")?;
    let doc = crate::document::load(document)?;

    let rules = match rules_filter {
        Some(filter) => filter_rules(&filter),
        None => all_rules(),
    };

    let requested = lang.or_else(|| config.lang.clone());
    let default_lang = config.default_lang.clone();

    let linter = Linter::builder()
        .config(config)
        .rules(rules)
        .build()
        .context("Failed to register rules")?;

    let ctx = match requested {
        Some(lang) => RunContext::new(lang),
        None => RunContext::for_document(&doc),
    }
    .with_default_lang(default_lang)
    .with_metadata("source", document.display().to_string());

    tracing::info!(
        "Linting {} with {} rule(s)",
        document.display(),
        linter.rule_count()
    );

    let report = linter.run(&doc, &ctx);
    super::output::print(&report, &doc, format)?;

    if !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}

fn filter_rules(filter: &str) -> Vec<RuleBox> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let rule = rule_by_name(name);
            if rule.is_none() {
                tracing::warn!("Unknown rule: {}", name);
            }
            rule
        })
        .collect()
}
