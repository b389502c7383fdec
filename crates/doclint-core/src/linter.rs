//! Rule registry and runner.

use crate::config::Config;
use crate::context::RunContext;
use crate::finding::{ExecutionFailure, Finding, Report, RuleExecutionError};
use crate::l10n::ConfigurationError;
use crate::node::Document;
use crate::rule::{Rule, RuleBox};

use miette::Diagnostic;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A rule with the same name is already registered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("rule `{name}` is already registered")]
#[diagnostic(
    code(doclint::duplicate_rule),
    help("rule names must be unique; the first registration stays active")
)]
pub struct DuplicateRuleError {
    /// The conflicting name.
    pub name: String,
}

/// Errors raised while registering a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    /// Duplicate rule name.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Duplicate(#[from] DuplicateRuleError),

    /// The rule's catalog lacks the default language.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = RuleBox>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the linter, registering rules in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] encountered.
    pub fn build(self) -> Result<Linter, RegistryError> {
        let mut linter = Linter::new(self.config.unwrap_or_default());
        for rule in self.rules {
            linter.register(rule)?;
        }
        Ok(linter)
    }
}

/// Holds registered rules and runs them against documents.
///
/// Rules run in registration order and the report keeps that order,
/// whether evaluation is sequential or parallel.
pub struct Linter {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("rules", &self.rule_names())
            .field("config", &self.config)
            .finish()
    }
}

impl Linter {
    /// Creates an empty linter.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rules: Vec::new(),
            config,
        }
    }

    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns registered rule names in registration order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Adds a rule to the active set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken (the earlier
    /// rule stays registered) and [`RegistryError::Configuration`] if the
    /// rule's catalog lacks the configured default language.
    pub fn register(&mut self, rule: RuleBox) -> Result<(), RegistryError> {
        let name = rule.name();
        if self.rules.iter().any(|r| r.name() == name) {
            return Err(DuplicateRuleError {
                name: name.to_string(),
            }
            .into());
        }
        rule.catalog()
            .validate(&self.config.default_lang)
            .map_err(|e| e.for_rule(name))?;

        debug!("Registered rule: {}", name);
        self.rules.push(rule);
        Ok(())
    }

    /// Runs every enabled rule against `doc`.
    ///
    /// Never fails: a rule that errors, panics or overruns its budget is
    /// recorded in [`Report::errors`] and the remaining rules still run.
    ///
    /// Rules fall back to the configured `default_lang`, the language every
    /// catalog was checked against at registration; `ctx.default_lang` is
    /// overridden when it differs.
    #[must_use]
    pub fn run(&self, doc: &dyn Document, ctx: &RunContext) -> Report {
        let ctx = &self.context_for(ctx);
        let active: Vec<&dyn Rule> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .map(|rule| &**rule)
            .collect();

        info!(
            "Running {} rule(s) (lang: {}, parallel: {})",
            active.len(),
            ctx.lang,
            self.config.parallel
        );

        let budget = self.config.rule_budget();
        let outcomes: Vec<Outcome> = if self.config.parallel {
            active
                .par_iter()
                .map(|rule| evaluate(*rule, doc, ctx, budget))
                .collect()
        } else {
            active
                .iter()
                .map(|rule| evaluate(*rule, doc, ctx, budget))
                .collect()
        };

        let mut report = Report::new();
        report.rules_run = active.len();
        for outcome in outcomes {
            match outcome {
                Ok(Some(finding)) => report.findings.push(finding),
                Ok(None) => {}
                Err(error) => {
                    warn!("{}", error);
                    report.errors.push(error);
                }
            }
        }

        info!(
            "Lint complete: {} finding(s), {} occurrence(s), {} rule error(s)",
            report.findings.len(),
            report.total_occurrences(),
            report.errors.len()
        );

        report
    }

    fn context_for(&self, ctx: &RunContext) -> RunContext {
        let default_lang = &self.config.default_lang;
        if &ctx.default_lang != default_lang {
            debug!(
                "Using configured default language {} instead of {}",
                default_lang, ctx.default_lang
            );
        }
        ctx.clone().with_default_lang(default_lang.clone())
    }
}

type Outcome = Result<Option<Finding>, RuleExecutionError>;

/// Evaluates one rule, turning errors, panics and overruns into data.
fn evaluate(
    rule: &dyn Rule,
    doc: &dyn Document,
    ctx: &RunContext,
    budget: Option<Duration>,
) -> Outcome {
    let name = rule.name();
    debug!("Evaluating rule: {}", name);

    let started = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx, doc)));
    let elapsed = started.elapsed();

    let failure = |cause| RuleExecutionError {
        rule: name.to_string(),
        cause,
    };

    let finding = match result {
        Ok(Ok(finding)) => finding,
        Ok(Err(e)) => {
            return Err(failure(ExecutionFailure::Failed {
                message: e.to_string(),
            }))
        }
        Err(payload) => {
            return Err(failure(ExecutionFailure::Panicked {
                message: panic_message(payload.as_ref()),
            }))
        }
    };

    if let Some(budget) = budget {
        if elapsed > budget {
            return Err(failure(ExecutionFailure::BudgetExceeded {
                elapsed_ms: elapsed.as_millis(),
                budget_ms: budget.as_millis(),
            }));
        }
    }

    debug!(
        "Rule {} finished in {:?}: {} occurrence(s)",
        name,
        elapsed,
        finding.as_ref().map_or(0, Finding::occurrences)
    );
    Ok(finding)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
