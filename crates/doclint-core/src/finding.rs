//! Findings, execution errors and the per-run report.

use crate::l10n::Messages;
use crate::node::{Document, NodeId};
use miette::Diagnostic;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

/// A rule's non-empty result: the offending elements plus localized text.
///
/// Fields are private; `occurrences` is always the number of offending
/// elements. Two findings are equal when they come from the same rule, name
/// the same elements in the same order and carry the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    rule: String,
    offending_elements: Vec<NodeId>,
    messages: Messages,
}

impl Finding {
    /// Creates a finding, or `None` when there is nothing to report.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        offending_elements: Vec<NodeId>,
        messages: Messages,
    ) -> Option<Self> {
        if offending_elements.is_empty() {
            return None;
        }
        Some(Self {
            rule: rule.into(),
            offending_elements,
            messages,
        })
    }

    /// Name of the rule that produced this finding.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Offending elements in document order.
    #[must_use]
    pub fn offending_elements(&self) -> &[NodeId] {
        &self.offending_elements
    }

    /// Number of offending elements.
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.offending_elements.len()
    }

    /// Localized description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.messages.description
    }

    /// Localized fix hint.
    #[must_use]
    pub fn how_to_fix(&self) -> &str {
        &self.messages.how_to_fix
    }

    /// Localized help text, if the chosen language defines one.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.messages.help.as_deref()
    }

    /// All localized fields.
    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Formats the finding for terminal output, resolving element paths.
    #[must_use]
    pub fn format(&self, doc: &dyn Document) -> String {
        use std::fmt::Write;
        let mut output = format!("{} ({} occurrence(s))\n", self.rule, self.occurrences());
        let _ = writeln!(output, "  {}", self.description());
        for node in &self.offending_elements {
            let _ = writeln!(output, "  - {}", doc.element_path(*node));
        }
        let _ = writeln!(output, "  = fix: {}", self.how_to_fix());
        if let Some(help) = self.help() {
            let _ = writeln!(output, "  = help: {help}");
        }
        output
    }
}

/// Keys a serialized [`Finding`] always owns. Extra message fields with
/// these names are not written.
const RESERVED_KEYS: &[&str] = &[
    "name",
    "occurrences",
    "offendingElements",
    "description",
    "howToFix",
    "help",
];

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.rule)?;
        map.serialize_entry("occurrences", &self.occurrences())?;
        map.serialize_entry("offendingElements", &self.offending_elements)?;
        map.serialize_entry("description", &self.messages.description)?;
        map.serialize_entry("howToFix", &self.messages.how_to_fix)?;
        if let Some(help) = &self.messages.help {
            map.serialize_entry("help", help)?;
        }
        for (key, value) in &self.messages.extra {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({} occurrence(s))",
            self.rule,
            self.description(),
            self.occurrences()
        )
    }
}

/// Renders a [`Finding`] through miette, with the fix hint as help.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(severity(Warning))]
pub struct FindingDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&Finding> for FindingDiagnostic {
    fn from(f: &Finding) -> Self {
        let help = match f.help() {
            Some(help) => format!("{}\n{help}", f.how_to_fix()),
            None => f.how_to_fix().to_string(),
        };
        Self {
            message: format!(
                "[{}] {} ({} occurrence(s))",
                f.rule,
                f.description(),
                f.occurrences()
            ),
            help: Some(help),
        }
    }
}

/// Why a rule failed to produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionFailure {
    /// The rule returned an error.
    Failed {
        /// Error message.
        message: String,
    },
    /// The rule panicked.
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },
    /// The rule finished but took longer than its budget.
    BudgetExceeded {
        /// Measured wall-clock time.
        elapsed_ms: u128,
        /// Configured budget.
        budget_ms: u128,
    },
}

impl std::fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed { message } => write!(f, "failed: {message}"),
            Self::Panicked { message } => write!(f, "panicked: {message}"),
            Self::BudgetExceeded {
                elapsed_ms,
                budget_ms,
            } => write!(f, "exceeded budget: {elapsed_ms}ms > {budget_ms}ms"),
        }
    }
}

/// A rule that could not be evaluated. Recorded in the report, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[error("rule `{rule}` {cause}")]
#[diagnostic(code(doclint::rule_execution))]
pub struct RuleExecutionError {
    /// Rule name.
    pub rule: String,
    /// Underlying cause.
    pub cause: ExecutionFailure,
}

/// Ordered findings of one linting run plus its execution errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// One finding per violated rule, in registration order.
    pub findings: Vec<Finding>,
    /// Rules that failed to evaluate, in registration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RuleExecutionError>,
    /// Number of rules evaluated (disabled rules are not counted).
    pub rules_run: usize,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no rule found a violation and no rule failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.errors.is_empty()
    }

    /// True when at least one rule failed to evaluate.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Sum of occurrences across all findings.
    #[must_use]
    pub fn total_occurrences(&self) -> usize {
        self.findings.iter().map(Finding::occurrences).sum()
    }

    /// Returns the finding produced by `rule`, if any.
    #[must_use]
    pub fn finding(&self, rule: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.rule() == rule)
    }

    /// Formats the report as a multi-line human-readable summary.
    #[must_use]
    pub fn format_text(&self, doc: &dyn Document) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for finding in &self.findings {
            let _ = writeln!(report, "{}", finding.format(doc));
        }
        for error in &self.errors {
            let _ = writeln!(report, "error: {error}\n");
        }
        let _ = writeln!(
            report,
            "Found {} finding(s) with {} occurrence(s), {} rule error(s) from {} rule(s)",
            self.findings.len(),
            self.total_occurrences(),
            self.errors.len(),
            self.rules_run
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementTree;

    fn messages() -> Messages {
        Messages::new("All sections must start with a heading.", "Add a heading.")
            .with_help("See developer console.")
    }

    #[test]
    fn empty_offenders_produce_no_finding() {
        assert!(Finding::new("rule", Vec::new(), messages()).is_none());
    }

    #[test]
    fn occurrences_track_offenders() {
        let finding =
            Finding::new("rule", vec![NodeId::new(3), NodeId::new(5)], messages()).unwrap();
        assert_eq!(finding.occurrences(), 2);
        assert_eq!(finding.offending_elements(), &[NodeId::new(3), NodeId::new(5)]);
        assert_eq!(finding.help(), Some("See developer console."));
    }

    #[test]
    fn equality_depends_on_element_sequence() {
        let a = Finding::new("rule", vec![NodeId::new(1), NodeId::new(2)], messages());
        let b = Finding::new("rule", vec![NodeId::new(2), NodeId::new(1)], messages());
        let c = Finding::new("rule", vec![NodeId::new(1), NodeId::new(2)], messages());
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn serializes_flat_with_derived_occurrences() {
        let finding = Finding::new(
            "no-headingless-sections",
            vec![NodeId::new(2)],
            messages().with_field("url", "https://example.org/rules"),
        )
        .unwrap();
        insta::assert_json_snapshot!(finding, @r###"
        {
          "name": "no-headingless-sections",
          "occurrences": 1,
          "offendingElements": [
            2
          ],
          "description": "All sections must start with a heading.",
          "howToFix": "Add a heading.",
          "help": "See developer console.",
          "url": "https://example.org/rules"
        }
        "###);
    }

    #[test]
    fn extra_fields_cannot_shadow_reserved_keys() {
        let finding = Finding::new(
            "real-rule",
            vec![NodeId::new(1)],
            Messages::new("d", "f")
                .with_field("name", "spoofed")
                .with_field("occurrences", "99")
                .with_field("help", "spoofed")
                .with_field("url", "https://example.org"),
        )
        .unwrap();
        let text = serde_json::to_string(&finding).unwrap();
        assert_eq!(text.matches("\"name\"").count(), 1);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["name"], "real-rule");
        assert_eq!(json["occurrences"], 1);
        assert!(json.get("help").is_none());
        assert_eq!(json["url"], "https://example.org");
    }

    #[test]
    fn omits_absent_help() {
        let finding =
            Finding::new("rule", vec![NodeId::new(1)], Messages::new("d", "f")).unwrap();
        let json = serde_json::to_value(&finding).unwrap();
        assert!(json.get("help").is_none());
        assert_eq!(json["occurrences"], 1);
    }

    #[test]
    fn format_lists_element_paths() {
        let mut tree = ElementTree::new("body");
        let section = tree.append(tree.root(), "section");
        let finding = Finding::new("rule", vec![section], messages()).unwrap();
        let text = finding.format(&tree);
        assert!(text.contains("  - body > section"));
        assert!(text.contains("= fix: Add a heading."));
        assert!(text.contains("= help: See developer console."));
    }

    #[test]
    fn diagnostic_carries_fix_as_help() {
        let finding = Finding::new("rule", vec![NodeId::new(1)], Messages::new("d", "f")).unwrap();
        let diagnostic = FindingDiagnostic::from(&finding);
        assert_eq!(diagnostic.to_string(), "[rule] d (1 occurrence(s))");
        assert_eq!(diagnostic.help().map(|h| h.to_string()), Some("f".to_string()));
    }

    #[test]
    fn report_summary() {
        let mut report = Report::new();
        assert!(report.is_clean());
        report.rules_run = 2;
        report
            .findings
            .push(Finding::new("a", vec![NodeId::new(1), NodeId::new(2)], messages()).unwrap());
        report.errors.push(RuleExecutionError {
            rule: "b".into(),
            cause: ExecutionFailure::Panicked {
                message: "boom".into(),
            },
        });
        assert!(!report.is_clean());
        assert!(report.has_errors());
        assert_eq!(report.total_occurrences(), 2);
        assert!(report.finding("a").is_some());
        assert!(report.finding("b").is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rulesRun"], 2);
        assert_eq!(json["errors"][0]["cause"]["kind"], "panicked");

        let tree = ElementTree::new("html");
        let text = report.format_text(&tree);
        assert!(text.contains("error: rule `b` panicked: boom"));
        assert!(text.contains("Found 1 finding(s) with 2 occurrence(s), 1 rule error(s) from 2 rule(s)"));
    }
}
