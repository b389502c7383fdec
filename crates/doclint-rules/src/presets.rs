//! Rule sets for front ends.

use crate::NoHeadinglessSections;
use doclint_core::RuleBox;

/// Returns all built-in rules in their canonical order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(NoHeadinglessSections::new())]
}

/// Returns the built-in rule called `name`.
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    all_rules().into_iter().find(|rule| rule.name() == name)
}
