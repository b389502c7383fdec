//! # doclint-rules
//!
//! Built-in document-structure rules for doclint.
//!
//! ## Available Rules
//!
//! | Name | Description |
//! |------|-------------|
//! | `no-headingless-sections` | Every `<section>` must start with an `h1`–`h6` element |
//!
//! ## Usage
//!
//! ```ignore
//! use doclint_core::{Linter, RunContext};
//! use doclint_rules::all_rules;
//!
//! let linter = Linter::builder().rules(all_rules()).build()?;
//! let report = linter.run(&doc, &RunContext::for_document(&doc));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_headingless_sections;
mod presets;

pub use no_headingless_sections::NoHeadinglessSections;
pub use presets::{all_rules, rule_by_name};

/// Re-export core types for convenience.
pub use doclint_core::{Finding, Rule};
