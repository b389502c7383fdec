//! # doclint-core
//!
//! Core framework for linting the structure of document trees.
//!
//! This crate provides the foundational traits and types for building
//! document-structure linters. It includes:
//!
//! - [`Document`], the minimal node interface rules query
//! - [`Rule`] trait and the declarative [`SelectorRule`]
//! - [`MessageCatalog`] and [`resolve`] for localized messages
//! - [`Finding`] and [`Report`] for lint results
//! - [`Linter`] for registering rules and running them
//!
//! ## Example
//!
//! ```ignore
//! use doclint_core::{ElementTree, Linter, RunContext};
//!
//! let linter = Linter::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let doc = ElementTree::from_spec(&spec);
//! let report = linter.run(&doc, &RunContext::for_document(&doc));
//! println!("{}", report.format_text(&doc));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod finding;
mod l10n;
mod linter;
mod node;
mod rule;
mod selector;
mod tree;

pub use config::{Config, ConfigError, RuleConfig};
pub use context::RunContext;
pub use finding::{ExecutionFailure, Finding, FindingDiagnostic, Report, RuleExecutionError};
pub use l10n::{
    resolve, ConfigurationError, MessageCatalog, MessageCatalogBuilder, Messages,
    DEFAULT_LANGUAGE,
};
pub use linter::{DuplicateRuleError, Linter, LinterBuilder, RegistryError};
pub use node::{Document, NodeId};
pub use rule::{Rule, RuleBox, RuleError, SelectorRule, ViolationPredicate};
pub use selector::{Selector, SelectorError};
pub use tree::{ElementSpec, ElementTree};
