//! doclint CLI tool.
//!
//! Usage:
//! ```bash
//! doclint check [OPTIONS] <DOCUMENT>
//! doclint list-rules
//! doclint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod document;

/// Structural linter for document trees
#[derive(Parser)]
#[command(name = "doclint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a document tree (JSON, see `ElementSpec`)
    Check {
        /// Document to lint
        document: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Message language (default: config, then the document's `lang`)
        #[arg(short, long, env = "DOCLINT_LANG")]
        lang: Option<String>,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,
    },

    /// List available rules
    ListRules {
        /// Language for rule descriptions (default: config, then its `default_lang`)
        #[arg(short, long, env = "DOCLINT_LANG")]
        lang: Option<String>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            document,
            format,
            lang,
            rules,
        } => {
            let base = document
                .parent()
                .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf);
            let source = config_resolver::resolve(&base, cli.config.as_deref());
            commands::check::run(&document, format, lang, rules, &source)
        }
        Commands::ListRules { lang } => {
            let source = config_resolver::resolve(std::path::Path::new("."), cli.config.as_deref());
            commands::list_rules::run(lang, &source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
