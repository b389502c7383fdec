//! Shared output formatting for lint reports.

use anyhow::Result;
use doclint_core::{Document, FindingDiagnostic, Report};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, doc: &dyn Document, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, doc),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report, doc),
    }
    Ok(())
}

fn print_text(report: &Report, doc: &dyn Document) {
    for finding in &report.findings {
        let diagnostic = miette::Report::new(FindingDiagnostic::from(finding));
        println!("{diagnostic:?}");
        for node in finding.offending_elements() {
            println!("    at {}", doc.element_path(*node));
        }
        println!();
    }

    for error in &report.errors {
        println!("{:?}", miette::Report::new(error.clone()));
    }

    let summary_color = if report.has_errors() {
        "\x1b[31m"
    } else if report.findings.is_empty() {
        "\x1b[32m"
    } else {
        "\x1b[33m"
    };

    println!(
        "{}Found {} finding(s) with {} occurrence(s), {} rule error(s) from {} rule(s)\x1b[0m",
        summary_color,
        report.findings.len(),
        report.total_occurrences(),
        report.errors.len(),
        report.rules_run
    );
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report, doc: &dyn Document) {
    for finding in &report.findings {
        for node in finding.offending_elements() {
            println!(
                "{}: [{}] {}",
                doc.element_path(*node),
                finding.rule(),
                finding.description()
            );
        }
    }
    for error in &report.errors {
        println!("error: {error}");
    }
}
