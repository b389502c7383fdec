//! End-to-end runs of the built-in rules through the linter.

use doclint_core::{
    resolve, Config, Document, ElementSpec, ElementTree, Linter, RunContext, DEFAULT_LANGUAGE,
};
use doclint_rules::{all_rules, NoHeadinglessSections, Rule};

fn linter() -> Linter {
    Linter::builder()
        .rules(all_rules())
        .build()
        .expect("built-in rules should register")
}

fn section(first_child: Option<&str>) -> ElementSpec {
    match first_child {
        Some(name) => ElementSpec::new("section").child(ElementSpec::new(name)),
        None => ElementSpec::new("section"),
    }
}

fn document(sections: Vec<ElementSpec>) -> ElementTree {
    let body = sections
        .into_iter()
        .fold(ElementSpec::new("body"), ElementSpec::child);
    ElementTree::from_spec(&ElementSpec::new("html").child(body))
}

#[test]
fn compliant_section_gives_empty_report() {
    let doc = document(vec![section(Some("h2"))]);
    let report = linter().run(&doc, &RunContext::for_document(&doc));
    assert!(report.is_clean());
    assert_eq!(report.rules_run, 1);
}

#[test]
fn paragraph_first_is_reported() {
    let doc = document(vec![section(Some("p"))]);
    let sections = doc.query_selector_all("section").unwrap();
    let report = linter().run(&doc, &RunContext::for_document(&doc));

    let finding = report.finding("no-headingless-sections").expect("finding");
    assert_eq!(finding.occurrences(), 1);
    assert_eq!(finding.offending_elements(), sections.as_slice());
}

#[test]
fn empty_section_is_reported() {
    let doc = document(vec![section(None)]);
    let report = linter().run(&doc, &RunContext::for_document(&doc));
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].occurrences(), 1);
}

#[test]
fn only_non_compliant_sections_are_listed() {
    let doc = document(vec![section(Some("h3")), section(Some("div"))]);
    let sections = doc.query_selector_all("section").unwrap();
    let report = linter().run(&doc, &RunContext::for_document(&doc));

    let finding = &report.findings[0];
    assert_eq!(finding.offending_elements(), &[sections[1]]);
    assert_eq!(finding.occurrences(), finding.offending_elements().len());
    assert_eq!(
        doc.element_path(sections[1]),
        "html > body > section:nth-of-type(2)"
    );
}

#[test]
fn unknown_language_falls_back_to_english() {
    let rule = NoHeadinglessSections::new();
    let languages: Vec<&str> = rule.catalog().languages().collect();
    assert_eq!(languages, vec!["en", "nl", "zh"]);

    let messages = resolve("fr", rule.catalog(), DEFAULT_LANGUAGE).unwrap();
    assert_eq!(messages, rule.catalog().get("en").unwrap());
}

#[test]
fn document_language_selects_messages() {
    let spec = ElementSpec::new("html")
        .attr("lang", "nl")
        .child(ElementSpec::new("body").child(section(None)));
    let doc = ElementTree::from_spec(&spec);
    let report = linter().run(&doc, &RunContext::for_document(&doc));
    assert_eq!(
        report.findings[0].description(),
        "Alle secties moeten beginnen met een `h2-6` element."
    );
}

#[test]
fn repeated_runs_are_equal() {
    let doc = document(vec![section(Some("p")), section(None)]);
    let linter = linter();
    let ctx = RunContext::for_document(&doc);
    assert_eq!(linter.run(&doc, &ctx), linter.run(&doc, &ctx));
}

#[test]
fn disabled_by_config() {
    let config = Config::parse("[rules.no-headingless-sections]\nenabled = false").unwrap();
    let linter = Linter::builder()
        .config(config)
        .rules(all_rules())
        .build()
        .unwrap();
    let doc = document(vec![section(None)]);
    let report = linter.run(&doc, &RunContext::default());
    assert!(report.is_clean());
    assert_eq!(report.rules_run, 0);
}

#[test]
fn report_serializes_for_presentation() {
    let doc = document(vec![section(Some("h3")), section(Some("div"))]);
    let report = linter().run(&doc, &RunContext::new("zh"));
    insta::assert_json_snapshot!(report, @r###"
    {
      "findings": [
        {
          "name": "no-headingless-sections",
          "occurrences": 1,
          "offendingElements": [
            4
          ],
          "description": "所有章节（section）都必须以 `h2-6` 元素开头。",
          "howToFix": "将 `h2-6` 添加到有问题的章节或使用 `<div>`。"
        }
      ],
      "rulesRun": 1
    }
    "###);
}
