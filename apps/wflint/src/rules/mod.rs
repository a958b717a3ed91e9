//! Rule engine.
//!
//! Evaluates one document in three fixed passes so output order is stable:
//! 1. `lines`: pre-parse checks over raw lines (tabs, trailing whitespace,
//!    doubled colons).
//! 2. `structure`: checks over the parsed tree plus raw text (required and
//!    unknown top-level keys, job fields, deprecated references).
//! 3. `content`: raw-line pattern checks that do not depend on the tree
//!    (secrets, unpinned actions, expressions, empty `runs-on`).

pub mod content;
pub mod lines;
pub mod structure;
pub mod tables;

use crate::document::Document;
use crate::models::Diagnostic;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// Immutable rule configuration shared by every document of a run.
#[derive(Debug, Clone)]
pub struct RuleSet {
    strict: bool,
    top_level_keys: IndexSet<String>,
    deprecated: IndexMap<String, String>,
    disabled: HashSet<String>,
    patterns: content::Patterns,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RuleSet {
    /// Built-in tables. `strict` enables the trailing-whitespace check.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            top_level_keys: tables::TOP_LEVEL_KEYS.iter().map(|k| k.to_string()).collect(),
            deprecated: tables::DEPRECATED_ACTIONS
                .iter()
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
            disabled: HashSet::new(),
            patterns: content::Patterns::new(),
        }
    }

    pub fn with_top_level_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.top_level_keys.extend(keys);
        self
    }

    pub fn with_deprecated(mut self, refs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.deprecated.extend(refs);
        self
    }

    pub fn with_disabled(mut self, rules: impl IntoIterator<Item = String>) -> Self {
        self.disabled.extend(rules);
        self
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn is_top_level_key(&self, key: &str) -> bool {
        self.top_level_keys.contains(key)
    }

    /// Recommended replacement when `value` is a deprecated reference.
    pub fn replacement_for(&self, value: &str) -> Option<&str> {
        self.deprecated.get(value).map(String::as_str)
    }

    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled.contains(rule)
    }
}

/// Evaluate every rule against `doc`, in detection order.
pub fn evaluate(doc: &Document, rules: &RuleSet) -> Vec<Diagnostic> {
    if doc.is_blank() {
        return vec![Diagnostic::error("empty-file", "file is empty")];
    }
    let lines = doc.lines();
    let mut out = Vec::new();
    lines::check(&lines, rules, &mut out);
    structure::check(&doc.tree, &lines, rules, &mut out);
    content::check(&lines, &rules.patterns, &mut out);
    out.retain(|d| rules.is_enabled(d.rule));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn run(text: &str) -> Vec<Diagnostic> {
        evaluate(&Document::new("ci.yml", text), &RuleSet::default())
    }

    fn errors(diags: &[Diagnostic]) -> Vec<&Diagnostic> {
        diags.iter().filter(|d| d.is_error()).collect()
    }

    const CLEAN: &str = "name: CI
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo test
";

    #[test]
    fn test_clean_workflow_has_no_diagnostics() {
        assert!(run(CLEAN).is_empty());
    }

    #[test]
    fn test_minimal_on_and_jobs_has_no_errors() {
        let diags = run("on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: echo hi\n");
        assert!(errors(&diags).is_empty(), "{diags:?}");
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let text = "on: push\n\tjobs:\nfoo: 1\npassword: \"x\"\n  - uses: actions/checkout@v2\n  run: ${{ f(a }}\n";
        assert_eq!(run(text), run(text));
    }

    #[test]
    fn test_empty_document_reports_only_empty_file() {
        for text in ["", "   \n\t\n", "\n\n"] {
            let diags = run(text);
            assert_eq!(diags.len(), 1);
            assert_eq!(diags[0].severity, Severity::Error);
            assert_eq!(diags[0].message, "file is empty");
        }
    }

    #[test]
    fn test_empty_runs_on_is_single_error() {
        let diags = run("on: push\njobs:\n  build:\n    runs-on:\n    steps:\n      - run: make\n");
        let errs = errors(&diags);
        assert_eq!(errs.len(), 1, "{diags:?}");
        assert!(errs[0].message.contains("empty value"));
        assert_eq!(errs[0].line, Some(4));
    }

    #[test]
    fn test_pass_order_is_lines_then_structure_then_content() {
        let text = "on: push\njobs:\n  a:\n    runs-on: x\n    steps:\n      - uses: actions/checkout@v2\n      - uses: foo/bar\n\t- run: echo\n";
        let rules: Vec<&str> = run(text).iter().map(|d| d.rule).collect();
        assert_eq!(rules, vec!["tab-indent", "deprecated-action", "unpinned-action"]);
    }

    #[test]
    fn test_disabled_rules_are_filtered() {
        let rules = RuleSet::default().with_disabled(["unknown-top-level-key".to_string()]);
        let doc = Document::new("ci.yml", format!("{CLEAN}custom: 1\n"));
        assert!(evaluate(&doc, &rules).is_empty());
    }

    #[test]
    fn test_emitted_rule_ids_match_table() {
        let samples = [
            "",
            "\tjobs:\n",
            "on: push  \n",
            "jobs::\n",
            "on: push
jobs:
  a:
    runs-on: x
    steps:
      - uses: actions/checkout@v2
      - uses: foo/bar
      - name: nothing
        env:
          password: \"x\"
      - run: echo ${{ f(a }}
      - run: echo ${{ github.sha
  b:
    runs-on:
  c:
    name: c
custom: 1
",
        ];
        let rules = RuleSet::new(true);
        let emitted: HashSet<&str> = samples
            .iter()
            .flat_map(|text| evaluate(&Document::new("ci.yml", *text), &rules))
            .map(|d| d.rule)
            .collect();
        let known: HashSet<&str> = tables::RULE_IDS.iter().copied().collect();
        assert_eq!(emitted, known);
    }

    #[test]
    fn test_extra_tables_extend_builtins() {
        let rules = RuleSet::default()
            .with_top_level_keys(["x-meta".to_string()])
            .with_deprecated([("acme/deploy@v1".to_string(), "acme/deploy@v2".to_string())]);
        assert!(rules.is_top_level_key("x-meta"));
        assert!(rules.is_top_level_key("jobs"));
        assert_eq!(rules.replacement_for("acme/deploy@v1"), Some("acme/deploy@v2"));
        assert_eq!(
            rules.replacement_for("actions/checkout@v2"),
            Some("actions/checkout@v4")
        );
    }
}
