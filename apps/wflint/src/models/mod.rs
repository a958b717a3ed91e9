//! Shared data models for diagnostics, fixes, and per-document reports.

pub mod node;

use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Severity of a finding. Only `Error` blocks a successful exit.
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// A mechanical edit to a single line.
///
/// Edits operate on the current text of the line, so several fixes that
/// target the same line compose in the order they are applied.
pub enum Fix {
    /// Replace each leading tab with two spaces.
    ExpandTabs,
    /// Remove trailing whitespace.
    TrimTrailing,
    /// Substitute the first occurrence of `from` with `to`.
    Replace { from: String, to: String },
}

impl Fix {
    /// Apply the edit to `line`, returning the corrected text.
    pub fn apply(&self, line: &str) -> String {
        match self {
            Fix::ExpandTabs => {
                let rest = line.trim_start_matches('\t');
                let tabs = line.len() - rest.len();
                format!("{}{}", "  ".repeat(tabs), rest)
            }
            Fix::TrimTrailing => line.trim_end().to_string(),
            Fix::Replace { from, to } => line.replacen(from.as_str(), to, 1),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// A single finding with severity, message, optional 1-indexed line and fix.
pub struct Diagnostic {
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn error(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Error,
            message: message.into(),
            line: None,
            fix: None,
        }
    }

    pub fn warning(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            message: message.into(),
            line: None,
            fix: None,
        }
    }

    pub fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn at_opt(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Serialize, Debug, Clone)]
/// Lint result for one document.
pub struct Report {
    pub path: String,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub fixed: bool,
}

impl Report {
    /// Build a report, tallying diagnostics by severity.
    pub fn new(path: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.len() - errors;
        Self {
            path: path.into(),
            errors,
            warnings,
            diagnostics,
            fixed: false,
        }
    }

    /// Turn every warning into an error (strict mode).
    pub fn promote_warnings(&mut self) {
        for d in &mut self.diagnostics {
            d.severity = Severity::Error;
        }
        self.errors += self.warnings;
        self.warnings = 0;
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Aggregated counts across all linted documents.
pub struct Summary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixed: usize,
}

impl Summary {
    pub fn from_reports(reports: &[Report]) -> Self {
        reports.iter().fold(Summary::default(), |mut s, r| {
            s.files += 1;
            s.errors += r.errors;
            s.warnings += r.warnings;
            if r.fixed {
                s.fixed += 1;
            }
            s
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs_only_touches_leading_run() {
        assert_eq!(Fix::ExpandTabs.apply("\t\tname: a\tb"), "    name: a\tb");
        assert_eq!(Fix::ExpandTabs.apply("name: x"), "name: x");
    }

    #[test]
    fn test_replace_substitutes_first_match() {
        let fix = Fix::Replace {
            from: "actions/checkout@v2".into(),
            to: "actions/checkout@v4".into(),
        };
        assert_eq!(
            fix.apply("      - uses: actions/checkout@v2 # pin"),
            "      - uses: actions/checkout@v4 # pin"
        );
    }

    #[test]
    fn test_report_counts_and_strict_promotion() {
        let diags = vec![
            Diagnostic::error("a", "x"),
            Diagnostic::warning("b", "y"),
            Diagnostic::warning("c", "z"),
        ];
        let mut r = Report::new("w.yml", diags);
        assert_eq!((r.errors, r.warnings), (1, 2));
        r.promote_warnings();
        assert_eq!((r.errors, r.warnings), (3, 0));
        assert!(r.diagnostics.iter().all(Diagnostic::is_error));
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let d = Diagnostic::warning("trailing-whitespace", "trailing whitespace")
            .at(3)
            .with_fix(Fix::TrimTrailing);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["severity"], "warning");
        assert_eq!(v["line"], 3);
        assert_eq!(v["fix"]["kind"], "trim_trailing");
        let bare = serde_json::to_value(Diagnostic::error("missing-jobs", "m")).unwrap();
        assert!(bare.get("line").is_none());
    }
}
