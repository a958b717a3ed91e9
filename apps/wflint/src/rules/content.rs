//! Raw-line pattern checks.
//!
//! These run on every line regardless of how well the tree parsed. They are
//! heuristics: the secret check can miss obfuscated literals and flag
//! harmless quoted values, and expressions are inspected one line at a time.

use crate::models::Diagnostic;
use crate::parser::{indent_of, key_value};
use regex::Regex;

/// Lines searched after an unclosed `${{` for its closing `}}`.
const EXPRESSION_WINDOW: usize = 4;

/// Compiled patterns for the content checks.
#[derive(Debug, Clone)]
pub struct Patterns {
    secret: Regex,
    expression: Regex,
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

impl Patterns {
    #[must_use]
    pub fn new() -> Self {
        Self {
            secret: Regex::new(r#"(?i)(password|token|secret)[\w-]*\s*[:=]\s*("[^"]+"|'[^']+')"#)
                .expect("Invalid regex"),
            expression: Regex::new(r"\$\{\{(.*?)\}\}").expect("Invalid regex"),
        }
    }
}

/// Run every content check over `lines`, in line order.
pub fn check(lines: &[&str], patterns: &Patterns, out: &mut Vec<Diagnostic>) {
    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        if is_hardcoded_secret(line, patterns) {
            out.push(
                Diagnostic::error(
                    "hardcoded-secret",
                    "possible hardcoded secret; reference it as `${{ secrets.NAME }}` instead",
                )
                .at(n),
            );
        }
        if let Some(action) = unpinned_action(line) {
            out.push(
                Diagnostic::error(
                    "unpinned-action",
                    format!("`{action}` is not pinned to a version; use `{action}@<ref>`"),
                )
                .at(n),
            );
        }
        for expr in patterns.expression.captures_iter(line) {
            let inner = expr.get(1).map_or("", |m| m.as_str());
            if inner.matches('(').count() != inner.matches(')').count() {
                let text = expr.get(0).map_or("", |m| m.as_str());
                out.push(
                    Diagnostic::error(
                        "unbalanced-parens",
                        format!("unbalanced parentheses in expression `{text}`"),
                    )
                    .at(n),
                );
            }
        }
        if line.contains("${{") && !line.contains("}}") && !closes_later(&lines[n..]) {
            out.push(
                Diagnostic::error(
                    "unclosed-expression",
                    "expression opened with `${{` is never closed with `}}`",
                )
                .at(n),
            );
        }
        if is_empty_runs_on(line, &lines[n..]) {
            out.push(Diagnostic::error("empty-runs-on", "`runs-on` has an empty value").at(n));
        }
    }
}

/// Quoted literal assigned to a password/token/secret-like key.
fn is_hardcoded_secret(line: &str, patterns: &Patterns) -> bool {
    !line.contains("${{") && !line.contains("secrets.") && patterns.secret.is_match(line)
}

fn unpinned_action(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("- ").unwrap_or(trimmed).trim_start();
    if !trimmed.starts_with("uses:") {
        return None;
    }
    let (_, value) = key_value(trimmed)?;
    let local = value.starts_with('.') || value.starts_with("docker://");
    (!value.is_empty() && !local && !value.contains('@')).then_some(value)
}

fn closes_later(rest: &[&str]) -> bool {
    rest.iter().take(EXPRESSION_WINDOW).any(|l| l.contains("}}"))
}

/// `runs-on:` with nothing after the colon and no indented block beneath it.
fn is_empty_runs_on(line: &str, rest: &[&str]) -> bool {
    if !matches!(key_value(line), Some(("runs-on", ""))) {
        return false;
    }
    let indent = indent_of(line);
    let next = rest.iter().find(|l| {
        let t = l.trim();
        !t.is_empty() && !t.starts_with('#')
    });
    next.map_or(true, |l| indent_of(l) <= indent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<Diagnostic> {
        let lines: Vec<&str> = text.lines().collect();
        let mut out = Vec::new();
        check(&lines, &Patterns::new(), &mut out);
        out
    }

    #[test]
    fn test_hardcoded_secret_literal() {
        let out = run("password: \"hunter2\"\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, "hardcoded-secret");
        assert!(out[0].is_error());
        assert!(run("      API_TOKEN: 'abc123'\n").len() == 1);
    }

    #[test]
    fn test_secret_references_are_allowed() {
        assert!(run("password: ${{ secrets.PW }}\n").is_empty());
        assert!(run("token: \"${{ github.token }}\"\n").is_empty());
        assert!(run("secret: \"\"\n").is_empty());
        assert!(run("token: from-env\n").is_empty());
    }

    #[test]
    fn test_unpinned_action() {
        let out = run("      - uses: actions/checkout\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, "unpinned-action");
        assert!(out[0].message.contains("actions/checkout"));
        for ok in [
            "  - uses: actions/checkout@v4",
            "  - uses: ./.github/actions/local",
            "  - uses: docker://alpine:3.19",
            "    uses: \"org/repo@main\"",
        ] {
            assert!(run(ok).is_empty(), "{ok}");
        }
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let out = run("if: ${{ foo(bar }}\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, "unbalanced-parens");
        assert!(out[0].message.contains("${{ foo(bar }}"));
        assert!(run("if: ${{ foo(bar) }}\n").is_empty());
    }

    #[test]
    fn test_unclosed_expression_window() {
        let out = run("run: echo ${{ github.sha\nx: 1\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, "unclosed-expression");
        assert_eq!(out[0].line, Some(1));
        assert!(run("run: echo ${{\n  a\n  b\n  c }}\n").is_empty());
        let far = "run: echo ${{\n1\n2\n3\n4\n}}\n";
        assert_eq!(run(far).len(), 1);
    }

    #[test]
    fn test_empty_runs_on() {
        let out = run("    runs-on:\n    steps:\n");
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("empty value"));
        assert!(run("    runs-on: ubuntu-latest\n").is_empty());
        assert!(run("    runs-on:\n      - self-hosted\n").is_empty());
        assert_eq!(run("    runs-on:   \n").len(), 1);
    }
}
