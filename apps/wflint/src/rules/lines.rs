//! Pre-parse checks over raw lines.

use super::RuleSet;
use crate::models::{Diagnostic, Fix};
use crate::parser::indent_of;

/// Tab indentation, trailing whitespace (strict only) and `key::` typos.
///
/// Block-scalar bodies are exempt from the typo check. A body starts after a
/// line ending in `|` or `>` and ends at the next non-blank line at column 0.
pub fn check(lines: &[&str], rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    let mut in_block = false;
    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        let trimmed = line.trim();
        if in_block && !trimmed.is_empty() && indent_of(line) == 0 {
            in_block = false;
        }

        if line.starts_with('\t') {
            out.push(
                Diagnostic::error("tab-indent", "tab character used for indentation")
                    .at(n)
                    .with_fix(Fix::ExpandTabs),
            );
        }
        if rules.strict() && line.len() != line.trim_end().len() {
            out.push(
                Diagnostic::warning("trailing-whitespace", "trailing whitespace")
                    .at(n)
                    .with_fix(Fix::TrimTrailing),
            );
        }
        if !in_block {
            if let Some(key) = doubled_colon_key(trimmed) {
                out.push(
                    Diagnostic::error(
                        "double-colon",
                        format!("`{key}::` has a doubled colon; did you mean `{key}:`?"),
                    )
                    .at(n),
                );
            }
        }

        if opens_block_scalar(trimmed) {
            in_block = true;
        }
    }
}

/// `key::` (optionally followed by a value) with no other colon on the line.
fn doubled_colon_key(trimmed: &str) -> Option<&str> {
    let text = trimmed.strip_prefix("- ").unwrap_or(trimmed);
    let (key, _) = text.split_once("::")?;
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    (plain && text.matches(':').count() == 2).then_some(key)
}

fn opens_block_scalar(trimmed: &str) -> bool {
    let Some(last) = trimmed.split_whitespace().last() else {
        return false;
    };
    let mut chars = last.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| matches!(c, '+' | '-' | '1'..='9'))
        && trimmed.len() > last.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, strict: bool) -> Vec<Diagnostic> {
        let lines: Vec<&str> = text.lines().collect();
        let mut out = Vec::new();
        check(&lines, &RuleSet::new(strict), &mut out);
        out
    }

    #[test]
    fn test_tab_indentation_is_error_with_fix() {
        let out = run("on: push\n\tjobs:\n", false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, "tab-indent");
        assert_eq!(out[0].line, Some(2));
        assert_eq!(out[0].fix, Some(Fix::ExpandTabs));
    }

    #[test]
    fn test_trailing_whitespace_only_in_strict_mode() {
        assert!(run("on: push  \n", false).is_empty());
        let out = run("on: push  \njobs:\n", true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rule, "trailing-whitespace");
        assert_eq!(out[0].line, Some(1));
        assert!(!out[0].is_error());
    }

    #[test]
    fn test_doubled_colon() {
        let out = run("jobs::\n  build:\n    name:: x\n", false);
        assert_eq!(out.len(), 2);
        assert!(out[0].message.contains("`jobs::`"));
        assert_eq!(out[1].line, Some(3));
        assert!(out.iter().all(|d| d.fix.is_none()));
        assert!(run("image: ghcr.io/a::b:c\n", false).is_empty());
        assert!(run("run: std::process\n", false).is_empty());
    }

    #[test]
    fn test_block_scalar_bodies_skip_doubled_colon_until_column_zero() {
        let text = "jobs:\n  a:\n    steps:\n      - run: |\n          foo::\n      - run: >-\n          bar::\nbaz::\n";
        let out = run(text, false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].line, Some(8));
    }
}
