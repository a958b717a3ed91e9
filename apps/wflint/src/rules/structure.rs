//! Checks over the parsed tree, located back onto raw lines.

use super::RuleSet;
use crate::models::node::Node;
use crate::models::{Diagnostic, Fix};
use crate::parser::{indent_of, key_value};

/// Required and unknown top-level keys, job fields and deprecated references.
pub fn check(tree: &Node, lines: &[&str], rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    if !tree.contains_key("on") {
        out.push(Diagnostic::error(
            "missing-trigger",
            "missing required top-level key `on` (workflow trigger)",
        ));
    }
    if !tree.contains_key("jobs") {
        out.push(Diagnostic::error(
            "missing-jobs",
            "missing required top-level key `jobs`",
        ));
    }
    if let Some(map) = tree.as_mapping() {
        for key in map.keys().filter(|k| !rules.is_top_level_key(k)) {
            out.push(
                Diagnostic::warning("unknown-top-level-key", format!("unknown top-level key `{key}`"))
                    .at_opt(top_level_line(lines, key)),
            );
        }
    }
    if let Some(jobs) = tree.get("jobs") {
        check_jobs(jobs, lines, out);
    }
    check_deprecated(lines, rules, out);
}

/// First line starting with `key:` at column 0, quoted or not.
fn top_level_line(lines: &[&str], key: &str) -> Option<usize> {
    let candidates = [
        format!("{key}:"),
        format!("\"{key}\":"),
        format!("'{key}':"),
    ];
    lines
        .iter()
        .position(|l| candidates.iter().any(|c| l.starts_with(c.as_str())))
        .map(|i| i + 1)
}

/// Non-blank, non-comment lines with their 0-based index.
fn content_lines<'a>(lines: &'a [&'a str], from: usize) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    lines.iter().enumerate().skip(from).filter_map(|(i, l)| {
        let t = l.trim();
        (!t.is_empty() && !t.starts_with('#')).then_some((i, *l))
    })
}

/// Line of job `name`: a key at the column of the first child of `jobs:`,
/// before the next line at column 0.
fn job_line(lines: &[&str], name: &str) -> Option<usize> {
    let start = top_level_line(lines, "jobs")?;
    let mut body = content_lines(lines, start).take_while(|(_, l)| indent_of(l) > 0);
    let (first, line) = body.next()?;
    let column = indent_of(line);
    std::iter::once((first, line))
        .chain(body)
        .filter(|(_, l)| indent_of(l) == column)
        .find(|(_, l)| key_value(l).is_some_and(|(k, _)| k == name))
        .map(|(i, _)| i + 1)
}

/// Lines of the `- ` items under the `steps:` key of the job at `job`.
fn step_lines(lines: &[&str], job: usize) -> Vec<usize> {
    let job_indent = lines.get(job - 1).map_or(0, |l| indent_of(l));
    let mut body = content_lines(lines, job).take_while(|(_, l)| indent_of(l) > job_indent);
    let Some(steps_indent) = body.find_map(|(_, l)| {
        let is_steps = !l.trim_start().starts_with('-') && key_value(l).is_some_and(|(k, _)| k == "steps");
        is_steps.then(|| indent_of(l))
    }) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut column = None;
    for (i, l) in body {
        let indent = indent_of(l);
        let is_item = l.trim_start().starts_with('-');
        let item_column = *column.get_or_insert(indent);
        if indent < steps_indent || indent < item_column || (indent == item_column && !is_item) {
            break;
        }
        if indent == item_column {
            out.push(i + 1);
        }
    }
    out
}

fn check_jobs(jobs: &Node, lines: &[&str], out: &mut Vec<Diagnostic>) {
    let Some(jobs) = jobs.as_mapping() else {
        return;
    };
    for (name, job) in jobs {
        let Some(fields) = job.as_mapping() else {
            continue;
        };
        // Reusable workflow calls take neither runs-on nor steps.
        if fields.contains_key("uses") {
            continue;
        }
        let line = job_line(lines, name);
        let steps_at = line.map(|l| step_lines(lines, l)).unwrap_or_default();
        if !fields.contains_key("runs-on") {
            out.push(
                Diagnostic::warning("job-missing-runs-on", format!("job `{name}` is missing `runs-on`"))
                    .at_opt(line),
            );
        }
        match fields.get("steps").and_then(Node::as_sequence) {
            None => out.push(
                Diagnostic::warning("job-missing-steps", format!("job `{name}` has no `steps`"))
                    .at_opt(line),
            ),
            Some(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    let Some(step) = step.as_mapping() else {
                        continue;
                    };
                    if !step.contains_key("uses") && !step.contains_key("run") {
                        out.push(
                            Diagnostic::warning(
                                "step-missing-action",
                                format!("step {} of job `{name}` has neither `uses` nor `run`", i + 1),
                            )
                            .at_opt(steps_at.get(i).copied().or(line)),
                        );
                    }
                }
            }
        }
    }
}

fn check_deprecated(lines: &[&str], rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    for (idx, line) in lines.iter().enumerate() {
        let Some((_, value)) = key_value(line) else {
            continue;
        };
        let Some(replacement) = rules.replacement_for(value) else {
            continue;
        };
        out.push(
            Diagnostic::warning(
                "deprecated-action",
                format!("`{value}` is deprecated; use `{replacement}`"),
            )
            .at(idx + 1)
            .with_fix(Fix::Replace {
                from: value.to_string(),
                to: replacement.to_string(),
            }),
        );
    }
}
