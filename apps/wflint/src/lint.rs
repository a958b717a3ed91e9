//! Lint runner: evaluates documents, applies fixes and tallies results.
//!
//! Each document's read/evaluate/fix cycle touches only its own text, so
//! documents are processed in parallel and reports are returned in discovery
//! order. A document that cannot be read becomes a failure entry; it never
//! aborts the rest of the run.

use crate::document::Document;
use crate::error::{Result, WflintError};
use crate::fix::FixPlan;
use crate::models::Report;
use crate::rules::{evaluate, RuleSet};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_LINT_ERRORS: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;

/// Evaluate a parsed document into a report.
pub fn lint_document(doc: &Document, rules: &RuleSet) -> Report {
    Report::new(doc.path.to_string_lossy(), evaluate(doc, rules))
}

/// Lint one file, optionally rewriting it with fixes and re-linting.
pub fn lint_path(path: &Path, rules: &RuleSet, fix: bool) -> Result<Report> {
    let doc = Document::load(path)?;
    let report = lint_document(&doc, rules);
    if !fix {
        return Ok(report);
    }
    let plan = FixPlan::new(&report.diagnostics);
    if plan.is_empty() {
        return Ok(report);
    }
    let fixed = plan.apply(&doc.text);
    if fixed == doc.text {
        return Ok(report);
    }
    write_replacing(path, &fixed)?;
    info!(path = %path.display(), edits = plan.len(), "applied fixes");
    let mut relinted = lint_document(&Document::new(path, fixed), rules);
    relinted.fixed = true;
    Ok(relinted)
}

/// Lint every path. Strict mode promotes warnings after evaluation.
///
/// Returns reports for readable documents and errors for the rest, both in
/// input order.
pub fn run_lint(paths: &[PathBuf], rules: &RuleSet, fix: bool) -> (Vec<Report>, Vec<WflintError>) {
    let results: Vec<Result<Report>> = paths
        .par_iter()
        .map(|p| {
            debug!(path = %p.display(), "linting");
            lint_path(p, rules, fix)
        })
        .collect();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for res in results {
        match res {
            Ok(mut r) => {
                if rules.strict() {
                    r.promote_warnings();
                }
                reports.push(r);
            }
            Err(e) => failures.push(e),
        }
    }
    (reports, failures)
}

/// Exit code for a finished run.
pub fn exit_code(reports: &[Report], failures: &[WflintError]) -> i32 {
    if !failures.is_empty() {
        EXIT_FAILURE
    } else if reports.iter().any(|r| r.errors > 0) {
        EXIT_LINT_ERRORS
    } else {
        EXIT_SUCCESS
    }
}

/// Write `text` to a sibling temp file and rename it over `path`.
fn write_replacing(path: &Path, text: &str) -> Result<()> {
    let tmp = match path.file_name() {
        Some(name) => path.with_file_name(format!(".{}.wflint-tmp", name.to_string_lossy())),
        None => path.with_extension("wflint-tmp"),
    };
    let wrap = |source| WflintError::Write {
        path: path.to_path_buf(),
        source,
    };
    let permissions = fs::metadata(path).map_err(wrap)?.permissions();
    fs::write(&tmp, text).map_err(wrap)?;
    fs::set_permissions(&tmp, permissions)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp);
            wrap(e)
        })
}
