//! Output rendering for lint reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-document reports, a top-level summary and any read/write failures.

use crate::error::WflintError;
use crate::models::{Report, Severity, Summary};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

/// Render `path` relative to the current directory when possible.
pub fn display_path(path: &str) -> String {
    let p = Path::new(path);
    if p.is_relative() {
        return path.to_string();
    }
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(p, cwd))
        .filter(|rel| !rel.as_os_str().is_empty() && !rel.starts_with(".."))
        .map(|rel| rel.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Print lint results in the requested format.
pub fn print_lint(reports: &[Report], output: &str, failures: &[WflintError]) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_lint_json(reports, failures)) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("{} {e}", crate::utils::error_prefix()),
        },
        _ => {
            for line in compose_human(reports, use_colors(output)) {
                println!("{line}");
            }
            for f in failures {
                eprintln!("{} {}", crate::utils::error_prefix(), describe_failure(f));
            }
        }
    }
}

/// Human-readable lines (pure) for testing.
pub fn compose_human(reports: &[Report], color: bool) -> Vec<String> {
    let mut out = Vec::new();
    for r in reports {
        let file = display_path(&r.path);
        if r.fixed {
            if color {
                out.push(format!("{} {}", "✏️  fixed:".green().bold(), file.bold()));
            } else {
                out.push(format!("✏️  fixed: {file}"));
            }
        }
        for d in &r.diagnostics {
            let (icon, sev) = match d.severity {
                Severity::Error => ("✖", "⟦error⟧"),
                Severity::Warning => ("▲", "⟦warn⟧"),
            };
            let loc = match d.line {
                Some(n) => format!("{file}:{n}"),
                None => file.clone(),
            };
            if color {
                let (icon, sev) = match d.severity {
                    Severity::Error => (icon.red().to_string(), sev.red().bold().to_string()),
                    Severity::Warning => (icon.yellow().to_string(), sev.yellow().bold().to_string()),
                };
                out.push(format!("{icon} {sev} {} ❲{}❳ — {}", loc.bold(), d.rule, d.message));
            } else {
                out.push(format!("{icon} {sev} {loc} ❲{}❳ — {}", d.rule, d.message));
            }
        }
    }
    let s = Summary::from_reports(reports);
    let summary = format!(
        "— Summary — errors={} warnings={} files={} fixed={}",
        s.errors, s.warnings, s.files, s.fixed
    );
    if color {
        out.push(summary.bold().to_string());
    } else {
        out.push(summary);
    }
    out
}

fn describe_failure(f: &WflintError) -> String {
    match std::error::Error::source(f) {
        Some(src) => format!("{f}: {src}"),
        None => f.to_string(),
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(reports: &[Report], failures: &[WflintError]) -> JsonVal {
    let items: Vec<JsonVal> = reports
        .iter()
        .map(|r| {
            let mut v = serde_json::to_value(r).unwrap_or(JsonVal::Null);
            v["path"] = json!(display_path(&r.path));
            v
        })
        .collect();
    let failures: Vec<JsonVal> = failures
        .iter()
        .map(|f| {
            json!({
                "path": f.path().map(|p| display_path(&p.to_string_lossy())),
                "message": describe_failure(f),
            })
        })
        .collect();
    json!({
        "reports": items,
        "summary": Summary::from_reports(reports),
        "failures": failures,
    })
}
