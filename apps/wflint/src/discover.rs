//! Document discovery.
//!
//! A file resolves to itself. A directory resolves to its direct `*.yml` and
//! `*.yaml` children followed by those under `.github/workflows`, without
//! duplicates. Missing paths resolve to nothing.

use crate::config::CONFIG_FILES;
use crate::error::Result;
use glob::{glob, Pattern};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional location of workflow files below a repository root.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

const EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Resolve `path` to the ordered list of documents to lint.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        debug!(path = %path.display(), "path does not exist");
        return Ok(Vec::new());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut found: IndexSet<PathBuf> = IndexSet::new();
    for dir in [path.to_path_buf(), path.join(WORKFLOWS_DIR)] {
        if dir.is_dir() {
            found.extend(yaml_children(&dir)?);
        }
    }
    debug!(path = %path.display(), count = found.len(), "discovered documents");
    Ok(found.into_iter().collect())
}

/// Direct YAML children of `dir`, sorted, excluding wflint's own config.
fn yaml_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let mut out = Vec::new();
    for ext in EXTENSIONS {
        let pattern = format!("{base}/*.{ext}");
        for entry in glob(&pattern)? {
            match entry {
                Ok(p) if p.is_file() && !is_config_file(&p) => out.push(p),
                Ok(_) => {}
                Err(e) => debug!(error = %e, "skipping unreadable entry"),
            }
        }
    }
    out.sort();
    Ok(out)
}

fn is_config_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| CONFIG_FILES.contains(&n))
}
