//! Configuration discovery and effective settings resolution.
//!
//! wflint reads `wflint.toml|yaml|yml` from the closest ancestor of the
//! target path that has one (stopping at a `.git` directory) and merges it
//! with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `strict`: false
//! - `output`: `human`
//! - `fix`: false
//! - `rules.extra_top_level_keys`, `rules.disable`, `deprecated`: empty
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Result, WflintError};
use crate::rules::tables::RULE_IDS;
use crate::rules::RuleSet;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file names, in lookup order.
pub const CONFIG_FILES: &[&str] = &["wflint.toml", "wflint.yaml", "wflint.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Rule tuning under `[rules]`.
pub struct RulesCfg {
    #[serde(default)]
    pub extra_top_level_keys: Vec<String>,
    #[serde(default)]
    pub disable: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `wflint.toml|yaml`.
pub struct WflintConfig {
    pub strict: Option<bool>,
    pub output: Option<String>,
    pub fix: Option<bool>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
    /// Extra deprecated references: `"old@v1" = "old@v2"`.
    #[serde(default)]
    pub deprecated: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the run after applying precedence.
pub struct Effective {
    pub target: PathBuf,
    pub config_path: Option<PathBuf>,
    pub strict: bool,
    pub output: String,
    pub fix: bool,
    pub extra_top_level_keys: Vec<String>,
    pub disabled: Vec<String>,
    pub deprecated: IndexMap<String, String>,
}

impl Effective {
    /// Build the immutable rule set for this run.
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(self.strict)
            .with_top_level_keys(self.extra_top_level_keys.iter().cloned())
            .with_deprecated(self.deprecated.clone())
            .with_disabled(self.disabled.iter().cloned())
    }

    pub fn is_json(&self) -> bool {
        self.output == "json"
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `wflint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let start = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).is_file()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `WflintConfig` from the first config file present under `root`.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, WflintConfig)>> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| WflintError::Read {
            path: path.clone(),
            source,
        })?;
        let cfg = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|source| WflintError::ConfigToml {
                path: path.clone(),
                source,
            })?
        } else {
            serde_yaml::from_str(&s).map_err(|source| WflintError::ConfigYaml {
                path: path.clone(),
                source,
            })?
        };
        debug!(path = %path.display(), "loaded config");
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_path: Option<&str>,
    cli_strict: Option<bool>,
    cli_output: Option<&str>,
    cli_fix: Option<bool>,
) -> Result<Effective> {
    let target = PathBuf::from(cli_path.unwrap_or("."));
    let repo_root = detect_repo_root(&target);
    let (config_path, cfg) = match load_config(&repo_root)? {
        Some((p, c)) => (Some(p), c),
        None => (None, WflintConfig::default()),
    };

    let strict = cli_strict.or(cfg.strict).unwrap_or(false);
    let fix = cli_fix.or(cfg.fix).unwrap_or(false);
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let rules = cfg.rules.unwrap_or_default();
    for id in rules.disable.iter().filter(|id| !RULE_IDS.contains(&id.as_str())) {
        warn!(rule = %id, "ignoring unknown rule id in `rules.disable`");
    }

    Ok(Effective {
        target,
        config_path,
        strict,
        output,
        fix,
        extra_top_level_keys: rules.extra_top_level_keys,
        disabled: rules.disable,
        deprecated: cfg.deprecated.unwrap_or_default(),
    })
}
