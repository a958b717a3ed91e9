//! Built-in rule tables.

/// Top-level keys recognized in a workflow document.
pub const TOP_LEVEL_KEYS: &[&str] = &[
    "name",
    "run-name",
    "on",
    "permissions",
    "env",
    "defaults",
    "concurrency",
    "jobs",
];

/// Deprecated action references and their recommended replacements.
pub const DEPRECATED_ACTIONS: &[(&str, &str)] = &[
    ("actions/checkout@v1", "actions/checkout@v4"),
    ("actions/checkout@v2", "actions/checkout@v4"),
    ("actions/checkout@v3", "actions/checkout@v4"),
    ("actions/setup-node@v1", "actions/setup-node@v4"),
    ("actions/setup-node@v2", "actions/setup-node@v4"),
    ("actions/setup-node@v3", "actions/setup-node@v4"),
    ("actions/setup-python@v1", "actions/setup-python@v5"),
    ("actions/setup-python@v2", "actions/setup-python@v5"),
    ("actions/setup-python@v3", "actions/setup-python@v5"),
    ("actions/setup-python@v4", "actions/setup-python@v5"),
    ("actions/setup-java@v1", "actions/setup-java@v4"),
    ("actions/setup-java@v2", "actions/setup-java@v4"),
    ("actions/setup-java@v3", "actions/setup-java@v4"),
    ("actions/setup-go@v2", "actions/setup-go@v5"),
    ("actions/setup-go@v3", "actions/setup-go@v5"),
    ("actions/setup-go@v4", "actions/setup-go@v5"),
    ("actions/cache@v1", "actions/cache@v4"),
    ("actions/cache@v2", "actions/cache@v4"),
    ("actions/cache@v3", "actions/cache@v4"),
    ("actions/upload-artifact@v1", "actions/upload-artifact@v4"),
    ("actions/upload-artifact@v2", "actions/upload-artifact@v4"),
    ("actions/upload-artifact@v3", "actions/upload-artifact@v4"),
    ("actions/download-artifact@v1", "actions/download-artifact@v4"),
    ("actions/download-artifact@v2", "actions/download-artifact@v4"),
    ("actions/download-artifact@v3", "actions/download-artifact@v4"),
];

/// Every rule id a diagnostic can carry.
pub const RULE_IDS: &[&str] = &[
    "empty-file",
    "tab-indent",
    "trailing-whitespace",
    "double-colon",
    "missing-trigger",
    "missing-jobs",
    "unknown-top-level-key",
    "deprecated-action",
    "job-missing-runs-on",
    "job-missing-steps",
    "step-missing-action",
    "hardcoded-secret",
    "unpinned-action",
    "unbalanced-parens",
    "unclosed-expression",
    "empty-runs-on",
];
