//! CLI argument parsing via `clap`.

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "wflint",
    version,
    about = "Offline linter for CI workflow files",
    long_about = "wflint — validate CI workflow YAML files offline and fix the mechanically safe problems.\n\nConfiguration precedence: CLI > wflint.toml > defaults.",
    after_help = "Examples:\n  wflint\n  wflint .github/workflows/ci.yml --strict\n  wflint . --fix\n  wflint --json > report.json"
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(help = "File or directory to lint (default: current dir)")]
    pub path: Option<String>,
    #[arg(long, action = ArgAction::SetTrue, help = "Apply fixes and rewrite files in place")]
    pub fix: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Treat warnings as errors and flag trailing whitespace")]
    pub strict: bool,
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "output", help = "Shorthand for --output json")]
    pub json: bool,
    #[arg(long, value_parser = ["human", "json"], help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

impl Cli {
    /// Output mode requested on the command line, if any.
    pub fn output_mode(&self) -> Option<&str> {
        if self.json {
            Some("json")
        } else {
            self.output.as_deref()
        }
    }

    /// Flags only override config when they are set.
    pub fn strict_flag(&self) -> Option<bool> {
        self.strict.then_some(true)
    }

    pub fn fix_flag(&self) -> Option<bool> {
        self.fix.then_some(true)
    }
}
