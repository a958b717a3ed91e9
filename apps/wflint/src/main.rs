//! wflint CLI binary entry point.
//! Resolves config, discovers documents, lints them and prints results.

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use wflint::cli::Cli;
use wflint::lint::{self, EXIT_FAILURE, EXIT_SUCCESS};
use wflint::{config, discover, output, utils};

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_env("WFLINT_LOG").unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let eff = match config::resolve_effective(
        cli.path.as_deref(),
        cli.strict_flag(),
        cli.output_mode(),
        cli.fix_flag(),
    ) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(EXIT_FAILURE);
        }
    };
    if eff.config_path.is_none() {
        tracing::debug!("no wflint config found; using defaults");
    }

    let paths = match discover::discover(&eff.target) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(EXIT_FAILURE);
        }
    };
    if paths.is_empty() {
        eprintln!(
            "{} No workflow files found at {}",
            utils::error_prefix(),
            eff.target.display()
        );
        std::process::exit(EXIT_FAILURE);
    }
    if !eff.is_json() {
        eprintln!(
            "{} Linting {} file(s){}",
            utils::info_prefix(),
            paths.len(),
            if eff.fix { " with --fix" } else { "" }
        );
        if eff.strict {
            eprintln!("{} Strict mode: warnings count as errors.", utils::note_prefix());
        }
    }

    let rules = eff.rule_set();
    let (reports, failures) = lint::run_lint(&paths, &rules, eff.fix);
    output::print_lint(&reports, &eff.output, &failures);

    let code = lint::exit_code(&reports, &failures);
    if code != EXIT_SUCCESS {
        std::process::exit(code);
    }
}
