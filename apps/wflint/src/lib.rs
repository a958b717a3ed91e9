//! wflint core library.
//!
//! This crate exposes programmatic APIs for linting CI workflow files and
//! fixing the mechanically safe subset of what it finds.
//!
//! High-level modules:
//! - `parser`: Best-effort structural parser producing a `Node` tree.
//! - `rules`: Rule engine (line, structure and content passes).
//! - `fix`: Applies fix payloads carried by diagnostics.
//! - `lint`: Runs the engine over documents, with optional fixing.
//! - `discover`: Resolves a path to the documents to lint.
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Diagnostics, fixes, reports and the node tree.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
pub mod cli;
pub mod config;
pub mod discover;
pub mod document;
pub mod error;
pub mod fix;
pub mod lint;
pub mod models;
pub mod output;
pub mod parser;
pub mod rules;
pub mod utils;

pub use document::Document;
pub use error::{Result, WflintError};
pub use models::{Diagnostic, Fix, Report, Severity};
pub use rules::{evaluate, RuleSet};
