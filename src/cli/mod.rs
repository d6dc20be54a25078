//! CLI layer for org-relevance.
//!
//! Provides the command-line interface using clap: classify one query,
//! or scaffold prompt templates.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
