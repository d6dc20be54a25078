//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// org-relevance: decides whether an organization fits a search query.
///
/// Gathers facts about the organization with web search, then asks the
/// model for a binary verdict: `1` relevant, `0` not relevant.
#[derive(Parser, Debug)]
#[command(name = "org-relevance")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"Examples:
  org-relevance                                  # Prompt for the query interactively
  org-relevance "сигары, кальянная"              # Classify directly → 0
  org-relevance --format json "еда, фастфуд"     # Label plus gathered facts
  org-relevance init-prompts                     # Write editable prompt templates

Environment:
  OPENAI_API_KEY   reasoning service key (required)
  OPENAI_URL       OpenAI-compatible endpoint override
  TAVILI_API_KEY   search service key (required)
"#)]
pub struct Cli {
    /// Query and organization name, e.g. "футбольный мяч, детский мир".
    ///
    /// Read from standard input when omitted.
    pub query: Vec<String>,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Reasoning model identifier.
    #[arg(long)]
    pub model: Option<String>,

    /// OpenAI-compatible endpoint override.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum search rounds before giving up.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Timeout for one reasoning call, in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum search hits per query.
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Directory with prompt template overrides.
    #[arg(long)]
    pub prompt_dir: Option<PathBuf>,

    /// Classify even if fact gathering does not return valid JSON.
    #[arg(long)]
    pub lenient: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Query given on the command line, if any.
    #[must_use]
    pub fn query_text(&self) -> Option<String> {
        let joined = self.query.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default prompt templates for editing.
    ///
    /// Existing files are left untouched.
    InitPrompts {
        /// Target directory (defaults to ~/.config/org-relevance/prompts).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}
