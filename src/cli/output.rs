//! Output formatting for CLI results.

use std::path::PathBuf;

use serde_json::json;

use crate::agent::ClassificationOutcome;
use crate::error::CommandError;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The bare label.
    Text,
    /// Label with gathered facts and run statistics.
    Json,
}

impl OutputFormat {
    /// Parses a format name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownFormat`] for anything but `text` or `json`.
    pub fn parse(s: &str) -> Result<Self, CommandError> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(CommandError::UnknownFormat(s.to_string())),
        }
    }
}

/// Formats a classification outcome.
pub fn format_outcome(
    outcome: &ClassificationOutcome,
    format: OutputFormat,
) -> Result<String, CommandError> {
    match format {
        OutputFormat::Text => Ok(outcome.label.to_string()),
        OutputFormat::Json => {
            let value = json!({
                "label": outcome.label,
                "case_data": outcome.case_data.case_data,
                "tool_rounds": outcome.tool_rounds,
                "transitions": outcome.transitions,
                "messages": outcome.conversation.len(),
                "usage": outcome.usage,
                "elapsed_ms": u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            });
            serde_json::to_string_pretty(&value).map_err(|e| CommandError::Output(e.to_string()))
        }
    }
}

/// Formats the result of `init-prompts`.
pub fn format_written_prompts(
    dir: &std::path::Path,
    written: &[PathBuf],
    format: OutputFormat,
) -> Result<String, CommandError> {
    match format {
        OutputFormat::Text if written.is_empty() => Ok(format!(
            "All prompt templates already exist in {}",
            dir.display()
        )),
        OutputFormat::Text => Ok(written
            .iter()
            .map(|p| format!("Wrote {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            let value = json!({
                "dir": dir,
                "written": written,
            });
            serde_json::to_string_pretty(&value).map_err(|e| CommandError::Output(e.to_string()))
        }
    }
}
