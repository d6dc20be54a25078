//! Stage-one output contract.
//!
//! The gathering stage must answer with `{"case_data": "..."}`. The object
//! is validated here before classification starts.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Matches a fenced code block, optionally tagged `json`.
static FENCED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").ok());

/// Facts gathered about the organization, relative to the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseData {
    /// Query keywords plus everything found about the organization, as text.
    pub case_data: String,
}

impl CaseData {
    /// Parses the gathering stage's final answer.
    ///
    /// Accepts the object wrapped in a Markdown fence or surrounded by
    /// prose. A non-string `case_data` value is kept as its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::CaseDataParse`] if no JSON object with a
    /// non-empty `case_data` field can be found.
    pub fn parse(content: &str) -> Result<Self, AgentError> {
        #[derive(Deserialize)]
        struct Raw {
            case_data: serde_json::Value,
        }

        let fail = |message: String| AgentError::CaseDataParse {
            message,
            content: content.to_string(),
        };

        let inner = unfence(content);
        let mut last_error = None;
        for (start, _) in inner.match_indices('{') {
            let next = serde_json::Deserializer::from_str(&inner[start..])
                .into_iter::<Raw>()
                .next();
            match next {
                Some(Ok(raw)) => {
                    let text = match raw.case_data {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    if !text.trim().is_empty() {
                        return Ok(Self { case_data: text });
                    }
                    last_error = Some("case_data is empty".to_string());
                }
                Some(Err(e)) => {
                    // A braced aside in prose; keep looking.
                    if last_error.is_none() {
                        last_error = Some(e.to_string());
                    }
                }
                None => {}
            }
        }

        Err(fail(
            last_error.unwrap_or_else(|| "no JSON object found".to_string()),
        ))
    }

    /// Wraps arbitrary text without validation.
    #[must_use]
    pub fn raw(content: &str) -> Self {
        Self {
            case_data: content.to_string(),
        }
    }
}

/// Strips a Markdown code fence around the answer, if any.
fn unfence(content: &str) -> &str {
    let trimmed = content.trim();
    FENCED
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str())
}
