//! Tool type definitions for function-calling.
//!
//! Provides provider-agnostic types for tool definitions, calls, and results.
//! The only tool exposed to the model is web search.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Name of the web search tool as seen by the model.
pub const WEB_SEARCH_TOOL: &str = "tavily_search";

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match dispatch table in executor).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// Gives every call in one assistant turn a distinct, non-empty ID.
///
/// Some `OpenAI`-compatible endpoints return blank or repeated IDs. Those
/// are replaced by `call_{index}` so each tool result pairs with exactly
/// one call. Returns how many IDs were replaced.
pub fn ensure_unique_ids(calls: &mut [ToolCall]) -> usize {
    let mut seen = HashSet::with_capacity(calls.len());
    let mut replaced = 0;
    for (index, call) in calls.iter_mut().enumerate() {
        if call.id.is_empty() || seen.contains(&call.id) {
            let mut id = format!("call_{index}");
            while seen.contains(&id) {
                id.push('_');
            }
            call.id = id;
            replaced += 1;
        }
        seen.insert(call.id.clone());
    }
    replaced
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// Result content (JSON string on success, error message on failure).
    pub content: String,
    /// Whether this result represents an error.
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result.
    #[must_use]
    pub fn ok(tool_call_id: &str, content: String) -> Self {
        Self {
            tool_call_id: tool_call_id.to_string(),
            content,
            is_error: false,
        }
    }

    /// Failed result. The content is prefixed with `error:` so the model
    /// can tell failures from data.
    #[must_use]
    pub fn error(tool_call_id: &str, message: &str) -> Self {
        Self {
            tool_call_id: tool_call_id.to_string(),
            content: format!("error: {message}"),
            is_error: true,
        }
    }
}

/// A set of tool definitions scoped to a workflow stage.
///
/// - Information gathering: web search
/// - Classification: no tools
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Tool set for the information-gathering stage.
    #[must_use]
    pub fn gathering_tools() -> Self {
        Self {
            definitions: vec![def_web_search()],
        }
    }

    /// Empty tool set (no tools available).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Defines the web search tool.
fn def_web_search() -> ToolDefinition {
    ToolDefinition {
        name: WEB_SEARCH_TOOL.to_string(),
        description: "A search engine optimized for comprehensive, accurate, and trusted \
                       results. Useful for answering questions about organizations, their \
                       addresses, goods and services. Input should be a search query."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query to look up."
                },
                "search_depth": {
                    "type": "string",
                    "enum": ["basic", "advanced"],
                    "description": "Depth of the search. Defaults to 'basic'."
                },
                "topic": {
                    "type": "string",
                    "enum": ["general", "news", "finance"],
                    "description": "Category of the search. Defaults to 'general'."
                },
                "include_domains": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Restrict results to these domains."
                },
                "exclude_domains": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Exclude results from these domains."
                },
                "time_range": {
                    "type": "string",
                    "enum": ["day", "week", "month", "year"],
                    "description": "Only return results published within this range."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}
