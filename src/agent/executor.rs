//! Tool executor that dispatches tool calls to the search capability.
//!
//! Every failure (bad arguments, unknown tool, search error, timeout) is
//! turned into an error [`ToolResult`] so the model can see it and react
//! on its next turn. Nothing here aborts the workflow.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use super::tool::{ToolCall, ToolResult, WEB_SEARCH_TOOL};
use crate::error::{AgentError, SearchError};
use crate::search::{SearchOptions, SearchProvider, SearchRequest};

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 100_000;
/// Maximum domains accepted in an include/exclude filter.
const MAX_DOMAIN_FILTERS: usize = 50;

const SEARCH_DEPTHS: &[&str] = &["basic", "advanced"];
const TOPICS: &[&str] = &["general", "news", "finance"];
const TIME_RANGES: &[&str] = &["day", "week", "month", "year"];

/// Executes tool calls against the search capability.
#[derive(Clone)]
pub struct ToolExecutor {
    search: Arc<dyn SearchProvider>,
    options: SearchOptions,
    timeout: Duration,
}

impl ToolExecutor {
    /// Creates an executor that searches with fixed `options` and bounds
    /// each call by `timeout`.
    #[must_use]
    pub fn new(search: Arc<dyn SearchProvider>, options: SearchOptions, timeout: Duration) -> Self {
        Self {
            search,
            options,
            timeout,
        }
    }

    /// Executes all calls of one assistant turn concurrently.
    ///
    /// Results are returned in the order the calls were requested,
    /// independent of completion order.
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        join_all(calls.iter().map(|call| self.execute(call))).await
    }

    /// Dispatches one tool call by name.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return ToolResult::error(
                &call.id,
                &format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            );
        }

        let result = match call.name.as_str() {
            WEB_SEARCH_TOOL => self.tool_web_search(&call.arguments).await,
            other => Err(AgentError::ToolExecution {
                name: other.to_string(),
                message: "unknown tool".to_string(),
            }),
        };

        let result = match result {
            Ok(content) => ToolResult::ok(&call.id, content),
            Err(e) => ToolResult::error(&call.id, &e.to_string()),
        };
        debug!(
            tool = call.name,
            call_id = call.id,
            is_error = result.is_error,
            "tool execution complete"
        );
        result
    }

    /// Runs a web search and returns the response as JSON text.
    async fn tool_web_search(&self, args: &str) -> Result<String, AgentError> {
        // Extra keys the model invents (e.g. `max_results`) are ignored.
        #[derive(Deserialize)]
        struct Args {
            query: String,
            search_depth: Option<String>,
            topic: Option<String>,
            #[serde(default)]
            include_domains: Vec<String>,
            #[serde(default)]
            exclude_domains: Vec<String>,
            time_range: Option<String>,
        }

        let invalid = |message: String| AgentError::ToolExecution {
            name: WEB_SEARCH_TOOL.to_string(),
            message,
        };

        let args: Args =
            serde_json::from_str(args).map_err(|e| invalid(format!("invalid arguments: {e}")))?;

        if args.query.trim().is_empty() {
            return Err(invalid("query must not be empty".to_string()));
        }
        check_choice("search_depth", args.search_depth.as_deref(), SEARCH_DEPTHS)
            .map_err(invalid)?;
        check_choice("topic", args.topic.as_deref(), TOPICS).map_err(invalid)?;
        check_choice("time_range", args.time_range.as_deref(), TIME_RANGES).map_err(invalid)?;
        if args.include_domains.len() > MAX_DOMAIN_FILTERS
            || args.exclude_domains.len() > MAX_DOMAIN_FILTERS
        {
            return Err(invalid(format!(
                "too many domain filters (max {MAX_DOMAIN_FILTERS})"
            )));
        }

        let request = SearchRequest {
            search_depth: args.search_depth,
            topic: args.topic,
            include_domains: args.include_domains,
            exclude_domains: args.exclude_domains,
            time_range: args.time_range,
            ..SearchRequest::new(args.query, self.options)
        };

        let response = tokio::time::timeout(self.timeout, self.search.search(&request))
            .await
            .unwrap_or(Err(SearchError::Timeout {
                seconds: self.timeout.as_secs(),
            }))
            .map_err(|e| {
                warn!(backend = self.search.name(), query = %request.query, error = %e, "search failed");
                invalid(e.to_string())
            })?;

        serde_json::to_string_pretty(&response)
            .map_err(|e| invalid(format!("serialization error: {e}")))
    }
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("search", &self.search.name())
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn check_choice(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), String> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(format!(
            "{field} must be one of {}, got {v:?}",
            allowed.join(", ")
        )),
        _ => Ok(()),
    }
}
