//! Web search capability.
//!
//! The workflow talks to search through [`SearchProvider`] so tests can
//! substitute scripted results. [`TavilyClient`] is the production backend.

mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

pub use tavily::TavilyClient;

/// Options applied to every search issued by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of hits per query.
    pub max_results: usize,
    /// Ask the service for a synthesized answer.
    pub include_answer: bool,
    /// Include full page text in hits.
    pub include_raw_content: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            include_answer: true,
            include_raw_content: false,
        }
    }
}

/// A single search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Maximum number of hits.
    pub max_results: usize,
    /// Ask for a synthesized answer.
    pub include_answer: bool,
    /// Include full page text.
    pub include_raw_content: bool,
    /// `basic` or `advanced`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_depth: Option<String>,
    /// `general`, `news` or `finance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Restrict hits to these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    /// Drop hits from these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
    /// `day`, `week`, `month` or `year`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
}

impl SearchRequest {
    /// Creates a request for `query` with the given options.
    #[must_use]
    pub fn new(query: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            query: query.into(),
            max_results: options.max_results,
            include_answer: options.include_answer,
            include_raw_content: options.include_raw_content,
            ..Self::default()
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// Relevant snippet.
    #[serde(default)]
    pub content: String,
    /// Service relevance score.
    #[serde(default)]
    pub score: f64,
    /// Full page text, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// Search results for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Echo of the query.
    #[serde(default)]
    pub query: String,
    /// Synthesized answer, when requested and available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Hits, best first.
    #[serde(default)]
    pub results: Vec<SearchHit>,
    /// Service-side latency in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

impl SearchResponse {
    /// Returns `true` if there are no hits and no answer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.answer.as_deref().is_none_or(|a| a.trim().is_empty())
    }
}

/// Trait for web search backends.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Backend name (e.g., `"tavily"`).
    fn name(&self) -> &'static str;

    /// Executes one search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport, status or decode failures.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}
