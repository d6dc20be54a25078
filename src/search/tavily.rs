//! Tavily web search client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{SearchProvider, SearchRequest, SearchResponse};
use crate::agent::config::AgentConfig;
use crate::error::{AgentError, SearchError};

/// Maximum length of an error body kept in [`SearchError::Status`].
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the Tavily search API.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilyClient {
    /// Creates a client from agent configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        Self::with_endpoint(
            &config.search_api_key,
            &config.search_base_url,
            config.search_timeout,
        )
    }

    /// Creates a client for an explicit endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn with_endpoint(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::InvalidConfig {
                message: format!("failed to build search HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: format!("{}/search", base_url.trim_end_matches('/')),
        })
    }
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        debug!(query = %request.query, max_results = request.max_results, "tavily search");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited);
        }
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY_LEN {
                let cut = (0..=MAX_ERROR_BODY_LEN)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        if parsed.is_empty() {
            return Err(SearchError::Empty {
                query: request.query.clone(),
            });
        }
        Ok(parsed)
    }
}
