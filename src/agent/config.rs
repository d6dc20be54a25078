//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;
use crate::search::SearchOptions;

/// Default reasoning model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature. Zero keeps the relevance judgment stable across runs.
const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Default max tokens per reasoning response.
const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default reasoning request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default search request timeout in seconds.
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
/// Default maximum tool-calling rounds before aborting.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;
/// Default search service endpoint.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://api.tavily.com";

/// Environment variable holding the reasoning service key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the search service key.
pub const ENV_SEARCH_API_KEY: &str = "TAVILI_API_KEY";

/// Configuration for the classification workflow.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the reasoning service.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// API key for the search service.
    pub search_api_key: String,
    /// Search service endpoint.
    pub search_base_url: String,
    /// Reasoning model identifier.
    pub model: String,
    /// Sampling temperature for every reasoning call.
    pub temperature: f32,
    /// Maximum tokens per reasoning response.
    pub max_tokens: u32,
    /// Timeout for one reasoning call.
    pub timeout: Duration,
    /// Timeout for one search call.
    pub search_timeout: Duration,
    /// Maximum tool-calling rounds before failing with
    /// [`AgentError::LoopBudgetExceeded`].
    pub max_tool_iterations: usize,
    /// Options applied to every search request.
    pub search: SearchOptions,
    /// Directory containing prompt template overrides.
    pub prompt_dir: Option<PathBuf>,
    /// Pass malformed stage-one output through to classification instead
    /// of failing with [`AgentError::CaseDataParse`].
    pub lenient_case_data: bool,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if either API key is missing.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    search_api_key: Option<String>,
    search_base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    search_timeout: Option<Duration>,
    max_tool_iterations: Option<usize>,
    max_results: Option<usize>,
    include_answer: Option<bool>,
    include_raw_content: Option<bool>,
    prompt_dir: Option<PathBuf>,
    lenient_case_data: Option<bool>,
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_nonempty(name).and_then(|v| v.trim().parse().ok())
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = env_nonempty("ORG_RELEVANCE_PROVIDER");
        }
        if self.api_key.is_none() {
            self.api_key = env_nonempty(ENV_OPENAI_API_KEY);
        }
        if self.base_url.is_none() {
            self.base_url = env_nonempty("OPENAI_URL").or_else(|| env_nonempty("OPENAI_BASE_URL"));
        }
        if self.search_api_key.is_none() {
            self.search_api_key =
                env_nonempty(ENV_SEARCH_API_KEY).or_else(|| env_nonempty("TAVILY_API_KEY"));
        }
        if self.search_base_url.is_none() {
            self.search_base_url = env_nonempty("ORG_RELEVANCE_SEARCH_URL");
        }
        if self.model.is_none() {
            self.model = env_nonempty("ORG_RELEVANCE_MODEL");
        }
        if self.temperature.is_none() {
            self.temperature = env_parse("ORG_RELEVANCE_TEMPERATURE");
        }
        if self.max_tool_iterations.is_none() {
            self.max_tool_iterations = env_parse("ORG_RELEVANCE_MAX_ITERATIONS");
        }
        if self.timeout.is_none() {
            self.timeout = env_parse("ORG_RELEVANCE_TIMEOUT_SECS").map(Duration::from_secs);
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = env_nonempty("ORG_RELEVANCE_PROMPT_DIR").map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the reasoning service API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the search service API key.
    #[must_use]
    pub fn search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = Some(key.into());
        self
    }

    /// Sets the search service endpoint.
    #[must_use]
    pub fn search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base_url = Some(url.into());
        self
    }

    /// Sets the reasoning model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the max tokens per reasoning response.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the reasoning request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the search request timeout.
    #[must_use]
    pub const fn search_timeout(mut self, duration: Duration) -> Self {
        self.search_timeout = Some(duration);
        self
    }

    /// Sets the maximum tool-calling rounds.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Sets the maximum number of search hits per query.
    #[must_use]
    pub const fn max_results(mut self, n: usize) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Sets whether searches request a synthesized answer.
    #[must_use]
    pub const fn include_answer(mut self, yes: bool) -> Self {
        self.include_answer = Some(yes);
        self
    }

    /// Sets whether searches return full page text.
    #[must_use]
    pub const fn include_raw_content(mut self, yes: bool) -> Self {
        self.include_raw_content = Some(yes);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Enables pass-through of malformed stage-one output.
    #[must_use]
    pub const fn lenient_case_data(mut self, yes: bool) -> Self {
        self.lenient_case_data = Some(yes);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if either API key was not set,
    /// or [`AgentError::InvalidConfig`] for out-of-range values.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing {
            var: ENV_OPENAI_API_KEY,
        })?;
        let search_api_key = self.search_api_key.ok_or(AgentError::ApiKeyMissing {
            var: ENV_SEARCH_API_KEY,
        })?;

        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AgentError::InvalidConfig {
                message: format!("temperature {temperature} outside 0.0..=2.0"),
            });
        }

        let max_tool_iterations = self
            .max_tool_iterations
            .unwrap_or(DEFAULT_MAX_TOOL_ITERATIONS);
        if max_tool_iterations == 0 {
            return Err(AgentError::InvalidConfig {
                message: "max_tool_iterations must be at least 1".to_string(),
            });
        }

        let defaults = SearchOptions::default();
        let search = SearchOptions {
            max_results: self.max_results.unwrap_or(defaults.max_results),
            include_answer: self.include_answer.unwrap_or(defaults.include_answer),
            include_raw_content: self
                .include_raw_content
                .unwrap_or(defaults.include_raw_content),
        };
        if search.max_results == 0 {
            return Err(AgentError::InvalidConfig {
                message: "max_results must be at least 1".to_string(),
            });
        }

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            search_api_key,
            search_base_url: self
                .search_base_url
                .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            search_timeout: self
                .search_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS)),
            max_tool_iterations,
            search,
            prompt_dir: self.prompt_dir,
            lenient_case_data: self.lenient_case_data.unwrap_or(false),
        })
    }
}
