//! Error types for org-relevance.
//!
//! Errors are split by layer: [`AgentError`] for the classification
//! workflow, [`SearchError`] for the web search client and
//! [`CommandError`] for the CLI. The crate-level [`Error`] wraps them.

use thiserror::Error;

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Classification workflow failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the agent workflow, its configuration and providers.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A required credential is not configured.
    #[error("API key missing: set {var}")]
    ApiKeyMissing {
        /// Environment variable expected to hold the key.
        var: &'static str,
    },

    /// The configured LLM provider is unknown.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name from configuration.
        name: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },

    /// The reasoning service rejected or failed a request.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error detail.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// An outbound call did not finish in time.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// The operation that timed out.
        operation: &'static str,
        /// Configured limit in seconds.
        seconds: u64,
    },

    /// A tool call could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Tool name.
        name: String,
        /// Error detail.
        message: String,
    },

    /// The model kept requesting tools past the iteration cap.
    #[error("tool loop exceeded {max_iterations} iterations")]
    LoopBudgetExceeded {
        /// Configured cap.
        max_iterations: usize,
    },

    /// The information-gathering stage did not produce a valid `case_data` object.
    #[error("invalid case data: {message}")]
    CaseDataParse {
        /// Parse error detail.
        message: String,
        /// The raw model output.
        content: String,
    },

    /// The model stopped at the token limit before finishing its answer.
    #[error("{stage} answer truncated at {max_tokens} tokens")]
    ResponseTruncated {
        /// Workflow stage whose answer was cut off.
        stage: &'static str,
        /// Configured completion limit.
        max_tokens: u32,
    },

    /// The classification stage answered something other than `1` or `0`.
    #[error("unexpected classification label: {content:?}")]
    UnexpectedLabel {
        /// The raw model output.
        content: String,
    },

    /// Workflow invariant or input violation.
    #[error("orchestration error: {message}")]
    Orchestration {
        /// Error detail.
        message: String,
    },
}

impl AgentError {
    /// Returns `true` for labeled failures the caller may retry or report
    /// without treating the run as misconfigured.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CaseDataParse { .. }
                | Self::ResponseTruncated { .. }
                | Self::UnexpectedLabel { .. }
                | Self::LoopBudgetExceeded { .. }
                | Self::Timeout { .. }
        )
    }
}

/// Errors raised by the web search client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or transport failure.
    #[error("search request failed: {0}")]
    Request(String),

    /// Non-success HTTP status.
    #[error("search service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The search service is throttling requests.
    #[error("search rate limit exceeded")]
    RateLimited,

    /// Response body could not be decoded.
    #[error("failed to decode search response: {0}")]
    Decode(String),

    /// The search returned neither hits nor an answer.
    #[error("no results for query {query:?}")]
    Empty {
        /// The query that produced nothing.
        query: String,
    },

    /// The search call did not finish in time.
    #[error("search timed out after {seconds}s")]
    Timeout {
        /// Configured limit in seconds.
        seconds: u64,
    },
}

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The query read from input is empty.
    #[error("no query given")]
    EmptyQuery,

    /// Unknown output format.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// No prompt directory could be resolved.
    #[error("cannot determine prompt directory; pass --dir")]
    NoPromptDir,

    /// Output serialization failed.
    #[error("output error: {0}")]
    Output(String),
}
