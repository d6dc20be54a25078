//! # org-relevance
//!
//! Decides whether an organization is relevant to a free-text query
//! ("сигары, кальянная" → `0`, "футбольный мяч, детский мир" → `1`).
//!
//! An LLM first gathers facts about the organization, calling web search
//! as often as it needs, and answers with a `case_data` JSON object. A
//! second LLM turn classifies relevance from those facts.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use org_relevance::agent::client::create_provider;
//! use org_relevance::agent::{AgentConfig, Orchestrator};
//! use org_relevance::search::TavilyClient;
//!
//! # async fn run() -> Result<(), org_relevance::error::AgentError> {
//! let config = AgentConfig::from_env()?;
//! let provider = create_provider(&config)?;
//! let search = Arc::new(TavilyClient::new(&config)?);
//! let orchestrator = Orchestrator::new(provider, search, config);
//!
//! let outcome = orchestrator.classify("футбольный мяч, детский мир").await?;
//! println!("{}", outcome.label);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod error;
pub mod search;

pub use agent::{AgentConfig, ClassificationOutcome, Orchestrator, RelevanceLabel};
pub use error::{AgentError, CommandError, Error, Result, SearchError};
