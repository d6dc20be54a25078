//! Relevance classification workflow.
//!
//! Drives a reasoning provider through two stages around a web search
//! tool and returns a binary relevance label.
//!
//! # Architecture
//!
//! ```text
//! User query → Orchestrator
//!   ├── GatheringInfo  (LLM with search tool) ─┐
//!   │      ▲                                   │ tool calls
//!   │      └── InvokingTools (ToolExecutor) ◀──┘
//!   ├── case_data validation
//!   └── Classifying    (LLM, no tools) → "1" / "0"
//! ```

pub mod case_data;
pub mod client;
pub mod config;
pub mod conversation;
pub mod executor;
pub mod label;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod tool;

// Re-export key types
pub use case_data::CaseData;
pub use config::AgentConfig;
pub use conversation::Conversation;
pub use executor::ToolExecutor;
pub use label::RelevanceLabel;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use orchestrator::{ClassificationOutcome, Orchestrator, Run, Stage};
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use tool::{ToolCall, ToolDefinition, ToolResult, ToolSet};
