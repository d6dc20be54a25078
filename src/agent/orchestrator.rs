//! Orchestrator for the two-stage relevance workflow.
//!
//! A small state machine drives the conversation:
//!
//! ```text
//! GatheringInfo ──tool calls──▶ InvokingTools
//!       ▲                            │
//!       └────────────────────────────┘
//!       │ no tool calls
//!       ▼
//! Classifying ──▶ Done
//! ```
//!
//! Each stage appends to a single [`Conversation`]; the label is read from
//! the last message once `Done` is reached.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::case_data::CaseData;
use super::config::AgentConfig;
use super::conversation::Conversation;
use super::executor::ToolExecutor;
use super::label::RelevanceLabel;
use super::message::{ChatRequest, ChatResponse, TokenUsage, system_message, tool_message};
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::tool::{ToolSet, ensure_unique_ids};
use crate::error::AgentError;
use crate::search::SearchProvider;

/// Maximum accepted query length in bytes.
const MAX_QUERY_LEN: usize = 10_000;

/// Workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Ask the model to gather facts, possibly requesting searches.
    GatheringInfo,
    /// Execute the searches requested in the last assistant message.
    InvokingTools,
    /// Ask the model for the binary label.
    Classifying,
    /// Terminal.
    Done,
}

/// State of one classification request.
///
/// Owned by a single request; never shared.
#[derive(Debug, Clone)]
pub struct Run {
    conversation: Conversation,
    stage: Stage,
    tool_rounds: usize,
    transitions: usize,
    usage: TokenUsage,
    case_data: Option<CaseData>,
    started: Instant,
}

impl Run {
    /// The conversation so far.
    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Completed tool rounds.
    #[must_use]
    pub const fn tool_rounds(&self) -> usize {
        self.tool_rounds
    }

    /// State changes among `GatheringInfo`, `InvokingTools` and `Classifying`.
    #[must_use]
    pub const fn transitions(&self) -> usize {
        self.transitions
    }

    /// Validated stage-one output, once classification has started.
    #[must_use]
    pub const fn case_data(&self) -> Option<&CaseData> {
        self.case_data.as_ref()
    }
}

/// Result of a completed classification.
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    /// The relevance label.
    pub label: RelevanceLabel,
    /// Facts the label was based on.
    pub case_data: CaseData,
    /// Full conversation, ending with the label message.
    pub conversation: Conversation,
    /// State changes before `Done` (`2 × tool_rounds + 1`).
    pub transitions: usize,
    /// Number of tool rounds executed.
    pub tool_rounds: usize,
    /// Token usage summed over all reasoning calls.
    pub usage: TokenUsage,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

/// Runs the gather → classify workflow against a reasoning provider and a
/// search backend.
///
/// Providers are shared read-only, so one orchestrator can serve
/// concurrent [`Orchestrator::classify`] calls.
pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    config: AgentConfig,
    prompts: PromptSet,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    ///
    /// Loads prompt templates from [`AgentConfig::prompt_dir`], falling
    /// back to compiled-in defaults.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        search: Arc<dyn SearchProvider>,
        config: AgentConfig,
    ) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self::with_prompts(provider, search, config, prompts)
    }

    /// Creates an orchestrator with explicit prompts.
    pub fn with_prompts(
        provider: Arc<dyn LlmProvider>,
        search: Arc<dyn SearchProvider>,
        config: AgentConfig,
        prompts: PromptSet,
    ) -> Self {
        let executor = ToolExecutor::new(search, config.search, config.search_timeout);
        Self {
            provider,
            executor,
            config,
            prompts,
        }
    }

    /// Classifies the organization named in `query`.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Orchestration`] for an empty or oversized query
    /// - [`AgentError::LoopBudgetExceeded`] if the model keeps searching
    /// - [`AgentError::CaseDataParse`] if stage one returns no valid object
    ///   (unless `lenient_case_data` is set)
    /// - [`AgentError::UnexpectedLabel`] if stage two answers neither `1` nor `0`
    /// - [`AgentError::Timeout`] / [`AgentError::ApiRequest`] on provider failures
    pub async fn classify(&self, query: &str) -> Result<ClassificationOutcome, AgentError> {
        let mut run = self.start(query)?;
        while run.stage != Stage::Done {
            self.step(&mut run).await?;
        }
        self.finish(run)
    }

    /// Validates the query and creates the initial run state.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Orchestration`] for an empty or oversized query.
    pub fn start(&self, query: &str) -> Result<Run, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::Orchestration {
                message: "Query cannot be empty".to_string(),
            });
        }
        if query.len() > MAX_QUERY_LEN {
            return Err(AgentError::Orchestration {
                message: format!(
                    "Query exceeds maximum length ({} bytes, max {MAX_QUERY_LEN})",
                    query.len()
                ),
            });
        }

        Ok(Run {
            conversation: Conversation::new(query),
            stage: Stage::GatheringInfo,
            tool_rounds: 0,
            transitions: 0,
            usage: TokenUsage::default(),
            case_data: None,
            started: Instant::now(),
        })
    }

    /// Executes the current stage and moves `run` to the next one.
    ///
    /// Returns the new stage. Calling this on a finished run is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates provider, loop-budget and case-data errors.
    pub async fn step(&self, run: &mut Run) -> Result<Stage, AgentError> {
        let from = run.stage;
        let next = match from {
            Stage::GatheringInfo => self.gather(run).await?,
            Stage::InvokingTools => self.invoke_tools(run).await?,
            Stage::Classifying => self.classify_case(run).await?,
            Stage::Done => return Ok(Stage::Done),
        };

        if from != Stage::Classifying {
            run.transitions += 1;
        }
        debug!(?from, to = ?next, messages = run.conversation.len(), "stage transition");
        run.stage = next;
        Ok(next)
    }

    async fn gather(&self, run: &mut Run) -> Result<Stage, AgentError> {
        run.conversation.push(system_message(&self.prompts.gathering))?;

        let mut response = self
            .chat(&run.conversation, ToolSet::gathering_tools())
            .await?;
        run.usage.accumulate(response.usage);
        let replaced = ensure_unique_ids(&mut response.tool_calls);
        if replaced > 0 {
            warn!(replaced, "provider returned blank or repeated tool call ids");
        }
        let wants_tools = !response.tool_calls.is_empty();
        let truncated = response.is_truncated();
        run.conversation.push(response.into_message())?;

        if !wants_tools {
            if truncated {
                return Err(AgentError::ResponseTruncated {
                    stage: "information gathering",
                    max_tokens: self.config.max_tokens,
                });
            }
            return Ok(Stage::Classifying);
        }
        if run.tool_rounds >= self.config.max_tool_iterations {
            warn!(
                max_iterations = self.config.max_tool_iterations,
                "model keeps requesting searches"
            );
            return Err(AgentError::LoopBudgetExceeded {
                max_iterations: self.config.max_tool_iterations,
            });
        }
        Ok(Stage::InvokingTools)
    }

    async fn invoke_tools(&self, run: &mut Run) -> Result<Stage, AgentError> {
        let calls = run
            .conversation
            .last()
            .filter(|m| m.has_tool_calls())
            .map(|m| m.tool_calls.clone())
            .ok_or_else(|| AgentError::Orchestration {
                message: "no pending tool calls".to_string(),
            })?;

        debug!(
            round = run.tool_rounds,
            tool_count = calls.len(),
            "executing tool calls"
        );
        for result in self.executor.execute_all(&calls).await {
            run.conversation
                .push(tool_message(&result.tool_call_id, &result.content))?;
        }
        run.tool_rounds += 1;
        Ok(Stage::GatheringInfo)
    }

    async fn classify_case(&self, run: &mut Run) -> Result<Stage, AgentError> {
        let answer = run
            .conversation
            .last_assistant()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let case_data = match CaseData::parse(&answer) {
            Ok(data) => data,
            Err(e) if self.config.lenient_case_data => {
                warn!(error = %e, "passing unvalidated case data to classification");
                CaseData::raw(&answer)
            }
            Err(e) => return Err(e),
        };
        run.case_data = Some(case_data);

        run.conversation.push(system_message(&self.prompts.classification))?;
        let response = self.chat(&run.conversation, ToolSet::none()).await?;
        run.usage.accumulate(response.usage);
        let truncated = response.is_truncated();
        run.conversation.push(response.into_message())?;
        if truncated {
            return Err(AgentError::ResponseTruncated {
                stage: "classification",
                max_tokens: self.config.max_tokens,
            });
        }
        Ok(Stage::Done)
    }

    fn finish(&self, run: Run) -> Result<ClassificationOutcome, AgentError> {
        let last = run
            .conversation
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let label = RelevanceLabel::parse(last)?;
        let case_data = run.case_data.ok_or_else(|| AgentError::Orchestration {
            message: "run finished without case data".to_string(),
        })?;

        info!(
            label = label.as_str(),
            tool_rounds = run.tool_rounds,
            total_tokens = run.usage.total_tokens,
            model = %self.config.model,
            "classification complete"
        );

        Ok(ClassificationOutcome {
            label,
            case_data,
            conversation: run.conversation,
            transitions: run.transitions,
            tool_rounds: run.tool_rounds,
            usage: run.usage,
            elapsed: run.started.elapsed(),
        })
    }

    /// Sends the whole conversation to the provider, bounded by the request timeout.
    async fn chat(
        &self,
        conversation: &Conversation,
        tools: ToolSet,
    ) -> Result<ChatResponse, AgentError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: conversation.messages().to_vec(),
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            tools: tools.definitions().to_vec(),
        };

        tokio::time::timeout(self.config.timeout, self.provider.chat(&request))
            .await
            .map_err(|_| AgentError::Timeout {
                operation: "reasoning request",
                seconds: self.config.timeout.as_secs(),
            })?
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("executor", &self.executor)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::message::{ChatMessage, Role};
    use crate::agent::tool::{ToolCall, WEB_SEARCH_TOOL};
    use crate::error::SearchError;
    use crate::search::{SearchHit, SearchRequest, SearchResponse};

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Provider replaying a fixed list of responses and recording requests.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<ChatResponse>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<ChatResponse>) -> Self {
            Self {
                responses: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }
            self.responses
                .lock()
                .ok()
                .and_then(|mut r| r.pop_front())
                .ok_or_else(|| AgentError::ApiRequest {
                    message: "script exhausted".to_string(),
                    status: None,
                })
        }
    }

    /// Provider that never answers.
    struct HangingProvider;

    #[async_trait]
    impl LlmProvider for HangingProvider {
        fn name(&self) -> &'static str {
            "hanging"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(AgentError::ApiRequest {
                message: "unreachable".to_string(),
                status: None,
            })
        }
    }

    /// Search backend failing for queries containing `fail`.
    struct FakeSearch;

    #[async_trait]
    impl SearchProvider for FakeSearch {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
            if request.query.contains("fail") {
                return Err(SearchError::Request("simulated network error".to_string()));
            }
            Ok(SearchResponse {
                query: request.query.clone(),
                answer: Some(format!("facts about {}", request.query)),
                results: vec![SearchHit {
                    title: request.query.clone(),
                    url: "https://example.ru".to_string(),
                    content: "snippet".to_string(),
                    score: 0.8,
                    raw_content: None,
                }],
                response_time: None,
            })
        }
    }

    fn text(content: &str) -> ChatResponse {
        ChatResponse {
            content: content.to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 1,
                total_tokens: 11,
            },
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }

    fn searches(queries: &[(&str, &str)]) -> ChatResponse {
        ChatResponse {
            content: String::new(),
            usage: TokenUsage::default(),
            tool_calls: queries
                .iter()
                .map(|(id, q)| ToolCall {
                    id: (*id).to_string(),
                    name: WEB_SEARCH_TOOL.to_string(),
                    arguments: serde_json::json!({ "query": q }).to_string(),
                })
                .collect(),
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .api_key("k")
            .search_api_key("s")
            .max_tool_iterations(3)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    fn orchestrator(provider: Arc<dyn LlmProvider>, config: AgentConfig) -> Orchestrator {
        Orchestrator::with_prompts(provider, Arc::new(FakeSearch), config, PromptSet::defaults())
    }

    fn tool_contents(messages: &[ChatMessage]) -> Vec<(String, String)> {
        messages
            .iter()
            .filter(|m| m.role == Role::Tool)
            .map(|m| (m.tool_call_id.clone().unwrap_or_default(), m.content.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_classify_without_searches() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            text(r#"{"case_data": "сигары; кальянная, кальяны и чай, табачных изделий нет"}"#),
            text("0"),
        ]));
        let orch = orchestrator(provider.clone(), config());

        let outcome = orch
            .classify("сигары, кальянная")
            .await
            .unwrap_or_else(|e| panic!("classify failed: {e}"));

        assert_eq!(outcome.label, RelevanceLabel::NotRelevant);
        assert_eq!(outcome.tool_rounds, 0);
        assert_eq!(outcome.transitions, 1);
        // user + gather system + assistant + classify system + label
        let roles: Vec<Role> = outcome
            .conversation
            .messages()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::System,
                Role::Assistant,
                Role::System,
                Role::Assistant
            ]
        );
        assert_eq!(outcome.usage.total_tokens, 22);
        assert!(outcome.case_data.case_data.contains("кальянная"));
    }

    #[tokio::test]
    async fn test_classify_with_search_rounds() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            searches(&[("d", "Детский мир описание"), ("a", "Детский мир адрес")]),
            searches(&[("o", "Детский мир товары")]),
            text(r#"{"case_data": "футбольный мяч; Детский мир продаёт игрушки и спорттовары"}"#),
            text("1"),
        ]));
        let orch = orchestrator(provider.clone(), config());

        let outcome = orch
            .classify("футбольный мяч, детский мир")
            .await
            .unwrap_or_else(|e| panic!("classify failed: {e}"));

        assert_eq!(outcome.label, RelevanceLabel::Relevant);
        assert_eq!(outcome.tool_rounds, 2);
        assert_eq!(outcome.transitions, 2 * 2 + 1);

        let tools = tool_contents(outcome.conversation.messages());
        let ids: Vec<&str> = tools.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "o"]);
        assert!(tools[1].1.contains("Детский мир адрес"));
    }

    #[tokio::test]
    async fn test_requests_use_configured_temperature_and_stage_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            searches(&[("d", "кальянная")]),
            text(r#"{"case_data": "x"}"#),
            text("0"),
        ]));
        let cfg = AgentConfig::builder()
            .api_key("k")
            .search_api_key("s")
            .model("test-model")
            .temperature(0.0)
            .build()
            .unwrap_or_else(|_| unreachable!());
        let orch = orchestrator(provider.clone(), cfg);
        let _ = orch.classify("сигары, кальянная").await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 3);
        for req in &requests {
            assert_eq!(req.model, "test-model");
            assert_eq!(req.temperature, Some(0.0));
        }
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[1].tools.len(), 1);
        assert!(requests[2].tools.is_empty());
        // Each request sees the whole conversation so far.
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[1].messages.len(), 5);
        assert_eq!(requests[2].messages.len(), 7);
    }

    #[tokio::test]
    async fn test_search_failure_returns_to_gathering() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            searches(&[("f", "fail кальянная")]),
            text(r#"{"case_data": "кальянная"}"#),
            text("0"),
        ]));
        let orch = orchestrator(provider, config());
        let mut run = orch
            .start("сигары, кальянная")
            .unwrap_or_else(|e| panic!("start failed: {e}"));

        let next = orch.step(&mut run).await.ok();
        assert_eq!(next, Some(Stage::InvokingTools));
        let next = orch.step(&mut run).await.ok();
        assert_eq!(next, Some(Stage::GatheringInfo));

        let last = run
            .conversation()
            .last()
            .unwrap_or_else(|| unreachable!());
        assert_eq!(last.role, Role::Tool);
        assert!(last.content.starts_with("error:"));
        assert!(last.content.contains("simulated network error"));

        while run.stage() != Stage::Done {
            if let Err(e) = orch.step(&mut run).await {
                panic!("step failed: {e}");
            }
        }
        assert_eq!(run.transitions(), 3);
    }

    #[tokio::test]
    async fn test_loop_budget_exceeded() {
        let script = (0..10)
            .map(|i| searches(&[("c", format!("поиск {i}").as_str())]))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(script));
        let orch = orchestrator(provider, config());

        let result = orch.classify("сигары, кальянная").await;
        assert!(matches!(
            result,
            Err(AgentError::LoopBudgetExceeded { max_iterations: 3 })
        ));
    }

    #[tokio::test]
    async fn test_malformed_case_data_strict() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            text("Кальянная на Тверской, сигары не продаёт."),
            text("0"),
        ]));
        let orch = orchestrator(provider.clone(), config());

        let result = orch.classify("сигары, кальянная").await;
        assert!(matches!(result, Err(AgentError::CaseDataParse { .. })));
        // Classification was never requested.
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_case_data_lenient() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            text("Кальянная на Тверской, сигары не продаёт."),
            text("0"),
        ]));
        let cfg = AgentConfig::builder()
            .api_key("k")
            .search_api_key("s")
            .lenient_case_data(true)
            .build()
            .unwrap_or_else(|_| unreachable!());
        let orch = orchestrator(provider, cfg);

        let outcome = orch
            .classify("сигары, кальянная")
            .await
            .unwrap_or_else(|e| panic!("classify failed: {e}"));
        assert_eq!(outcome.label, RelevanceLabel::NotRelevant);
        assert_eq!(
            outcome.case_data.case_data,
            "Кальянная на Тверской, сигары не продаёт."
        );
    }

    #[tokio::test]
    async fn test_unexpected_label() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            text(r#"{"case_data": "x"}"#),
            text("Организация релевантна."),
        ]));
        let orch = orchestrator(provider, config());
        let result = orch.classify("еда, фастфуд").await;
        assert!(matches!(result, Err(AgentError::UnexpectedLabel { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reasoning_timeout() {
        let orch = orchestrator(Arc::new(HangingProvider), config());
        let result = orch.classify("еда, фастфуд").await;
        assert!(matches!(
            result,
            Err(AgentError::Timeout {
                operation: "reasoning request",
                seconds: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_and_oversized_query_rejected() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let orch = orchestrator(provider.clone(), config());
        assert!(matches!(
            orch.classify("   ").await,
            Err(AgentError::Orchestration { .. })
        ));
        let huge = "а".repeat(MAX_QUERY_LEN);
        assert!(matches!(
            orch.classify(&huge).await,
            Err(AgentError::Orchestration { .. })
        ));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_append_only() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            searches(&[("a", "x"), ("b", "fail y")]),
            text(r#"{"case_data": "x"}"#),
            text("1"),
        ]));
        let orch = orchestrator(provider, config());
        let mut run = orch
            .start("еда, фастфуд")
            .unwrap_or_else(|e| panic!("start failed: {e}"));

        while run.stage() != Stage::Done {
            let before = run.conversation().messages().to_vec();
            if let Err(e) = orch.step(&mut run).await {
                panic!("step failed: {e}");
            }
            let after = run.conversation().messages();
            assert!(after.len() > before.len());
            assert_eq!(&after[..before.len()], before.as_slice());
        }
    }

    #[tokio::test]
    async fn test_step_on_done_is_noop() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            text(r#"{"case_data": "x"}"#),
            text("1"),
        ]));
        let orch = orchestrator(provider, config());
        let mut run = orch
            .start("еда, фастфуд")
            .unwrap_or_else(|e| panic!("start failed: {e}"));
        while run.stage() != Stage::Done {
            if let Err(e) = orch.step(&mut run).await {
                panic!("step failed: {e}");
            }
        }
        let len = run.conversation().len();
        assert_eq!(orch.step(&mut run).await.ok(), Some(Stage::Done));
        assert_eq!(run.conversation().len(), len);
        assert!(run.case_data().is_some());
    }

    #[tokio::test]
    async fn test_blank_tool_call_ids_do_not_abort() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            searches(&[("", "кальянная описание"), ("", "кальянная адрес")]),
            text(r#"{"case_data": "сигары; кальянная"}"#),
            text("0"),
        ]));
        let orch = orchestrator(provider, config());

        let outcome = orch
            .classify("сигары, кальянная")
            .await
            .unwrap_or_else(|e| panic!("classify failed: {e}"));
        assert_eq!(outcome.label, RelevanceLabel::NotRelevant);

        let tools = tool_contents(outcome.conversation.messages());
        let ids: Vec<&str> = tools.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["call_0", "call_1"]);
        assert!(tools[1].1.contains("кальянная адрес"));
    }

    #[tokio::test]
    async fn test_truncated_gathering_answer() {
        let mut cut = text(r#"{"case_data": "кальянная на Тверской, меню: чай, кал"#);
        cut.finish_reason = Some("length".to_string());
        let provider = Arc::new(ScriptedProvider::new(vec![cut, text("0")]));
        let orch = orchestrator(provider.clone(), config());

        let result = orch.classify("сигары, кальянная").await;
        assert!(matches!(
            result,
            Err(AgentError::ResponseTruncated {
                stage: "information gathering",
                ..
            })
        ));
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_query_stored_as_given() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let orch = orchestrator(provider, config());
        let run = orch
            .start("  сигары, кальянная\n")
            .unwrap_or_else(|e| panic!("start failed: {e}"));
        assert_eq!(
            run.conversation().messages()[0].content,
            "  сигары, кальянная\n"
        );
    }
}
