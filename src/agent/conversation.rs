//! Append-only conversation history for one classification request.

use super::message::{ChatMessage, Role, user_message};
use crate::error::AgentError;

/// Ordered, append-only sequence of chat messages.
///
/// Seeded with the user's query. Messages can be appended and read but
/// never modified or removed. A tool message is only accepted when it
/// answers a still-unanswered call of the most recent assistant message
/// and nothing but tool messages follows that assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Starts a conversation with the raw user query.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            messages: vec![user_message(query)],
        }
    }

    /// Appends a message.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Orchestration`] for a tool message that does
    /// not correspond to a pending tool call.
    pub fn push(&mut self, message: ChatMessage) -> Result<(), AgentError> {
        if message.role == Role::Tool {
            self.check_tool_result(&message)?;
        }
        self.messages.push(message);
        Ok(())
    }

    fn check_tool_result(&self, message: &ChatMessage) -> Result<(), AgentError> {
        let call_id = message
            .tool_call_id
            .as_deref()
            .ok_or_else(|| AgentError::Orchestration {
                message: "tool message without tool_call_id".to_string(),
            })?;

        let trailing_results: Vec<&ChatMessage> = self
            .messages
            .iter()
            .rev()
            .take_while(|m| m.role == Role::Tool)
            .collect();

        let pending = self
            .messages
            .iter()
            .rev()
            .nth(trailing_results.len())
            .filter(|m| m.has_tool_calls())
            .ok_or_else(|| AgentError::Orchestration {
                message: format!("tool result {call_id} does not follow an assistant tool call"),
            })?;

        let requested = pending.tool_calls.iter().any(|c| c.id == call_id);
        let answered = trailing_results
            .iter()
            .any(|m| m.tool_call_id.as_deref() == Some(call_id));

        if !requested || answered {
            return Err(AgentError::Orchestration {
                message: format!("tool result {call_id} has no pending tool call"),
            });
        }
        Ok(())
    }

    /// All messages in order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recently appended message.
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The most recent assistant message.
    #[must_use]
    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Number of messages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false`: a conversation starts with the query.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consumes the conversation, returning its messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}
