//! Binary relevance label produced by the classification stage.

use serde::{Serialize, Serializer};

use crate::error::AgentError;

/// Whether the organization can satisfy the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelevanceLabel {
    /// The organization can provide what the query asks for (`1`).
    Relevant,
    /// It cannot (`0`).
    NotRelevant,
}

impl RelevanceLabel {
    /// Parses the model's classification answer.
    ///
    /// Only `1` and `0` are accepted, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnexpectedLabel`] for any other text.
    pub fn parse(content: &str) -> Result<Self, AgentError> {
        match content.trim() {
            "1" => Ok(Self::Relevant),
            "0" => Ok(Self::NotRelevant),
            _ => Err(AgentError::UnexpectedLabel {
                content: content.to_string(),
            }),
        }
    }

    /// Returns the wire form, `"1"` or `"0"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevant => "1",
            Self::NotRelevant => "0",
        }
    }

    /// Returns `true` for [`RelevanceLabel::Relevant`].
    #[must_use]
    pub const fn is_relevant(self) -> bool {
        matches!(self, Self::Relevant)
    }
}

impl std::fmt::Display for RelevanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RelevanceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
