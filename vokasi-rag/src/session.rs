//! Chat session: the transcript of one conversation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::RagPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One message in the transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    role: Role,
    content: String,
}

impl ChatTurn {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No turns yet, or just reset.
    Empty,
    /// At least one question/answer pair.
    Active,
}

/// The transcript of one conversation, oldest turn first.
///
/// Turns are only ever appended as a user/assistant pair after the answer
/// has been computed, so the transcript always alternates and never holds
/// an unanswered question.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.turns.is_empty() { SessionState::Empty } else { SessionState::Active }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Ask `pipeline` to answer `question` and record the exchange.
    ///
    /// On success the question and its answer are appended together and
    /// the answer is returned. On failure the error is returned and the
    /// transcript is left exactly as it was.
    pub async fn submit(&mut self, pipeline: &RagPipeline, question: &str) -> Result<&str> {
        let answer = match pipeline.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, turns = self.turns.len(), "question not recorded");
                return Err(e);
            }
        };

        self.turns.push(ChatTurn { role: Role::User, content: question.to_string() });
        self.turns.push(ChatTurn { role: Role::Assistant, content: answer });
        debug!(turns = self.turns.len(), "recorded exchange");

        Ok(self.turns.last().map(ChatTurn::content).unwrap_or_default())
    }

    /// Discard the whole transcript.
    pub fn reset(&mut self) {
        debug!(discarded = self.turns.len(), "session reset");
        self.turns.clear();
    }
}
