//! Chat transcripts and the turn loop around the completion backend.
//!
//! The completion API is stateless, so every turn re-serialises the whole
//! transcript into a context string ([`Transcript::build_context`]). That is
//! linear in transcript length per turn, which is fine for short-lived
//! sessions that are never persisted.

pub mod prompt;
pub mod service;
pub mod session;

pub use service::{ChatService, TurnOutcome};
pub use session::SessionManager;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Capitalised label used in the context string.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single message in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only log of one session's messages.
///
/// Order is conversational causality and the sole input to
/// [`build_context`](Self::build_context); nothing is ever reordered or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// A fresh transcript holding only the assistant greeting.
    pub fn start() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(prompt::GREETING)],
        }
    }

    /// Append a user message. Empty text is rejected and leaves the
    /// transcript untouched.
    ///
    /// Whitespace-only text counts as empty too, which is stricter than a
    /// plain `is_empty` check: `"  "` never reaches the backend.
    pub fn append_user(&mut self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        self.messages.push(ChatMessage::user(text));
        Ok(())
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// `"<Role>: <content>"` per message, newline-separated, oldest first.
    pub fn build_context(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::start()
    }
}
