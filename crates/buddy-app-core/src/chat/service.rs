use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{prompt, ChatMessage, SessionManager};
use crate::completion::CompletionClient;
use crate::error::{AuthError, ChatError};

/// Result of one chat turn.
///
/// A failed completion is not an `Err`: the turn still completes with
/// [`prompt::FALLBACK_REPLY`] recorded and `error` describing the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub error: Option<String>,
    pub messages: Vec<ChatMessage>,
}

/// Drives chat turns for every session against one completion client.
pub struct ChatService {
    sessions: SessionManager,
    client: Result<Arc<dyn CompletionClient>, AuthError>,
    system_prompt: String,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("sessions", &self.sessions)
            .field("client_ready", &self.client.is_ok())
            .finish()
    }
}

impl ChatService {
    /// `client` is the outcome of backend initialisation; an `Err` is kept
    /// and reported on every turn so the rest of the app keeps working.
    pub fn new(client: Result<Arc<dyn CompletionClient>, AuthError>) -> Self {
        Self {
            sessions: SessionManager::new(),
            client,
            system_prompt: prompt::SYSTEM_PROMPT.to_owned(),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The initialisation error, if the backend is unavailable.
    pub fn auth_error(&self) -> Option<&AuthError> {
        self.client.as_ref().err()
    }

    pub fn create_session(&self) -> Uuid {
        let id = self.sessions.create();
        info!(session_id = %id, "chat session created");
        id
    }

    pub fn close_session(&self, id: &Uuid) -> Result<(), ChatError> {
        if self.sessions.remove(id) {
            info!(session_id = %id, "chat session closed");
            Ok(())
        } else {
            Err(ChatError::SessionNotFound(*id))
        }
    }

    /// Close every session idle for longer than `ttl`.
    pub fn sweep_idle_sessions(&self, ttl: Duration) -> usize {
        let removed = self.sessions.sweep_idle(ttl);
        if removed > 0 {
            info!(removed, remaining = self.sessions.len(), "idle chat sessions closed");
        }
        removed
    }

    /// Snapshot of a session's transcript, oldest first.
    pub async fn messages(&self, id: &Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        let transcript = self.sessions.get(id).ok_or(ChatError::SessionNotFound(*id))?;
        let transcript = transcript.lock().await;
        Ok(transcript.messages().to_vec())
    }

    /// Run one turn: record the user input, ask the backend, record the
    /// reply (or the fallback).
    ///
    /// Empty input fails with a validation error before anything changes. If
    /// the backend never initialised, the user message stays recorded and
    /// the auth error is returned with no assistant reply.
    pub async fn respond(&self, id: &Uuid, input: &str) -> Result<TurnOutcome, ChatError> {
        let transcript = self.sessions.get(id).ok_or(ChatError::SessionNotFound(*id))?;
        let mut transcript = transcript.lock().await;

        transcript.append_user(input)?;
        let client = self.client.as_ref().map_err(|e| ChatError::Auth(e.clone()))?;

        let context = transcript.build_context();
        let (reply, error) = match client.complete(&self.system_prompt, input, &context).await {
            Ok(reply) => (reply, None),
            Err(e) => {
                warn!(session_id = %id, error = %e, "completion failed");
                (prompt::FALLBACK_REPLY.to_owned(), Some(e.to_string()))
            }
        };
        transcript.append_assistant(reply.clone());

        Ok(TurnOutcome {
            reply,
            error,
            messages: transcript.messages().to_vec(),
        })
    }
}
