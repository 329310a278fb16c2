use buddy_app_core::chat::{ChatMessage, TurnOutcome};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Outcome of one chat turn.
///
/// A failed completion still returns 200: `reply` is the fallback text and
/// `error` carries the failure description for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TurnResponse {
    pub reply: String,
    pub error: Option<String>,
    pub messages: Vec<ChatMessage>,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            reply: outcome.reply,
            error: outcome.error,
            messages: outcome.messages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionListResponse {
    pub sessions: Vec<Uuid>,
}
